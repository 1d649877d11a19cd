//! Per-request staging directories.
//!
//! Every request gets its own directory under the uploads root, created with
//! [`tempfile::Builder`] so the name is unique even under concurrent requests
//! and never derived from anything the caller sent. The directory is kept on
//! disk after the request finishes; nothing in compozip removes it.
//!
//! Layout after staging:
//!
//! ```text
//! <uploads-root>/vendorXXXXXX/
//!   composer.json   uploaded manifest, or the stub for lock uploads
//!   composer.lock   lock uploads only
//! ```
//!
//! Composer later adds `vendor/` and `vendor.<format>` to the same directory.

use crate::constants::{COMPOSER_JSON, COMPOSER_LOCK, STAGING_PREFIX, STUB_MANIFEST};
use crate::core::CompozipError;
use crate::manifest::ManifestDescriptor;
use std::path::{Path, PathBuf};

/// A uniquely-named working directory owned by one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingDirectory {
    path: PathBuf,
}

impl StagingDirectory {
    /// Allocate a fresh directory under `uploads_root`.
    ///
    /// # Errors
    ///
    /// Returns [`CompozipError::StagingFailed`] if the directory cannot be created.
    pub fn allocate(uploads_root: &Path) -> Result<Self, CompozipError> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(uploads_root)
            .map_err(|source| CompozipError::StagingFailed {
                path: uploads_root.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: dir.keep(),
        })
    }

    /// Location of the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a file inside the directory.
    #[must_use]
    pub fn join(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    async fn write(&self, file_name: &str, contents: &[u8]) -> Result<(), CompozipError> {
        let path = self.join(file_name);
        tokio::fs::write(&path, contents).await.map_err(|source| CompozipError::StagingFailed {
            path,
            source,
        })
    }
}

/// Allocate a staging directory and write the uploaded manifest into it.
///
/// A primary manifest is written to `composer.json`. A lock upload is written
/// verbatim to `composer.lock`, with the fixed stub manifest as
/// `composer.json`. The directory is recorded on `manifest`.
///
/// # Errors
///
/// Returns [`CompozipError::StagingFailed`] on any create or write failure.
/// Nothing further is attempted after the first failure.
pub async fn stage_manifest(
    uploads_root: &Path,
    manifest: &mut ManifestDescriptor,
    bytes: &[u8],
) -> Result<StagingDirectory, CompozipError> {
    let staging = StagingDirectory::allocate(uploads_root)?;

    if manifest.is_lock_variant {
        staging.write(COMPOSER_JSON, STUB_MANIFEST.as_bytes()).await?;
        staging.write(COMPOSER_LOCK, bytes).await?;
    } else {
        staging.write(COMPOSER_JSON, bytes).await?;
    }

    manifest.set_staging_directory(staging.path());
    tracing::debug!(
        directory = %staging.path().display(),
        lock = manifest.is_lock_variant,
        "Staged manifest"
    );
    Ok(staging)
}
