//! Uploaded manifest parsing.
//!
//! An upload is either a primary manifest (`composer.json`) or the lock-file
//! variant (`composer.lock`). The variant is decided by the uploaded file name,
//! never by the content. Only two fields are read from the JSON body: `name`,
//! which identifies a primary manifest, and `content-hash`, which identifies a
//! lock file. Both are optional.

use crate::constants::LOCK_SUFFIX;
use crate::core::CompozipError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct ManifestFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "content-hash")]
    content_hash: Option<String>,
}

/// What the pipeline knows about one uploaded manifest.
///
/// `project_name` is meaningful only for a primary manifest and
/// `content_hash` only for the lock-file variant. `staging_directory` is
/// unset until the manifest has been staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDescriptor {
    /// `name` field of a primary manifest
    pub project_name: String,
    /// `content-hash` field of a lock file
    pub content_hash: String,
    /// Whether the upload's file name ends in `.lock`
    pub is_lock_variant: bool,
    /// Working directory allocated for this request
    pub staging_directory: Option<PathBuf>,
}

impl ManifestDescriptor {
    /// Parse uploaded bytes and classify them by `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`CompozipError::InvalidManifestJson`] when the bytes are neither
    /// a JSON object nor `null`, or when `name`/`content-hash` are not strings.
    pub fn parse(bytes: &[u8], file_name: &str) -> Result<Self, CompozipError> {
        // A bare `null` reads as an object with no fields; Composer rejects it later.
        let fields: ManifestFields = serde_json::from_slice::<Option<ManifestFields>>(bytes)
            .map_err(|e| CompozipError::InvalidManifestJson {
                file_name: file_name.to_string(),
                reason: e.to_string(),
            })?
            .unwrap_or_default();

        Ok(Self {
            project_name: fields.name.unwrap_or_default(),
            content_hash: fields.content_hash.unwrap_or_default(),
            is_lock_variant: is_lock_file(file_name),
            staging_directory: None,
        })
    }

    /// Identifier used in logs: the content hash for lock files, the project
    /// name otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.is_lock_variant {
            &self.content_hash
        } else {
            &self.project_name
        }
    }

    /// Record where the manifest was staged.
    pub fn set_staging_directory(&mut self, dir: impl AsRef<Path>) {
        self.staging_directory = Some(dir.as_ref().to_path_buf());
    }
}

/// Whether an uploaded file name denotes the lock-file variant.
#[must_use]
pub fn is_lock_file(file_name: &str) -> bool {
    file_name.ends_with(LOCK_SUFFIX)
}
