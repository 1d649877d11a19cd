//! Request validation: the archive format from the route and the manifest
//! file from the multipart body.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;

use crate::constants::MANIFEST_FIELD;
use crate::core::CompozipError;
use crate::models::ArchiveFormat;

/// The `composer` file part of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestUpload {
    /// File name the client sent with the part
    pub file_name: String,
    /// Raw file content
    pub bytes: Vec<u8>,
}

/// Validate the `{extension}` route segment.
///
/// # Errors
///
/// [`CompozipError::InvalidFormat`] for anything but `zip`/`tar` (any case).
pub fn parse_format(extension: &str) -> Result<ArchiveFormat, CompozipError> {
    extension.parse().inspect_err(|_| {
        tracing::warn!(extension, "Invalid format type specified");
    })
}

/// Extract the first file part named `composer`.
///
/// Parts without a file name are ordinary form values and do not count.
///
/// # Errors
///
/// [`CompozipError::MalformedMultipart`] when the body is not readable
/// multipart data, [`CompozipError::MissingManifestPart`] when no `composer`
/// file part is present.
pub async fn read_manifest_part(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ManifestUpload, CompozipError> {
    let mut multipart = multipart.map_err(|rejection| malformed(rejection.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(|e| malformed(e.body_text()))? {
        if field.name() != Some(MANIFEST_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(ToString::to_string) else {
            continue;
        };

        let bytes = field.bytes().await.map_err(|e| malformed(e.body_text()))?;
        tracing::debug!(file_name = %file_name, size = bytes.len(), "Read manifest from form-data");
        return Ok(ManifestUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    tracing::error!("Multipart form-data didn't contain 'composer' file");
    Err(CompozipError::MissingManifestPart)
}

fn malformed(reason: String) -> CompozipError {
    tracing::error!(reason = %reason, "Failed to parse multipart form-data");
    CompozipError::MalformedMultipart {
        reason,
    }
}
