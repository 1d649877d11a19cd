//! Sending the produced archive back to the caller.

use axum::http::HeaderName;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::constants::DOWNLOAD_CACHE_CONTROL;
use crate::core::CompozipError;
use crate::models::ArchiveFormat;
use crate::staging::StagingDirectory;

/// Read `vendor.<format>` from the staging directory.
///
/// # Errors
///
/// [`CompozipError::ArchiveUnreadable`] if the file is missing or unreadable.
pub async fn read_archive(
    staging: &StagingDirectory,
    format: ArchiveFormat,
) -> Result<Vec<u8>, CompozipError> {
    let path = staging.join(&format.file_name());
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            tracing::info!(file = %path.display(), size = bytes.len(), "Sending vendor archive to client");
            Ok(bytes)
        }
        Err(source) => {
            tracing::error!(file = %path.display(), error = %source, "Failed to read vendor archive");
            Err(CompozipError::ArchiveUnreadable {
                path,
                source,
            })
        }
    }
}

/// Build the download response; the status is left at the default `200 OK`.
#[must_use]
pub fn archive_response(bytes: Vec<u8>, format: ArchiveFormat) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (HeaderName::from_static("content-description"), "File Transfer".to_string()),
            (HeaderName::from_static("content-transfer-encoding"), "binary".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::EXPIRES, "0".to_string()),
            (header::CACHE_CONTROL, DOWNLOAD_CACHE_CONTROL.to_string()),
            (header::PRAGMA, "public".to_string()),
        ],
        bytes,
    )
        .into_response()
}
