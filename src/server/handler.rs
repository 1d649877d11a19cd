//! The `POST /vendor/:extension` handler.
//!
//! Per request, strictly in order:
//!
//! ```text
//! Received -> FormatValidated -> ManifestParsed -> Staged
//!          -> [validate skipped or passed] -> Installed -> Archived -> Streamed
//! ```
//!
//! Any step may end the request instead. Its [`CompozipError`] becomes the
//! response (status plus a one-line plain-text message) and no later step
//! runs. A failed request never produces a partial archive.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::Instrument;
use uuid::Uuid;

use super::AppState;
use super::download::{archive_response, read_archive};
use super::request::{parse_format, read_manifest_part};
use crate::composer::{DependencyTool, run_composer_steps};
use crate::core::CompozipError;
use crate::manifest::ManifestDescriptor;
use crate::staging::stage_manifest;

impl IntoResponse for CompozipError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error_chain(&self), "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %error_chain(&self), "Request rejected");
        }
        (status, [(header::CONTENT_TYPE, "text/plain")], self.public_message()).into_response()
    }
}

fn error_chain(error: &CompozipError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Vendor the uploaded manifest's dependencies and return them as an archive.
pub async fn vendor_handler<T: DependencyTool>(
    State(state): State<AppState<T>>,
    Path(extension): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let span = tracing::info_span!(
        "vendor",
        request_id = %Uuid::new_v4(),
        extension = %extension,
        project = tracing::field::Empty,
    );

    match vendor(&state, &extension, multipart).instrument(span).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn vendor<T: DependencyTool>(
    state: &AppState<T>,
    extension: &str,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, CompozipError> {
    let format = parse_format(extension)?;
    let upload = read_manifest_part(multipart).await?;

    let mut manifest = ManifestDescriptor::parse(&upload.bytes, &upload.file_name).inspect_err(|e| {
        tracing::error!(file_name = %upload.file_name, error = %e, "Failed to parse JSON");
    })?;
    tracing::Span::current().record("project", manifest.display_name());
    tracing::info!(%format, "Processing request for project");

    let staging = stage_manifest(&state.config.uploads_dir, &mut manifest, &upload.bytes).await?;
    if manifest.is_lock_variant {
        tracing::info!(
            hash = %manifest.content_hash,
            directory = %staging.path().display(),
            "Processing composer.lock file"
        );
    } else {
        tracing::info!(
            project = %manifest.project_name,
            directory = %staging.path().display(),
            "Processing composer.json file"
        );
    }

    run_composer_steps(state.tool.as_ref(), &manifest, &staging, format).await?;

    let bytes = read_archive(&staging, format).await?;
    Ok(archive_response(bytes, format))
}
