//! Upload client for a running compozip server.
//!
//! Posts a local `composer.json` or `composer.lock` as the `composer` part of
//! a multipart form to `POST /vendor/<format>` and writes the returned
//! archive to disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};

use crate::constants::MANIFEST_FIELD;
use crate::core::CompozipError;
use crate::models::ArchiveFormat;
use crate::utils::progress::Spinner;

/// Where and how to upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Manifest file to send
    pub manifest: PathBuf,
    /// Requested archive format
    pub format: ArchiveFormat,
    /// Directory that receives `vendor.<format>`
    pub output_dir: PathBuf,
}

impl UploadRequest {
    /// Endpoint URL for this request.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}/vendor/{}", self.host, self.port, self.format)
    }

    /// Destination of the downloaded archive.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.format.file_name())
    }
}

/// Upload the manifest and save the archive. Returns the written path.
///
/// # Errors
///
/// Fails if the manifest cannot be read, the server is unreachable, the
/// server answers with an error status ([`CompozipError::UploadFailed`]) or
/// the archive cannot be written.
pub async fn upload(request: &UploadRequest, quiet: bool) -> Result<PathBuf> {
    let spinner = Spinner::start(format!("Reading {}", request.manifest.display()), quiet);
    let result = run(request, &spinner).await;
    match &result {
        Ok(path) => spinner.finish_with_message(format!("Saved {}", path.display())),
        Err(_) => spinner.finish_and_clear(),
    }
    result
}

async fn run(request: &UploadRequest, spinner: &Spinner) -> Result<PathBuf> {
    let bytes = tokio::fs::read(&request.manifest)
        .await
        .with_context(|| format!("Failed to read {}", request.manifest.display()))?;
    let file_name = manifest_file_name(&request.manifest)?;

    let part = Part::bytes(bytes).file_name(file_name.clone());
    let form = Form::new().part(MANIFEST_FIELD, part);

    let url = request.url();
    tracing::debug!(url = %url, file_name = %file_name, "Uploading manifest");
    spinner.set_message(format!("Vendoring {file_name} on {}:{}", request.host, request.port));

    let response = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(CompozipError::UploadFailed {
            file_name: request.format.file_name(),
            status: status.as_u16(),
            message: message.trim().to_string(),
        }
        .into());
    }

    let body = response.bytes().await.context("Failed to read archive from response")?;
    spinner.set_message(format!("Writing {}", request.format.file_name()));

    let output = request.output_path();
    tokio::fs::write(&output, &body)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::debug!(path = %output.display(), size = body.len(), "Archive written");

    Ok(output)
}

fn manifest_file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToString::to_string)
        .with_context(|| format!("{} has no usable file name", path.display()))
}
