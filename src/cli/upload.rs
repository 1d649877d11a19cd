//! `compozip upload`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::client::{UploadRequest, upload};
use crate::constants::COMPOSER_JSON;
use crate::models::ArchiveFormat;

/// Upload a manifest to a compozip server and save the returned archive.
#[derive(Args, Debug, Clone)]
pub struct UploadCommand {
    /// Server host name
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(long, default_value_t = 80)]
    port: u16,

    /// Path to composer.json or composer.lock
    #[arg(short, long, default_value = COMPOSER_JSON)]
    composer: PathBuf,

    /// Archive format: zip or tar
    #[arg(short, long, default_value = "zip")]
    format: ArchiveFormat,

    /// Directory to write vendor.<format> into
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

impl UploadCommand {
    /// Upload and report where the archive was written.
    ///
    /// # Errors
    ///
    /// See [`upload`].
    pub async fn execute(self, quiet: bool) -> Result<()> {
        let request = UploadRequest {
            host: self.host,
            port: self.port,
            manifest: self.composer,
            format: self.format,
            output_dir: self.output,
        };

        let path = upload(&request, quiet).await?;
        if !quiet {
            println!("{} {}", "Vendor archive written to".green(), path.display());
        }
        Ok(())
    }
}
