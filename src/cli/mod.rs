//! Command-line interface for compozip.
//!
//! # Commands
//!
//! - `serve` - run the HTTP vendoring daemon
//! - `upload` - send a manifest to a running daemon and save the archive
//!
//! ```bash
//! # Start the daemon with staging directories under /srv/compozip
//! compozip serve --bind 0.0.0.0:8080 --uploads-dir /srv/compozip
//!
//! # From a project directory, fetch vendor.tar
//! compozip upload --host vendor.internal --port 8080 --format tar
//! ```
//!
//! # Logging
//!
//! `--verbose` logs at `debug`, `--quiet` at `warn`, otherwise `info`.
//! A set `RUST_LOG` overrides all of these, e.g. `RUST_LOG=composer=debug`
//! to see Composer's captured output.

mod serve;
mod upload;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use serve::ServeCommand;
pub use upload::UploadCommand;

/// Global options shared by all commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default log level when `RUST_LOG` is unset
    pub log_level: &'static str,
    /// Suppress progress output
    pub quiet: bool,
}

/// Top-level parser.
#[derive(Parser)]
#[command(
    name = "compozip",
    about = "Vendor Composer dependencies over HTTP",
    version,
    long_about = "compozip runs `composer install` for an uploaded composer.json or composer.lock and returns the vendored project as a zip or tar archive."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors, and hide progress
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the vendoring HTTP server
    Serve(ServeCommand),

    /// Upload a manifest to a compozip server and download the archive
    Upload(UploadCommand),
}

impl Cli {
    /// Initialize logging and run the selected command.
    ///
    /// # Errors
    ///
    /// Propagates the command's error.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(config.log_level);
        self.execute_with_config(config).await
    }

    /// Derive global options from the parsed flags.
    #[must_use]
    pub const fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level,
            quiet: self.quiet,
        }
    }

    /// Run the selected command without touching the logging setup.
    ///
    /// # Errors
    ///
    /// Propagates the command's error.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Serve(cmd) => cmd.execute().await,
            Commands::Upload(cmd) => cmd.execute(config.quiet).await,
        }
    }
}

fn init_logging(default_level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
