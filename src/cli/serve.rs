//! `compozip serve`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::composer::{Composer, ensure_toolchain};
use crate::config::ServerConfig;
use crate::server;
use crate::utils::platform::resolve_path;

/// Run the vendoring HTTP server.
#[derive(Args, Debug, Clone, Default)]
pub struct ServeCommand {
    /// TOML file with `bind` and/or `uploads_dir`
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Address to listen on (`:8080` means all interfaces)
    #[arg(short, long, env = "COMPOZIP_BIND", value_name = "ADDR")]
    bind: Option<String>,

    /// Directory under which per-request staging directories are created
    #[arg(short, long, env = "COMPOZIP_UPLOADS_DIR", value_name = "DIR")]
    uploads_dir: Option<String>,
}

impl ServeCommand {
    /// Resolve the configuration, check the toolchain, and serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Fails on bad configuration, a missing uploads root, a missing `php` or
    /// `composer`, or a bind failure.
    pub async fn execute(self) -> Result<()> {
        let config = self.resolve_config().await?;
        config.ensure_uploads_dir()?;
        ensure_toolchain()?;

        tracing::debug!(?config, "Resolved server configuration");
        server::serve(config, Composer).await
    }

    async fn resolve_config(&self) -> Result<ServerConfig> {
        let config_path: Option<PathBuf> = self.config.as_deref().map(resolve_path).transpose()?;
        ServerConfig::load_with_optional(config_path.as_deref())
            .await?
            .with_overrides(self.bind.clone(), self.uploads_dir.clone())
    }
}
