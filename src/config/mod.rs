//! Server configuration
//!
//! The daemon has exactly two settings: the address to bind and the uploads
//! root under which per-request staging directories are created. They are
//! resolved once at startup and carried in the router state as an
//! `Arc<ServerConfig>`, never in globals.
//!
//! # Sources
//!
//! Lowest to highest precedence:
//!
//! 1. Built-in defaults (`0.0.0.0:8080`, `.`)
//! 2. A TOML file passed with `--config`
//! 3. Environment variables `COMPOZIP_BIND` / `COMPOZIP_UPLOADS_DIR`
//! 4. Command-line flags `--bind` / `--uploads-dir`
//!
//! Environment and flags are merged by clap before they reach
//! [`ServerConfig::with_overrides`].
//!
//! ```toml
//! bind = "127.0.0.1:8080"
//! uploads_dir = "~/compozip/uploads"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{DEFAULT_BIND, DEFAULT_UPLOADS_DIR};
use crate::core::CompozipError;
use crate::utils::platform::resolve_path;

/// Process-start configuration of the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to listen on. `:8080` is shorthand for all interfaces.
    pub bind: String,

    /// Directory that receives one staging directory per request.
    pub uploads_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not match the schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load from `path` if given, otherwise start from the defaults.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::load_from`].
    pub async fn load_with_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line/environment values and expand `~` and `$VAR` in the
    /// uploads directory.
    ///
    /// # Errors
    ///
    /// Fails if path expansion fails.
    pub fn with_overrides(mut self, bind: Option<String>, uploads_dir: Option<String>) -> Result<Self> {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        let raw = match uploads_dir {
            Some(dir) => dir,
            None => self.uploads_dir.to_string_lossy().into_owned(),
        };
        self.uploads_dir = resolve_path(&raw)?;
        Ok(self)
    }

    /// Parse [`ServerConfig::bind`] into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`CompozipError::ConfigError`] for an unparsable address.
    pub fn bind_addr(&self) -> Result<SocketAddr, CompozipError> {
        let bind = if self.bind.starts_with(':') {
            format!("0.0.0.0{}", self.bind)
        } else {
            self.bind.clone()
        };

        bind.parse().map_err(|e| CompozipError::ConfigError {
            message: format!("invalid bind address '{}': {e}", self.bind),
        })
    }

    /// Check that the uploads root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`CompozipError::UploadsRootMissing`] otherwise.
    pub fn ensure_uploads_dir(&self) -> Result<(), CompozipError> {
        if self.uploads_dir.is_dir() {
            Ok(())
        } else {
            Err(CompozipError::UploadsRootMissing {
                path: self.uploads_dir.clone(),
            })
        }
    }
}
