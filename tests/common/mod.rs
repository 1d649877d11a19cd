//! Shared fixtures for compozip integration tests
//!
//! [`FakeComposer`] stands in for the real Composer client: it records which
//! steps ran and writes a deterministic `vendor.<fmt>` on archive.
//! [`TestServer`] runs the real router on an ephemeral port with a scratch
//! uploads root.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};

use anyhow::Result;
use compozip::composer::{DependencyTool, ToolOutput, ToolStep};
use compozip::config::ServerConfig;
use compozip::models::ArchiveFormat;
use compozip::server::{AppState, router};
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Enable logging for tests when `RUST_LOG` is set.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Contents the fake writes as the archive for `format`.
pub fn fake_archive_bytes(format: ArchiveFormat) -> Vec<u8> {
    format!("fake {format} archive").into_bytes()
}

/// A step the fake was asked to run, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedStep {
    pub step: ToolStep,
    pub dir: PathBuf,
}

/// Recording stand-in for Composer.
#[derive(Debug, Clone, Default)]
pub struct FakeComposer {
    calls: Arc<Mutex<Vec<RecordedStep>>>,
    fail_at: Option<ToolStep>,
    skip_archive_file: bool,
}

impl FakeComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with status 1 at `step`.
    pub fn failing_at(step: ToolStep) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    /// Report a successful archive step without writing the file.
    pub fn without_archive_file() -> Self {
        Self {
            skip_archive_file: true,
            ..Self::default()
        }
    }

    pub fn steps(&self) -> Vec<ToolStep> {
        self.calls.lock().unwrap().iter().map(|c| c.step).collect()
    }

    pub fn recorded(&self) -> Vec<RecordedStep> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, step: ToolStep, dir: &Path) -> Option<ToolOutput> {
        self.calls.lock().unwrap().push(RecordedStep {
            step,
            dir: dir.to_path_buf(),
        });
        (self.fail_at == Some(step)).then(|| ToolOutput::exited(1))
    }
}

impl DependencyTool for FakeComposer {
    async fn validate(&self, dir: &Path) -> Result<ToolOutput> {
        Ok(self.record(ToolStep::Validate, dir).unwrap_or_else(ToolOutput::succeeded))
    }

    async fn install(&self, dir: &Path) -> Result<ToolOutput> {
        if let Some(failed) = self.record(ToolStep::Install, dir) {
            return Ok(failed);
        }
        tokio::fs::create_dir_all(dir.join("vendor")).await?;
        Ok(ToolOutput::succeeded())
    }

    async fn archive(&self, dir: &Path, format: ArchiveFormat) -> Result<ToolOutput> {
        if let Some(failed) = self.record(ToolStep::Archive, dir) {
            return Ok(failed);
        }
        if !self.skip_archive_file {
            tokio::fs::write(dir.join(format.file_name()), fake_archive_bytes(format)).await?;
        }
        Ok(ToolOutput::succeeded())
    }
}

/// The real router on `127.0.0.1:<ephemeral>`, backed by a [`FakeComposer`].
pub struct TestServer {
    pub addr: SocketAddr,
    pub uploads: TempDir,
    pub tool: FakeComposer,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(FakeComposer::new()).await
    }

    pub async fn start_with(tool: FakeComposer) -> Self {
        init_test_logging();

        let uploads = TempDir::new().unwrap();
        let config = ServerConfig {
            bind: "127.0.0.1:0".into(),
            uploads_dir: uploads.path().to_path_buf(),
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(AppState::new(config, tool.clone()));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            uploads,
            tool,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// POST `bytes` as a file part named `field` to `/vendor/<extension>`.
    pub async fn upload(
        &self,
        extension: &str,
        field: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> reqwest::Response {
        post_file(&self.url(&format!("/vendor/{extension}")), field, file_name, bytes).await
    }

    /// POST a manifest the way real clients do: part `composer`.
    pub async fn vendor(&self, extension: &str, file_name: &str, bytes: &[u8]) -> reqwest::Response {
        self.upload(extension, "composer", file_name, bytes).await
    }

    /// Staging directories created so far, sorted.
    pub fn staging_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = std::fs::read_dir(self.uploads.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        dirs
    }

    /// The only staging directory; panics if there is not exactly one.
    pub fn single_staging_dir(&self) -> PathBuf {
        let dirs = self.staging_dirs();
        assert_eq!(dirs.len(), 1, "expected one staging directory, found {dirs:?}");
        dirs.into_iter().next().unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// POST `bytes` as a multipart file part to `url`.
pub async fn post_file(url: &str, field: &str, file_name: &str, bytes: &[u8]) -> reqwest::Response {
    let part = Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
    let form = Form::new().part(field.to_string(), part);
    reqwest::Client::new().post(url).multipart(form).send().await.unwrap()
}

pub const ACME_WIDGET: &[u8] = br#"{
    "name": "acme/widget",
    "require": {
        "monolog/monolog": "^2.0"
    }
}"#;

pub const ACME_LOCK: &[u8] = br#"{
    "_readme": ["This file locks the dependencies of your project to a known state"],
    "content-hash": "abc123",
    "packages": [],
    "packages-dev": []
}"#;
