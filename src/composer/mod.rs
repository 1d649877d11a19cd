//! Composer integration.
//!
//! The pipeline talks to Composer through the [`DependencyTool`] capability so
//! tests can swap in a fake. [`Composer`] is the real implementation and
//! shells out via [`ComposerCommand`].
//!
//! [`run_composer_steps`] drives the fixed sequence for one staged manifest:
//!
//! 1. `validate`, skipped for lock uploads since it would only check the stub
//! 2. `install`
//! 3. `archive --file=vendor --format=<fmt> --quiet`
//!
//! A step fails when the process cannot be launched or when it exits
//! unsuccessfully; both cases are treated the same. The first failure ends the
//! sequence and nothing is retried.

pub mod command_builder;

use std::fmt;
use std::future::Future;
use std::path::Path;

use anyhow::Result;

pub use command_builder::{ComposerCommand, ToolOutput};

use crate::core::CompozipError;
use crate::manifest::ManifestDescriptor;
use crate::models::ArchiveFormat;
use crate::staging::StagingDirectory;
use crate::utils::platform::{command_exists, get_composer_command, get_php_command};

/// Startup precondition: both `php` and `composer` must be on PATH.
///
/// # Errors
///
/// [`CompozipError::PhpNotFound`] or [`CompozipError::ComposerNotFound`].
pub fn ensure_toolchain() -> Result<(), CompozipError> {
    if !command_exists(get_php_command()) {
        return Err(CompozipError::PhpNotFound);
    }
    if !command_exists(get_composer_command()) {
        return Err(CompozipError::ComposerNotFound);
    }
    Ok(())
}

/// Operations the vendoring pipeline needs from a dependency manager.
///
/// Each operation runs with `dir` as its working directory. `Err` means the
/// tool could not be launched; a tool that ran and failed returns `Ok` with
/// [`ToolOutput::success`] unset.
pub trait DependencyTool: Send + Sync + 'static {
    /// Check that the manifest in `dir` is valid.
    fn validate(&self, dir: &Path) -> impl Future<Output = Result<ToolOutput>> + Send;

    /// Resolve and install dependencies into `dir`.
    fn install(&self, dir: &Path) -> impl Future<Output = Result<ToolOutput>> + Send;

    /// Package the installed project as `vendor.<format>` inside `dir`.
    fn archive(
        &self,
        dir: &Path,
        format: ArchiveFormat,
    ) -> impl Future<Output = Result<ToolOutput>> + Send;
}

/// The `composer` executable found on PATH.
#[derive(Debug, Clone, Default)]
pub struct Composer;

impl DependencyTool for Composer {
    // Validation output is captured and logged; the caller only learns pass/fail.
    async fn validate(&self, dir: &Path) -> Result<ToolOutput> {
        in_dir(ComposerCommand::validate(), dir).execute().await
    }

    // Install and archive stream to the service's own output for operators.
    async fn install(&self, dir: &Path) -> Result<ToolOutput> {
        in_dir(ComposerCommand::install(), dir).inherit_stdio().execute().await
    }

    async fn archive(&self, dir: &Path, format: ArchiveFormat) -> Result<ToolOutput> {
        in_dir(ComposerCommand::archive(format), dir).inherit_stdio().execute().await
    }
}

// Log lines carry the staging directory name so concurrent requests can be told apart.
fn in_dir(command: ComposerCommand, dir: &Path) -> ComposerCommand {
    let command = command.current_dir(dir);
    match dir.file_name() {
        Some(name) => command.with_context(name.to_string_lossy()),
        None => command,
    }
}

/// One step of the Composer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStep {
    /// `composer validate`
    Validate,
    /// `composer install`
    Install,
    /// `composer archive`
    Archive,
}

impl ToolStep {
    fn failure(self, reason: String) -> CompozipError {
        match self {
            Self::Validate => CompozipError::ValidationFailed {
                reason,
            },
            Self::Install => CompozipError::InstallFailed {
                reason,
            },
            Self::Archive => CompozipError::ArchiveFailed {
                reason,
            },
        }
    }

    /// Turn the raw result of running this step into pass/fail.
    fn check(self, result: Result<ToolOutput>) -> Result<ToolOutput, CompozipError> {
        match result {
            Ok(output) if output.success => Ok(output),
            Ok(output) => {
                tracing::error!(step = %self, status = %output.describe_exit(), "Composer step failed");
                Err(self.failure(output.describe_exit()))
            }
            Err(e) => {
                tracing::error!(step = %self, error = %format!("{e:#}"), "Composer step could not be launched");
                Err(self.failure(format!("{e:#}")))
            }
        }
    }
}

impl fmt::Display for ToolStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validate => "validate",
            Self::Install => "install",
            Self::Archive => "archive",
        })
    }
}

/// Run validate (unless lock upload), install and archive in `staging`.
///
/// # Errors
///
/// [`CompozipError::ValidationFailed`], [`CompozipError::InstallFailed`] or
/// [`CompozipError::ArchiveFailed`] for the first step that fails.
pub async fn run_composer_steps<T: DependencyTool>(
    tool: &T,
    manifest: &ManifestDescriptor,
    staging: &StagingDirectory,
    format: ArchiveFormat,
) -> Result<(), CompozipError> {
    let dir = staging.path();

    if manifest.is_lock_variant {
        tracing::debug!(directory = %dir.display(), "Skipping composer validate for lock file");
    } else {
        tracing::debug!(directory = %dir.display(), "Running composer validate");
        ToolStep::Validate.check(tool.validate(dir).await)?;
    }

    tracing::debug!(directory = %dir.display(), "Running composer install");
    ToolStep::Install.check(tool.install(dir).await)?;

    if manifest.is_lock_variant {
        tracing::debug!(directory = %dir.display(), "Including stub composer.json in vendor archive");
    }
    tracing::debug!(directory = %dir.display(), %format, "Running composer archive");
    ToolStep::Archive.check(tool.archive(dir, format).await)?;

    Ok(())
}
