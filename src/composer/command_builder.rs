//! Builder for Composer subprocess invocations
//!
//! Unlike most command wrappers, a non-zero exit is not turned into an error
//! here: [`ComposerCommand::execute`] only fails when the process cannot be
//! launched, and reports the exit status in [`ToolOutput`]. The caller decides
//! what an unsuccessful step means.
//!
//! No timeout is applied. `composer install` fetches packages over the network
//! and may legitimately run for a long time.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::constants::{ARCHIVE_BASE_NAME, SLOW_STEP_SECS};
use crate::models::ArchiveFormat;
use crate::utils::platform::get_composer_command;

/// Structured result of one Composer invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Whether the process reported success
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured standard output (empty when stdio was inherited)
    pub stdout: String,
    /// Captured standard error (empty when stdio was inherited)
    pub stderr: String,
}

impl ToolOutput {
    /// A successful run with no captured output.
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Self::default()
        }
    }

    /// A run that exited with `code`.
    #[must_use]
    pub fn exited(code: i32) -> Self {
        Self {
            success: code == 0,
            code: Some(code),
            ..Self::default()
        }
    }

    /// Short description of how the run ended, for logs and error reasons.
    #[must_use]
    pub fn describe_exit(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Fluent builder for a single `composer` subprocess.
///
/// ```rust,no_run
/// use compozip::composer::command_builder::ComposerCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let output = ComposerCommand::validate()
///     .current_dir("/srv/uploads/vendorAb12Cd")
///     .with_context("acme/widget")
///     .execute()
///     .await?;
/// assert!(output.success);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ComposerCommand {
    /// Executable to launch
    program: String,

    /// Arguments passed to Composer (e.g. ["archive", "--file=vendor"])
    args: Vec<String>,

    /// Working directory of the subprocess
    current_dir: Option<PathBuf>,

    /// Capture output (true) or stream it to our own stdout/stderr (false)
    capture_output: bool,

    /// Identifier included in log lines to tell concurrent requests apart
    context: Option<String>,
}

impl Default for ComposerCommand {
    fn default() -> Self {
        Self {
            program: get_composer_command().to_string(),
            args: Vec::new(),
            current_dir: None,
            capture_output: true,
            context: None,
        }
    }
}

impl ComposerCommand {
    /// Creates a builder that launches `composer` from PATH.
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch a different executable (e.g. an absolute path to `composer.phar`).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the working directory of the subprocess.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Stream output to the service's own stdout/stderr instead of capturing it.
    pub const fn inherit_stdio(mut self) -> Self {
        self.capture_output = false;
        self
    }

    /// Set a context for logging (typically the project name or content hash).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn log_prefix(&self) -> String {
        self.context.as_ref().map(|ctx| format!("({ctx}) ")).unwrap_or_default()
    }

    /// Run the command to completion.
    ///
    /// # Errors
    ///
    /// Fails only when the process cannot be spawned or waited on. A process
    /// that runs and exits non-zero is returned as `Ok` with `success == false`.
    pub async fn execute(self) -> Result<ToolOutput> {
        let start = std::time::Instant::now();
        let prefix = self.log_prefix();
        let command_line = format!("{} {}", self.program, self.args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        tracing::debug!(
            target: "composer",
            "{}Executing command: {} (in {})",
            prefix,
            command_line,
            self.current_dir.as_deref().map_or_else(|| ".".into(), |d| d.display().to_string())
        );

        let output = cmd.output().await.with_context(|| format!("Failed to execute {command_line}"))?;

        let result = ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if result.success {
            if !result.stdout.is_empty() {
                tracing::debug!(target: "composer", "{}{}", prefix, result.stdout.trim());
            }
            if !result.stderr.is_empty() {
                tracing::debug!(target: "composer", "{}{}", prefix, result.stderr.trim());
            }
        } else {
            tracing::debug!(
                target: "composer",
                "{}Command failed with {}: {}",
                prefix,
                result.describe_exit(),
                command_line
            );
            if !result.stderr.is_empty() {
                tracing::debug!(target: "composer", "{}Error: {}", prefix, result.stderr.trim());
            }
            if !result.stdout.is_empty() {
                tracing::debug!(target: "composer", "{}Output: {}", prefix, result.stdout.trim());
            }
        }

        let elapsed = start.elapsed();
        let operation = self.args.first().map_or("composer", String::as_str);
        if elapsed.as_secs() >= SLOW_STEP_SECS {
            tracing::info!(
                target: "composer::perf",
                "{}Composer {} took {:.2}s",
                prefix,
                operation,
                elapsed.as_secs_f64()
            );
        }

        Ok(result)
    }
}

// Builders for the three steps of the vendoring pipeline

impl ComposerCommand {
    /// `composer validate`
    pub fn validate() -> Self {
        Self::new().arg("validate")
    }

    /// `composer install`
    pub fn install() -> Self {
        Self::new().arg("install")
    }

    /// `composer archive --file=vendor --format=<fmt> --quiet`
    pub fn archive(format: ArchiveFormat) -> Self {
        Self::new().args([
            "archive".to_string(),
            format!("--file={ARCHIVE_BASE_NAME}"),
            format!("--format={format}"),
            "--quiet".to_string(),
        ])
    }
}
