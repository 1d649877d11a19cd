//! Platform-specific helpers
//!
//! Executable names for the external toolchain, PATH lookups for the startup
//! precondition check, and shell-style path expansion for configured
//! directories.
//!
//! # Examples
//!
//! ```rust,no_run
//! use compozip::utils::platform::{command_exists, get_composer_command, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let uploads = resolve_path("~/compozip/uploads")?;
//! if !command_exists(get_composer_command()) {
//!     eprintln!("composer is missing");
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Checks if the current platform is Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Returns the Composer executable name for the current platform.
///
/// Composer installs a `composer.bat` shim on Windows.
#[must_use]
pub const fn get_composer_command() -> &'static str {
    if is_windows() {
        "composer.bat"
    } else {
        "composer"
    }
}

/// Returns the PHP executable name for the current platform.
#[must_use]
pub const fn get_php_command() -> &'static str {
    if is_windows() {
        "php.exe"
    } else {
        "php"
    }
}

/// Whether `cmd` resolves to an executable on PATH.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Resolves `~/` and `$VAR` / `${VAR}` in a configured path.
///
/// # Errors
///
/// Fails when a referenced environment variable is undefined or the home
/// directory cannot be determined.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        format!(
            "Failed to expand path: {path}\n\n\
            Check that every referenced environment variable is set (use $VAR or ${{VAR}})"
        )
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
