//! Cross-platform utilities
//!
//! - [`platform`] - executable names, PATH lookups and path expansion
//! - [`progress`] - terminal spinner for the upload client

pub mod platform;
pub mod progress;

pub use platform::{command_exists, get_composer_command, get_php_command, resolve_path};
pub use progress::Spinner;
