//! Error handling for compozip
//!
//! The error system serves two audiences:
//! 1. **HTTP callers** receive a status code and a one-line plain-text message
//!    derived from a [`CompozipError`] variant. Paths, exit codes and tool output
//!    are logged, never returned.
//! 2. **CLI users** receive an [`ErrorContext`] with details and a suggestion,
//!    printed in colour by [`ErrorContext::display`].
//!
//! # Error Categories
//!
//! - **Request input** (400): [`CompozipError::InvalidFormat`],
//!   [`CompozipError::MalformedMultipart`], [`CompozipError::MissingManifestPart`],
//!   [`CompozipError::InvalidManifestJson`]
//! - **Manifest rejected by Composer** (400): [`CompozipError::ValidationFailed`]
//! - **Composer failures** (500): [`CompozipError::InstallFailed`],
//!   [`CompozipError::ArchiveFailed`]
//! - **Filesystem** (500): [`CompozipError::StagingFailed`],
//!   [`CompozipError::ArchiveUnreadable`]
//! - **Process level**: [`CompozipError::ComposerNotFound`], [`CompozipError::PhpNotFound`],
//!   [`CompozipError::UploadsRootMissing`], [`CompozipError::ConfigError`],
//!   [`CompozipError::UploadFailed`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use compozip::core::{CompozipError, user_friendly_error};
//!
//! let err = anyhow::Error::from(CompozipError::ComposerNotFound);
//! user_friendly_error(err).display();
//! ```

use axum::http::StatusCode;
use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for compozip operations.
#[derive(Error, Debug)]
pub enum CompozipError {
    /// The route segment named an archive format other than `zip` or `tar`.
    #[error("Invalid archive format '{extension}'")]
    InvalidFormat {
        /// The rejected value as received
        extension: String,
    },

    /// The request body could not be read as `multipart/form-data`.
    #[error("Malformed multipart body: {reason}")]
    MalformedMultipart {
        /// Parser error description
        reason: String,
    },

    /// The multipart body had no `composer` file part.
    #[error("Multipart form-data did not contain a 'composer' file")]
    MissingManifestPart,

    /// The uploaded manifest is not a JSON object of the expected shape.
    #[error("Invalid manifest JSON in {file_name}: {reason}")]
    InvalidManifestJson {
        /// File name supplied with the upload
        file_name: String,
        /// JSON error description
        reason: String,
    },

    /// Creating or writing the staging directory failed.
    #[error("Failed to stage manifest in {path}")]
    StagingFailed {
        /// Directory or file that could not be created/written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `composer validate` could not be launched or rejected the manifest.
    #[error("composer validate failed: {reason}")]
    ValidationFailed {
        /// Launch error or exit status description
        reason: String,
    },

    /// `composer install` could not be launched or exited unsuccessfully.
    #[error("composer install failed: {reason}")]
    InstallFailed {
        /// Launch error or exit status description
        reason: String,
    },

    /// `composer archive` could not be launched or exited unsuccessfully.
    #[error("composer archive failed: {reason}")]
    ArchiveFailed {
        /// Launch error or exit status description
        reason: String,
    },

    /// The produced archive is missing or unreadable.
    #[error("Failed to read archive {path}")]
    ArchiveUnreadable {
        /// Expected archive location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// `composer` is not on PATH.
    #[error("Composer is not installed or not found in PATH")]
    ComposerNotFound,

    /// `php` is not on PATH.
    #[error("PHP is not installed or not found in PATH")]
    PhpNotFound,

    /// The configured uploads root does not exist or is not a directory.
    #[error("Uploads directory '{path}' does not exist or could not be found")]
    UploadsRootMissing {
        /// The configured path
        path: PathBuf,
    },

    /// Configuration file or value is invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// The server answered an upload with an error status.
    #[error("Failed to download {file_name}: server returned {status}: {message}")]
    UploadFailed {
        /// Archive file name that was requested
        file_name: String,
        /// HTTP status returned by the server
        status: u16,
        /// Body of the error response
        message: String,
    },
}

impl CompozipError {
    /// HTTP status a request failing with this error is answered with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFormat {
                ..
            }
            | Self::MalformedMultipart {
                ..
            }
            | Self::MissingManifestPart
            | Self::InvalidManifestJson {
                ..
            }
            | Self::ValidationFailed {
                ..
            } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// One-line message returned to HTTP callers.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidFormat {
                ..
            } => "Please specify valid archive type, either 'zip' or 'tar'",
            Self::MalformedMultipart {
                ..
            }
            | Self::InvalidManifestJson {
                ..
            } => "File could not be read in request",
            Self::MissingManifestPart => "Please provide 'composer' file in the form-data",
            Self::StagingFailed {
                ..
            } => "Failed to prepare the project directory",
            Self::ValidationFailed {
                ..
            } => {
                "Failed to validate Composer file - please submit a valid composer.json or composer.lock file"
            }
            Self::InstallFailed {
                ..
            } => "Failed to download Composer dependencies",
            Self::ArchiveFailed {
                ..
            }
            | Self::ArchiveUnreadable {
                ..
            } => "Failed to create Composer archive",
            _ => "Internal server error",
        }
    }
}

/// Error wrapper with user-facing details and a suggestion.
///
/// ```rust,no_run
/// use compozip::core::{CompozipError, ErrorContext};
///
/// let context = ErrorContext::new(CompozipError::ComposerNotFound)
///     .with_suggestion("Download Composer from https://getcomposer.org");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no details or suggestion.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with suggestions for known cases.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<CompozipError>() {
        Ok(compozip_error) => return create_error_context(compozip_error),
        Err(other) => other,
    };

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        let details = toml_error.to_string();
        return ErrorContext::new(error)
            .with_details(details)
            .with_suggestion("Check the TOML syntax of the configuration file");
    }

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let kind = error.downcast_ref::<std::io::Error>().map(std::io::Error::kind);
    let mut context = ErrorContext::new(error);
    if !chain.is_empty() {
        context = context.with_details(chain.join(": "));
    }
    match kind {
        Some(std::io::ErrorKind::PermissionDenied) => {
            context.with_suggestion("Check the ownership and permissions of the file or directory")
        }
        Some(std::io::ErrorKind::NotFound) => {
            context.with_suggestion("Check that the file or directory exists and the path is correct")
        }
        _ => context,
    }
}

fn create_error_context(error: CompozipError) -> ErrorContext {
    match error {
        CompozipError::ComposerNotFound => ErrorContext::new(error)
            .with_details("compozip runs 'composer validate', 'composer install' and 'composer archive'")
            .with_suggestion("Download Composer from https://getcomposer.org and make sure it is on your PATH"),
        CompozipError::PhpNotFound => ErrorContext::new(error)
            .with_details("Composer needs a PHP runtime to run")
            .with_suggestion("Download PHP from http://php.net/downloads.php and make sure it is on your PATH"),
        CompozipError::UploadsRootMissing {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Create the directory or point --uploads-dir at an existing one"),
        CompozipError::ConfigError {
            ..
        } => ErrorContext::new(error).with_suggestion("Check the configuration file and command-line flags"),
        CompozipError::InvalidFormat {
            ..
        } => ErrorContext::new(error).with_suggestion("Use --format zip or --format tar"),
        CompozipError::UploadFailed {
            status,
            ..
        } if status == 400 => ErrorContext::new(error)
            .with_suggestion("Check that the uploaded file is a valid composer.json or composer.lock"),
        CompozipError::UploadFailed {
            ..
        } => ErrorContext::new(error)
            .with_details("The server could not resolve or package the dependencies")
            .with_suggestion("Check the server logs for the Composer output"),
        other => ErrorContext::new(other),
    }
}
