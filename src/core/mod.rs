//! Core types for compozip
//!
//! The error taxonomy shared by the HTTP pipeline, the upload client and the
//! CLI lives here. See [`error`] for how each failure maps to an HTTP status
//! and to a user-facing message.

pub mod error;

pub use error::{CompozipError, ErrorContext, user_friendly_error};
