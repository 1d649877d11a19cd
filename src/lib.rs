//! compozip - Composer dependencies as a service
//!
//! compozip is an HTTP daemon that accepts an uploaded `composer.json` or
//! `composer.lock`, runs Composer against it in an isolated staging directory,
//! and returns the installed project as `vendor.zip` or `vendor.tar`. Callers
//! such as CI jobs get pre-vendored dependency bundles without needing PHP or
//! Composer themselves.
//!
//! # Request flow
//!
//! ```text
//! POST /vendor/{zip|tar}  (multipart, part "composer")
//!   -> validate format          server::request
//!   -> parse manifest           manifest
//!   -> stage into vendorXXXXXX  staging
//!   -> composer validate/install/archive   composer
//!   -> stream vendor.<fmt>      server::download
//! ```
//!
//! A `composer.lock` upload is staged next to a fixed stub `composer.json`
//! and skips `composer validate`.
//!
//! # Modules
//!
//! - [`cli`] - `serve` and `upload` subcommands, logging setup
//! - [`client`] - upload client for a running server
//! - [`composer`] - the [`composer::DependencyTool`] capability and the real Composer client
//! - [`config`] - bind address and uploads root
//! - [`constants`] - file names, limits and the stub manifest
//! - [`core`] - error types and user-facing error formatting
//! - [`manifest`] - manifest parsing and lock-file classification
//! - [`models`] - [`models::ArchiveFormat`]
//! - [`server`] - axum router and request handler
//! - [`staging`] - per-request staging directories
//! - [`utils`] - platform helpers and the progress spinner

pub mod cli;
pub mod client;
pub mod composer;
pub mod config;
pub mod constants;
pub mod core;
pub mod manifest;
pub mod models;
pub mod server;
pub mod staging;
pub mod utils;
