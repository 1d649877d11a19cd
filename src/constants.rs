//! Global constants used throughout the compozip codebase.
//!
//! File names, fixed manifest content, HTTP header values and limits that are
//! shared between the server pipeline, the upload client and the tests.

/// Name of the primary Composer manifest inside a staging directory.
pub const COMPOSER_JSON: &str = "composer.json";

/// Name of the Composer lock file inside a staging directory.
pub const COMPOSER_LOCK: &str = "composer.lock";

/// Suffix that marks an uploaded file as the lock-file variant.
pub const LOCK_SUFFIX: &str = ".lock";

/// Multipart form field that carries the uploaded manifest.
pub const MANIFEST_FIELD: &str = "composer";

/// Base name passed to `composer archive --file=`.
pub const ARCHIVE_BASE_NAME: &str = "vendor";

/// Prefix for per-request staging directories under the uploads root.
pub const STAGING_PREFIX: &str = "vendor";

/// Project name written into the stub manifest.
pub const STUB_PROJECT_NAME: &str = "compozip/generated";

/// Stub `composer.json` staged next to an uploaded `composer.lock`.
///
/// Composer refuses to install from a lock file alone, so a minimal manifest
/// with a permissive PHP constraint is written alongside it.
pub const STUB_MANIFEST: &str = r#"{
	"name": "compozip/generated",
	"description": "This is a stub composer.json generated because you uploaded a composer.lock file. Please discard it and use your original composer.json.",
	"license": "MIT",
	"require": {
		"php":">=5.6.30"
	}
}"#;

/// Largest accepted request body (16 MiB).
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Default address the daemon binds to.
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Default uploads root (the working directory).
pub const DEFAULT_UPLOADS_DIR: &str = ".";

/// `Cache-Control` value sent with every archive download.
pub const DOWNLOAD_CACHE_CONTROL: &str = "must-revalidate, post-check=0, pre-check=0";

/// Steps slower than this are reported under the `composer::perf` target.
pub const SLOW_STEP_SECS: u64 = 1;
