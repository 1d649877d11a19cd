//! Shared data models.
//!
//! [`ArchiveFormat`] is selected by the caller through the route segment and
//! flows through validation, the `composer archive` invocation and the
//! download headers.

use crate::constants::ARCHIVE_BASE_NAME;
use crate::core::CompozipError;
use std::fmt;
use std::str::FromStr;

/// Archive formats `composer archive` can produce for us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// A `.zip` archive
    Zip,
    /// An uncompressed `.tar` archive
    Tar,
}

impl ArchiveFormat {
    /// Lower-case name, used both as `--format=` value and file extension.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
        }
    }

    /// File name of the produced archive, e.g. `vendor.zip`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{ARCHIVE_BASE_NAME}.{}", self.as_str())
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveFormat {
    type Err = CompozipError;

    /// Case-insensitive; anything but `zip` or `tar` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            _ => Err(CompozipError::InvalidFormat {
                extension: s.to_string(),
            }),
        }
    }
}
