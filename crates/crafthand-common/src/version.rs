//! Version types for schema compatibility.

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, CommonResult};

/// Schema version using semantic versioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version (breaking changes)
    pub major: u16,
    /// Minor version (backwards-compatible additions)
    pub minor: u16,
    /// Patch version (bug fixes)
    pub patch: u16,
}

impl SchemaVersion {
    /// Creates a new schema version.
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Current serialized display version.
    pub const DISPLAY_FORMAT: Self = Self::new(1, 0, 0);

    /// Checks if this version is compatible with another version.
    /// Compatible means same major version and this minor >= other minor.
    #[must_use]
    pub const fn is_compatible_with(&self, other: &Self) -> bool {
        self.major == other.major && self.minor >= other.minor
    }

    /// Checks if this version can read data from another version.
    #[must_use]
    pub const fn can_read(&self, data_version: &Self) -> bool {
        self.major == data_version.major
    }

    /// Fails with [`CommonError::VersionMismatch`] unless `data_version` is readable.
    pub fn ensure_readable(&self, data_version: &Self) -> CommonResult<()> {
        if self.can_read(data_version) {
            Ok(())
        } else {
            Err(CommonError::VersionMismatch {
                expected: self.to_string(),
                actual: data_version.to_string(),
            })
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Magic bytes for file format identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicBytes(pub [u8; 4]);

impl MagicBytes {
    /// Serialized display magic bytes.
    pub const DISPLAY: Self = Self(*b"CHDS");

    /// Strips these magic bytes from the front of `bytes`.
    pub fn strip<'a>(&self, bytes: &'a [u8]) -> CommonResult<&'a [u8]> {
        match bytes.strip_prefix(&self.0[..]) {
            Some(rest) => Ok(rest),
            None => Err(CommonError::BadMagic { expected: self.0 }),
        }
    }
}
