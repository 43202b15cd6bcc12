//! Error types shared across Crafthand crates.

use thiserror::Error;

/// Errors raised by the common building blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// Identifier text is not `namespace:path` with legal characters
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },

    /// Magic bytes did not match the expected format
    #[error("Unrecognized format: expected magic {expected:?}")]
    BadMagic {
        /// Expected magic bytes
        expected: [u8; 4],
    },
}

/// Result type alias for common operations.
pub type CommonResult<T> = Result<T, CommonError>;
