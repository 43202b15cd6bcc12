//! Entry error types.

use crafthand_common::{CommonError, EntryTypeId, ItemId};
use thiserror::Error;

/// Errors raised while registering, reading, or writing entries.
#[derive(Debug, Error)]
pub enum EntryError {
    /// No definition registered under this type id
    #[error("Unknown entry type: {0}")]
    UnknownType(EntryTypeId),
    /// A definition is already registered under this type id
    #[error("Entry type already registered: {0}")]
    DuplicateType(EntryTypeId),
    /// A stack was not of the expected entry type
    #[error("Expected entry type {expected}, found {actual:?}")]
    TypeMismatch {
        /// Expected type
        expected: EntryTypeId,
        /// Actual type (None for the empty stack)
        actual: Option<EntryTypeId>,
    },
    /// Registering the bridge would close a cycle
    #[error("Bridge {source_type} -> {target_type} would create a cycle")]
    BridgeCycle {
        /// Bridge source type
        source_type: EntryTypeId,
        /// Bridge target type
        target_type: EntryTypeId,
    },
    /// The source type already bridges to a different target type
    #[error("Bridge {source_type} -> {target_type} conflicts with {source_type} -> {existing_target}")]
    BridgeConflict {
        /// Bridge source type
        source_type: EntryTypeId,
        /// Target the source already bridges to
        existing_target: EntryTypeId,
        /// Rejected target type
        target_type: EntryTypeId,
    },
    /// Value could not be written
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Value could not be read back
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// Identifier or version error
    #[error(transparent)]
    Common(#[from] CommonError),
}

/// Result type for entry operations.
pub type EntryResult<T> = Result<T, EntryError>;

/// A per-item comparator failed to produce a hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Comparator for item {item:?} failed: {reason}")]
pub struct ComparatorError {
    /// Item whose comparator failed
    pub item: ItemId,
    /// Failure description
    pub reason: String,
}

impl ComparatorError {
    /// Creates a comparator error.
    #[must_use]
    pub fn new(item: ItemId, reason: impl Into<String>) -> Self {
        Self {
            item,
            reason: reason.into(),
        }
    }
}
