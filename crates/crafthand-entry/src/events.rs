//! Events raised by the comparison engine.

use crafthand_common::ItemId;
use serde::{Deserialize, Serialize};

/// Countable events from entry comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryEvent {
    /// A per-item comparator failed and was disabled for the rest of the process
    ComparatorDisabled {
        /// Item whose comparator was disabled
        item: ItemId,
        /// Failure description
        reason: String,
    },
}
