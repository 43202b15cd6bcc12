//! Events raised by the crafting-grid filler.

use crafthand_common::CategoryId;
use serde::{Deserialize, Serialize};

/// Countable outcomes of allocation attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferEvent {
    /// Every planned unit reached the grid
    Committed {
        /// Recipe category
        category: CategoryId,
        /// Crafts filled
        crafts: u32,
        /// Units moved
        units: u64,
    },
    /// The inventory could not supply one craft
    InsufficientMaterials {
        /// Recipe category
        category: CategoryId,
    },
    /// Some planned units could not be moved
    Shortfall {
        /// Recipe category
        category: CategoryId,
        /// Units planned but not moved
        missing: u64,
    },
}
