//! Transfer error types.

use crafthand_entry::EntryError;
use thiserror::Error;

/// Reasons an allocation attempt ends without filling the grid.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The inventory cannot supply one craft of the recipe
    #[error("Insufficient materials")]
    InsufficientMaterials,
    /// The recipe has more input slots than the grid
    #[error("Crafting grid too small: recipe needs {required} slots, grid has {available}")]
    GridTooSmall {
        /// Input slots the recipe needs
        required: usize,
        /// Input slots the grid has
        available: usize,
    },
    /// The requested display could not be rebuilt
    #[error("Malformed display: {0}")]
    MalformedDisplay(#[from] EntryError),
}

/// Result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;
