//! # Crafthand Transfer
//!
//! Moves recipe ingredients from an inventory into a crafting grid.
//!
//! This crate provides:
//! - Recipe finder (how many crafts an inventory can supply, and from which stacks)
//! - Container adapters and slot accessors
//! - The crafting-grid filler and its allocation report
//! - Transfer configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod accessor;
pub mod adapter;
pub mod config;
pub mod crafter;
pub mod error;
pub mod events;
pub mod finder;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::accessor::*;
    pub use crate::adapter::*;
    pub use crate::config::*;
    pub use crate::crafter::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::finder::*;
}

pub use prelude::*;
