//! # Crafthand Common
//!
//! Common types, utilities, and shared abstractions for Crafthand.
//!
//! This crate provides foundational types used across all Crafthand crates:
//! - Identifiers and ID types (EntryTypeId, ItemId, CategoryId, etc.)
//! - Version information for schemas
//! - Common error types
//! - Stable hashing helpers
//! - A bounded event bus for countable events
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod events;
pub mod hash;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::hash::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;
