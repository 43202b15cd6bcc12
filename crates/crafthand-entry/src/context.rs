//! Comparison strictness.

use serde::{Deserialize, Serialize};

/// How strictly two entries are compared.
///
/// Equality and hashing must agree within one context: entries equal under a
/// context hash to the same value under that context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComparisonContext {
    /// Full identity-relevant state (enchantments, names, damage, tags).
    #[default]
    Exact,
    /// Collapses cosmetic and variant differences.
    Fuzzy,
}

impl ComparisonContext {
    /// Check if this is the exact context.
    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(self, Self::Exact)
    }

    /// Check if this is the fuzzy context.
    #[must_use]
    pub const fn is_fuzzy(self) -> bool {
        matches!(self, Self::Fuzzy)
    }

    /// Get all contexts.
    #[must_use]
    pub fn all() -> &'static [ComparisonContext] {
        &[Self::Exact, Self::Fuzzy]
    }
}
