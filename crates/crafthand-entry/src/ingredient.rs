//! Ingredients: the acceptable alternatives for one recipe slot.

use std::sync::Arc;

use crate::context::ComparisonContext;
use crate::entry::EntryStack;
use crate::registry::EntryRegistry;

/// Ordered alternatives, any one of which fills a recipe slot.
///
/// Immutable once built; clones share the alternatives. Empty stacks are
/// dropped on construction, so an ingredient with no alternatives can never
/// be satisfied.
#[derive(Debug, Clone)]
pub struct EntryIngredient {
    entries: Arc<[EntryStack]>,
}

impl Default for EntryIngredient {
    fn default() -> Self {
        Self::empty()
    }
}

impl EntryIngredient {
    /// Creates an ingredient from alternatives, in preference order.
    pub fn of(entries: impl IntoIterator<Item = EntryStack>) -> Self {
        let entries: Vec<EntryStack> = entries.into_iter().filter(|e| !e.is_empty()).collect();
        Self {
            entries: entries.into(),
        }
    }

    /// Creates an ingredient with one alternative.
    #[must_use]
    pub fn single(entry: EntryStack) -> Self {
        Self::of([entry])
    }

    /// Creates an ingredient no stack satisfies.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }

    /// Get number of alternatives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no alternatives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates alternatives in preference order.
    pub fn iter(&self) -> std::slice::Iter<'_, EntryStack> {
        self.entries.iter()
    }

    /// Get an alternative by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&EntryStack> {
        self.entries.get(index)
    }

    /// Returns the alternatives.
    #[must_use]
    pub fn as_slice(&self) -> &[EntryStack] {
        &self.entries
    }

    /// Check if `stack` matches any alternative under `context`.
    #[must_use]
    pub fn is_satisfied_by(
        &self,
        registry: &EntryRegistry,
        stack: &EntryStack,
        context: ComparisonContext,
    ) -> bool {
        self.entries
            .iter()
            .any(|alternative| registry.equals(alternative, stack, context))
    }
}

impl<'a> IntoIterator for &'a EntryIngredient {
    type Item = &'a EntryStack;
    type IntoIter = std::slice::Iter<'a, EntryStack>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<EntryStack> for EntryIngredient {
    fn from_iter<I: IntoIterator<Item = EntryStack>>(iter: I) -> Self {
        Self::of(iter)
    }
}
