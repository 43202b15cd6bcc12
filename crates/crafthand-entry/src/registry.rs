//! Entry type registry and comparison engine.

use ahash::AHashMap;
use crafthand_common::EntryTypeId;
use std::sync::Arc;
use tracing::debug;

use crate::bridge::{BridgeOutcome, EntryTypeBridge};
use crate::builtin::BuiltinTypes;
use crate::comparator::ItemComparatorRegistry;
use crate::context::ComparisonContext;
use crate::definition::{DynDefinition, EntryDefinition, EntryType};
use crate::entry::{empty_type_id, EntryStack, SerializedEntry};
use crate::error::{EntryError, EntryResult};

/// Registered entry types and the bridges between them.
///
/// Registration takes `&mut self` and happens while the host boots; all
/// comparisons take `&self`.
#[derive(Default)]
pub struct EntryRegistry {
    definitions: AHashMap<EntryTypeId, Arc<dyn DynDefinition>>,
    bridges: AHashMap<(EntryTypeId, EntryTypeId), Vec<Arc<dyn EntryTypeBridge>>>,
    /// The one bridge target of each source type.
    targets: AHashMap<EntryTypeId, EntryTypeId>,
}

impl EntryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the item and fluid types.
    #[must_use]
    pub fn with_builtins() -> (Self, BuiltinTypes) {
        Self::with_comparators(Arc::new(ItemComparatorRegistry::new()))
    }

    /// Creates a registry holding the item and fluid types, with items
    /// compared through `comparators`.
    #[must_use]
    pub fn with_comparators(comparators: Arc<ItemComparatorRegistry>) -> (Self, BuiltinTypes) {
        let types = BuiltinTypes::new(comparators);
        let mut registry = Self::new();
        registry.insert(types.item.id(), types.item.dyn_definition());
        registry.insert(types.fluid.id(), types.fluid.dyn_definition());
        (registry, types)
    }

    fn insert(&mut self, id: EntryTypeId, definition: Arc<dyn DynDefinition>) {
        debug!("Registered entry type {}", id);
        self.definitions.insert(id, definition);
    }

    /// Registers a new entry type.
    pub fn register_type<D: EntryDefinition>(
        &mut self,
        definition: D,
    ) -> EntryResult<EntryType<D>> {
        let entry_type = EntryType::new(definition);
        let id = entry_type.id();
        if id == empty_type_id() || self.definitions.contains_key(&id) {
            return Err(EntryError::DuplicateType(id));
        }
        self.insert(id, entry_type.dyn_definition());
        Ok(entry_type)
    }

    /// Check if a type is registered.
    #[must_use]
    pub fn contains_type(&self, id: &EntryTypeId) -> bool {
        self.definitions.contains_key(id)
    }

    /// Get number of registered types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.definitions.len()
    }

    /// Registers a bridge from `source` to `target`.
    ///
    /// Bridges between one pair are tried in registration order. A source
    /// type bridges to a single target type; a bridge to a second target is
    /// rejected, as is one that would close a cycle in the type graph.
    /// Chains such as item -> fluid -> energy are allowed.
    pub fn register_bridge(
        &mut self,
        source: EntryTypeId,
        target: EntryTypeId,
        bridge: impl EntryTypeBridge + 'static,
    ) -> EntryResult<()> {
        for id in [&source, &target] {
            if !self.contains_type(id) {
                return Err(EntryError::UnknownType(id.clone()));
            }
        }
        if source == target || self.reaches(&target, &source) {
            return Err(EntryError::BridgeCycle {
                source_type: source,
                target_type: target,
            });
        }
        if let Some(existing) = self.targets.get(&source) {
            if *existing != target {
                return Err(EntryError::BridgeConflict {
                    existing_target: existing.clone(),
                    source_type: source,
                    target_type: target,
                });
            }
        }
        debug!("Registered bridge {} -> {}", source, target);
        self.targets.insert(source.clone(), target.clone());
        self.bridges
            .entry((source, target))
            .or_default()
            .push(Arc::new(bridge));
        Ok(())
    }

    /// Returns the bridges registered from `source` to `target`.
    #[must_use]
    pub fn bridges_for(
        &self,
        source: &EntryTypeId,
        target: &EntryTypeId,
    ) -> &[Arc<dyn EntryTypeBridge>] {
        self.bridges
            .get(&(source.clone(), target.clone()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the type stacks of `source` bridge to, if any.
    #[must_use]
    pub fn bridge_target(&self, source: &EntryTypeId) -> Option<&EntryTypeId> {
        self.targets.get(source)
    }

    fn reaches(&self, from: &EntryTypeId, to: &EntryTypeId) -> bool {
        let mut current = from;
        // Each type has at most one target and the graph is acyclic.
        for _ in 0..=self.definitions.len() {
            if current == to {
                return true;
            }
            match self.targets.get(current) {
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Compares two stacks under `context`.
    ///
    /// Stacks of one type defer to their definition. Stacks of different
    /// types are equal when the first applicable bridge out of either side
    /// yields a candidate the other side's definition accepts. Amounts never
    /// participate.
    #[must_use]
    pub fn equals(&self, a: &EntryStack, b: &EntryStack, context: ComparisonContext) -> bool {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }
        if a.same_type(b) {
            return a.definition_equals(b, context);
        }
        self.bridged_equals(a, b, context) || self.bridged_equals(b, a, context)
    }

    fn bridged_equals(&self, from: &EntryStack, to: &EntryStack, context: ComparisonContext) -> bool {
        match self.applicable_bridge(from) {
            Some((target, BridgeOutcome::Bridged(candidates))) if to.is_type(&target) => {
                candidates.iter().any(|candidate| {
                    candidate.same_type(to) && candidate.definition_equals(to, context)
                })
            },
            _ => false,
        }
    }

    /// Runs the bridges out of the stack's type until one applies.
    ///
    /// Equality and hashing both go through here, so they agree on which
    /// bridge speaks for a stack.
    fn applicable_bridge(&self, stack: &EntryStack) -> Option<(EntryTypeId, BridgeOutcome)> {
        let source = stack.entry_type()?;
        let target = self.targets.get(&source)?;
        self.bridges_for(&source, target)
            .iter()
            .map(|bridge| bridge.bridge(stack, target))
            .find(|outcome| outcome.first().is_some())
            .map(|outcome| (target.clone(), outcome))
    }

    /// Hashes a stack under `context`; 0 for the empty stack.
    ///
    /// A stack that bridges out of its type is hashed as its first bridged
    /// candidate, so stacks equal through a bridge hash alike.
    #[must_use]
    pub fn hash(&self, stack: &EntryStack, context: ComparisonContext) -> u64 {
        self.canonical(stack).definition_hash(context)
    }

    /// Follows the applicable bridge out of each type until none applies.
    fn canonical(&self, stack: &EntryStack) -> EntryStack {
        let mut current = stack.clone();
        // The type graph is acyclic, so a chain visits each type at most once.
        for _ in 0..self.definitions.len() {
            match self.bridge_once(&current) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    fn bridge_once(&self, stack: &EntryStack) -> Option<EntryStack> {
        let (_, outcome) = self.applicable_bridge(stack)?;
        outcome.first().cloned()
    }

    /// Returns a copy at the type's reference quantity.
    #[must_use]
    pub fn normalize(&self, stack: &EntryStack) -> EntryStack {
        stack.normalize()
    }

    /// Compares under [`ComparisonContext::Exact`].
    #[must_use]
    pub fn equals_exact(&self, a: &EntryStack, b: &EntryStack) -> bool {
        self.equals(a, b, ComparisonContext::Exact)
    }

    /// Compares under [`ComparisonContext::Fuzzy`].
    #[must_use]
    pub fn equals_fuzzy(&self, a: &EntryStack, b: &EntryStack) -> bool {
        self.equals(a, b, ComparisonContext::Fuzzy)
    }

    /// Hashes under [`ComparisonContext::Exact`].
    #[must_use]
    pub fn hash_exact(&self, stack: &EntryStack) -> u64 {
        self.hash(stack, ComparisonContext::Exact)
    }

    /// Hashes under [`ComparisonContext::Fuzzy`].
    #[must_use]
    pub fn hash_fuzzy(&self, stack: &EntryStack) -> u64 {
        self.hash(stack, ComparisonContext::Fuzzy)
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Reads a serialized stack, resolving its type through this registry.
    pub fn read_entry(&self, entry: &SerializedEntry) -> EntryResult<EntryStack> {
        if entry.is_empty() {
            return Ok(EntryStack::empty());
        }
        let definition = self
            .definitions
            .get(&entry.entry_type)
            .ok_or_else(|| EntryError::UnknownType(entry.entry_type.clone()))?;
        EntryStack::read_with(Arc::clone(definition), &entry.value)
    }
}

impl std::fmt::Debug for EntryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.definitions.keys().collect();
        types.sort();
        f.debug_struct("EntryRegistry")
            .field("types", &types)
            .field("bridges", &self.bridges.len())
            .finish()
    }
}
