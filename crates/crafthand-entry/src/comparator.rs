//! Per-item comparators.
//!
//! Items of one kind can carry state that matters for some recipes and not
//! for others (a potion's effect, a dye colour in the tag). A comparator
//! registered for an item kind decides which parts of that state identify
//! the item. A comparator that fails is disabled for the rest of the process.

use ahash::AHashMap;
use crafthand_common::{combine, stable_hash, ItemId};
use crossbeam_channel::Sender;
use dashmap::DashSet;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::context::ComparisonContext;
use crate::error::ComparatorError;
use crate::events::EntryEvent;
use crate::stack::ItemStack;

/// Hashes the identity-relevant state of one item kind.
pub trait ItemComparator: Send + Sync {
    /// Returns the hash of `stack` under `context`.
    fn hash(&self, context: ComparisonContext, stack: &ItemStack) -> Result<u64, ComparatorError>;
}

impl<F> ItemComparator for F
where
    F: Fn(ComparisonContext, &ItemStack) -> Result<u64, ComparatorError> + Send + Sync,
{
    fn hash(&self, context: ComparisonContext, stack: &ItemStack) -> Result<u64, ComparatorError> {
        self(context, stack)
    }
}

/// Comparators keyed by item kind, with a circuit breaker.
pub struct ItemComparatorRegistry {
    comparators: RwLock<AHashMap<ItemId, Arc<dyn ItemComparator>>>,
    disabled: DashSet<ItemId, ahash::RandomState>,
    failures: AtomicU64,
    events: Option<Sender<EntryEvent>>,
}

impl Default for ItemComparatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemComparatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            comparators: RwLock::new(AHashMap::new()),
            disabled: DashSet::with_hasher(ahash::RandomState::new()),
            failures: AtomicU64::new(0),
            events: None,
        }
    }

    /// Publishes [`EntryEvent`]s on `sender`.
    #[must_use]
    pub fn with_events(mut self, sender: Sender<EntryEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Registers (or replaces) the comparator for an item kind.
    ///
    /// A kind that was disabled stays disabled.
    pub fn register(&self, item: ItemId, comparator: impl ItemComparator + 'static) {
        debug!("Registering comparator for item {:?}", item);
        self.comparators.write().insert(item, Arc::new(comparator));
    }

    /// Check if a comparator is registered for `item`.
    #[must_use]
    pub fn has_comparator(&self, item: ItemId) -> bool {
        self.comparators.read().contains_key(&item)
    }

    /// Check if `item` was disabled by a comparator failure.
    #[must_use]
    pub fn is_disabled(&self, item: ItemId) -> bool {
        self.disabled.contains(&item)
    }

    /// Number of comparator failures seen so far.
    #[must_use]
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Returns the identity hash of `stack` under `context`, or `None` if its
    /// kind is disabled.
    ///
    /// Under [`ComparisonContext::Exact`] the full item state always takes
    /// part and a comparator can only refine it. Under
    /// [`ComparisonContext::Fuzzy`] the comparator alone decides, and with no
    /// comparator the kind is all that matters.
    pub fn hash_of(&self, stack: &ItemStack, context: ComparisonContext) -> Option<u64> {
        let item = stack.id();
        if self.is_disabled(item) {
            return None;
        }
        let base = default_hash(stack, context);
        let comparator = self.comparators.read().get(&item).cloned();
        let Some(comparator) = comparator else {
            return Some(base);
        };
        match comparator.hash(context, stack) {
            Ok(hash) if context.is_exact() => Some(combine(base, hash)),
            Ok(hash) => Some(hash),
            Err(error) => {
                self.disable(error);
                None
            }
        }
    }

    fn disable(&self, error: ComparatorError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if !self.disabled.insert(error.item) {
            return;
        }
        warn!(
            "Disabling comparator for item {:?}: {}",
            error.item, error.reason
        );
        if let Some(events) = &self.events {
            let _ = events.try_send(EntryEvent::ComparatorDisabled {
                item: error.item,
                reason: error.reason,
            });
        }
    }
}

impl std::fmt::Debug for ItemComparatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemComparatorRegistry")
            .field("comparators", &self.comparators.read().len())
            .field("disabled", &self.disabled.len())
            .field("failures", &self.failure_count())
            .finish()
    }
}

fn default_hash(stack: &ItemStack, context: ComparisonContext) -> u64 {
    match context {
        ComparisonContext::Exact => stable_hash(&(
            stack.damage,
            &stack.enchantments,
            &stack.custom_name,
            &stack.tag,
        )),
        ComparisonContext::Fuzzy => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::ItemKind;
    use crafthand_common::{EventBus, Identifier};

    fn potion() -> ItemKind {
        ItemKind::new(ItemId::new(373))
    }

    fn effect_hash(_ctx: ComparisonContext, stack: &ItemStack) -> Result<u64, ComparatorError> {
        Ok(stable_hash(&stack.tag.get("effect")))
    }

    fn corrupt_tag(_ctx: ComparisonContext, stack: &ItemStack) -> Result<u64, ComparatorError> {
        Err(ComparatorError::new(stack.id(), "corrupt tag"))
    }

    #[test]
    fn test_default_exact_hash_sees_enchantments() {
        let registry = ItemComparatorRegistry::new();
        let plain = potion().stack(1);
        let enchanted = plain
            .clone()
            .with_enchantment(Identifier::parse("mending").expect("valid id"), 1);

        let exact = ComparisonContext::Exact;
        assert_ne!(registry.hash_of(&plain, exact), registry.hash_of(&enchanted, exact));

        let fuzzy = ComparisonContext::Fuzzy;
        assert_eq!(registry.hash_of(&plain, fuzzy), registry.hash_of(&enchanted, fuzzy));
    }

    #[test]
    fn test_comparator_refines_fuzzy() {
        let registry = ItemComparatorRegistry::new();
        registry.register(potion().id, effect_hash);
        assert!(registry.has_comparator(potion().id));

        let healing = potion().stack(1).with_tag("effect", "healing");
        let poison = potion().stack(1).with_tag("effect", "poison");
        let named = healing.clone().with_custom_name("Lunch");

        let fuzzy = ComparisonContext::Fuzzy;
        assert_ne!(registry.hash_of(&healing, fuzzy), registry.hash_of(&poison, fuzzy));
        assert_eq!(registry.hash_of(&healing, fuzzy), registry.hash_of(&named, fuzzy));

        let exact = ComparisonContext::Exact;
        assert_ne!(registry.hash_of(&healing, exact), registry.hash_of(&named, exact));
    }

    #[test]
    fn test_failing_comparator_is_disabled_once() {
        let bus = EventBus::new(8);
        let registry = ItemComparatorRegistry::new().with_events(bus.sender());
        registry.register(potion().id, corrupt_tag);

        let stack = potion().stack(1);
        assert_eq!(registry.hash_of(&stack, ComparisonContext::Exact), None);
        assert!(registry.is_disabled(potion().id));
        assert_eq!(registry.failure_count(), 1);

        // Disabled kinds never reach the comparator again.
        assert_eq!(registry.hash_of(&stack, ComparisonContext::Fuzzy), None);
        assert_eq!(registry.failure_count(), 1);

        let events = bus.drain();
        assert_eq!(
            events,
            vec![EntryEvent::ComparatorDisabled {
                item: potion().id,
                reason: "corrupt tag".to_string(),
            }]
        );
    }

    #[test]
    fn test_other_items_unaffected_by_breaker() {
        let registry = ItemComparatorRegistry::new();
        registry.register(potion().id, corrupt_tag);
        let _ = registry.hash_of(&potion().stack(1), ComparisonContext::Exact);

        let stone = ItemKind::new(ItemId::new(1)).stack(1);
        assert!(registry
            .hash_of(&stone, ComparisonContext::Exact)
            .is_some());
    }
}
