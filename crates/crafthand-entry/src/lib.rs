//! # Crafthand Entry
//!
//! Entry types and the comparison engine.
//!
//! This crate provides:
//! - Entry definitions (per-type equality, hashing, amounts, serialization)
//! - Built-in item and fluid types
//! - Per-item comparators with a circuit breaker
//! - Cross-type bridges
//! - Ingredients and recipe displays

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod bridge;
pub mod builtin;
pub mod comparator;
pub mod context;
pub mod definition;
pub mod display;
pub mod entry;
pub mod error;
pub mod events;
pub mod ingredient;
pub mod registry;
pub mod stack;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bridge::*;
    pub use crate::builtin::*;
    pub use crate::comparator::*;
    pub use crate::context::*;
    pub use crate::definition::{EntryDefinition, EntryType};
    pub use crate::display::*;
    pub use crate::entry::*;
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::ingredient::*;
    pub use crate::registry::*;
    pub use crate::stack::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crafthand_common::{FluidId, Identifier, ItemId};
    use proptest::prelude::*;

    const BUCKET: ItemId = ItemId::new(325);
    const LAVA: FluidId = FluidId::new(2);

    fn engine() -> (EntryRegistry, BuiltinTypes) {
        let (mut registry, types) = EntryRegistry::with_builtins();
        let bridge = FluidContainerBridge::new(types.item.clone(), types.fluid.clone())
            .with_container(BUCKET, LAVA, BUCKET_AMOUNT);
        registry
            .register_bridge(item_type_id(), fluid_type_id(), bridge)
            .expect("bridge registers");
        (registry, types)
    }

    fn enchantment(name: &str) -> Identifier {
        Identifier::parse(name).expect("valid id")
    }

    #[test]
    fn test_exact_distinguishes_enchant_and_name() {
        let (registry, types) = engine();
        let pick = ItemKind::new(ItemId::new(278)).with_max_damage(1561);
        let plain = types.item.stack(pick.stack(1));
        let enchanted = types
            .item
            .stack(pick.stack(1).with_enchantment(enchantment("efficiency"), 5));
        let named = types.item.stack(pick.stack(1).with_custom_name("Digger"));

        for other in [&enchanted, &named] {
            assert!(!registry.equals_exact(&plain, other));
            assert!(registry.equals_fuzzy(&plain, other));
            assert_eq!(registry.hash_fuzzy(&plain), registry.hash_fuzzy(other));
        }
    }

    #[test]
    fn test_comparator_failure_isolated_to_item() {
        let (registry, types) = engine();
        let broken = ItemKind::new(ItemId::new(900));
        types.comparators().register(
            broken.id,
            |_ctx: ComparisonContext, stack: &ItemStack| -> Result<u64, ComparatorError> {
                Err(ComparatorError::new(stack.id(), "plugin bug"))
            },
        );
        let a = types.item.stack(broken.stack(1));
        let b = types.item.stack(broken.stack(5));
        assert!(!registry.equals_exact(&a, &b));
        assert!(registry.equals_fuzzy(&a, &b));
        assert!(types.comparators().is_disabled(broken.id));

        let dirt = types.item.stack(ItemKind::new(ItemId::new(3)).stack(1));
        assert!(registry.equals_exact(&dirt, &dirt.with_amount(9)));
    }

    fn arb_item() -> impl Strategy<Value = ItemStack> {
        (
            prop_oneof![Just(1u32), Just(2), Just(BUCKET.raw())],
            1u32..64,
            0u32..3,
            proptest::option::of(prop_oneof![Just("Bob"), Just("Alice")]),
            proptest::bool::ANY,
        )
            .prop_map(|(id, count, damage, name, enchanted)| {
                let mut stack = ItemKind::new(ItemId::new(id))
                    .stack(count)
                    .with_damage(damage);
                if let Some(name) = name {
                    stack = stack.with_custom_name(name);
                }
                if enchanted {
                    stack = stack.with_enchantment(enchantment("mending"), 1);
                }
                stack
            })
    }

    #[derive(Debug, Clone)]
    enum RawEntry {
        Item(ItemStack),
        Fluid(FluidStack),
    }

    fn arb_value() -> impl Strategy<Value = RawEntry> {
        prop_oneof![
            arb_item().prop_map(RawEntry::Item),
            (1u32..3, 1u64..5000)
                .prop_map(|(id, amount)| RawEntry::Fluid(FluidStack::new(FluidId::new(id), amount))),
        ]
    }

    fn to_entry(types: &BuiltinTypes, value: RawEntry) -> EntryStack {
        match value {
            RawEntry::Item(item) => types.item.stack(item),
            RawEntry::Fluid(fluid) => types.fluid.stack(fluid),
        }
    }

    proptest! {
        #[test]
        fn test_equal_entries_hash_equal(a in arb_value(), b in arb_value()) {
            let (registry, types) = engine();
            let (a, b) = (to_entry(&types, a), to_entry(&types, b));
            for ctx in ComparisonContext::all() {
                if registry.equals(&a, &b, *ctx) {
                    prop_assert_eq!(registry.hash(&a, *ctx), registry.hash(&b, *ctx));
                }
                prop_assert_eq!(registry.equals(&a, &b, *ctx), registry.equals(&b, &a, *ctx));
            }
        }

        #[test]
        fn test_exact_implies_fuzzy(a in arb_item(), b in arb_item()) {
            let (registry, types) = engine();
            let (a, b) = (types.item.stack(a), types.item.stack(b));
            if registry.equals_exact(&a, &b) {
                prop_assert!(registry.equals_fuzzy(&a, &b));
            }
        }
    }
}
