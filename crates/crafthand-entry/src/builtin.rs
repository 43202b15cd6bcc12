//! Built-in item and fluid entry types.

use crafthand_common::{combine, stable_hash, EntryTypeId, Identifier, DEFAULT_NAMESPACE};
use std::sync::Arc;

use crate::comparator::ItemComparatorRegistry;
use crate::context::ComparisonContext;
use crate::definition::{EntryDefinition, EntryType};
use crate::error::{EntryError, EntryResult};
use crate::stack::{FluidStack, ItemStack, BUCKET_AMOUNT};

/// Type id of physical items.
#[must_use]
pub fn item_type_id() -> EntryTypeId {
    EntryTypeId::new(Identifier::builtin("item"))
}

/// Type id of fluids.
#[must_use]
pub fn fluid_type_id() -> EntryTypeId {
    EntryTypeId::new(Identifier::builtin("fluid"))
}

/// Definition of physical items.
///
/// Two items are equal when they share a kind and the comparator registry
/// gives them the same identity hash. Kinds whose comparator was disabled
/// never compare equal under [`ComparisonContext::Exact`].
#[derive(Debug, Clone)]
pub struct ItemEntryDefinition {
    comparators: Arc<ItemComparatorRegistry>,
}

impl ItemEntryDefinition {
    /// Creates the definition over a comparator registry.
    #[must_use]
    pub fn new(comparators: Arc<ItemComparatorRegistry>) -> Self {
        Self { comparators }
    }

    /// Returns the comparator registry.
    #[must_use]
    pub fn comparators(&self) -> &Arc<ItemComparatorRegistry> {
        &self.comparators
    }
}

impl EntryDefinition for ItemEntryDefinition {
    type Value = ItemStack;

    fn entry_type(&self) -> EntryTypeId {
        item_type_id()
    }

    fn is_empty(&self, value: &ItemStack) -> bool {
        value.is_empty()
    }

    fn amount(&self, value: &ItemStack) -> u64 {
        u64::from(value.count)
    }

    fn with_amount(&self, value: &ItemStack, amount: u64) -> ItemStack {
        value.with_count(u32::try_from(amount).unwrap_or(u32::MAX))
    }

    fn equals(&self, left: &ItemStack, right: &ItemStack, context: ComparisonContext) -> bool {
        if left.id() != right.id() {
            return false;
        }
        match (
            self.comparators.hash_of(left, context),
            self.comparators.hash_of(right, context),
        ) {
            (Some(a), Some(b)) => a == b,
            _ => context.is_fuzzy(),
        }
    }

    fn hash(&self, value: &ItemStack, context: ComparisonContext) -> u64 {
        let kind = stable_hash(&value.id());
        combine(kind, self.comparators.hash_of(value, context).unwrap_or(0))
    }

    fn identifier(&self, value: &ItemStack) -> Option<Identifier> {
        Identifier::new(DEFAULT_NAMESPACE, &format!("item/{}", value.id().raw())).ok()
    }

    fn max_stack_size(&self, value: &ItemStack) -> u32 {
        value.kind.max_stack_size
    }

    fn auto_consumable(&self, value: &ItemStack) -> bool {
        !value.is_damaged() && !value.is_enchanted() && !value.has_custom_name()
    }

    fn save(&self, value: &ItemStack) -> EntryResult<serde_json::Value> {
        serde_json::to_value(value).map_err(|e| EntryError::Serialization(e.to_string()))
    }

    fn read(&self, data: &serde_json::Value) -> EntryResult<ItemStack> {
        serde_json::from_value(data.clone()).map_err(|e| EntryError::Deserialization(e.to_string()))
    }
}

/// Definition of fluids. Amounts never affect identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct FluidEntryDefinition;

impl EntryDefinition for FluidEntryDefinition {
    type Value = FluidStack;

    fn entry_type(&self) -> EntryTypeId {
        fluid_type_id()
    }

    fn is_empty(&self, value: &FluidStack) -> bool {
        value.amount == 0
    }

    fn amount(&self, value: &FluidStack) -> u64 {
        value.amount
    }

    fn with_amount(&self, value: &FluidStack, amount: u64) -> FluidStack {
        FluidStack::new(value.fluid, amount)
    }

    fn reference_amount(&self) -> u64 {
        BUCKET_AMOUNT
    }

    fn equals(&self, left: &FluidStack, right: &FluidStack, _context: ComparisonContext) -> bool {
        left.fluid == right.fluid
    }

    fn hash(&self, value: &FluidStack, _context: ComparisonContext) -> u64 {
        stable_hash(&value.fluid)
    }

    fn identifier(&self, value: &FluidStack) -> Option<Identifier> {
        Identifier::new(DEFAULT_NAMESPACE, &format!("fluid/{}", value.fluid.raw())).ok()
    }

    fn save(&self, value: &FluidStack) -> EntryResult<serde_json::Value> {
        serde_json::to_value(value).map_err(|e| EntryError::Serialization(e.to_string()))
    }

    fn read(&self, data: &serde_json::Value) -> EntryResult<FluidStack> {
        serde_json::from_value(data.clone()).map_err(|e| EntryError::Deserialization(e.to_string()))
    }
}

/// Handles to the built-in entry types.
#[derive(Debug, Clone)]
pub struct BuiltinTypes {
    /// Item type
    pub item: EntryType<ItemEntryDefinition>,
    /// Fluid type
    pub fluid: EntryType<FluidEntryDefinition>,
}

impl BuiltinTypes {
    /// Creates the built-in types over a comparator registry.
    #[must_use]
    pub fn new(comparators: Arc<ItemComparatorRegistry>) -> Self {
        Self {
            item: EntryType::new(ItemEntryDefinition::new(comparators)),
            fluid: EntryType::new(FluidEntryDefinition),
        }
    }

    /// Returns the comparator registry used by the item type.
    #[must_use]
    pub fn comparators(&self) -> &Arc<ItemComparatorRegistry> {
        self.item.definition().comparators()
    }
}
