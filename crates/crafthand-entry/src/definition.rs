//! Entry definitions.
//!
//! Every entry type registers one definition: a fixed table of operations
//! (emptiness, amounts, equality, hashing, stacking limits, serialization)
//! for the values of that type. Stacks carry a shared handle to their
//! definition, so no lookup happens per operation.

use crafthand_common::{EntryTypeId, Identifier};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::ComparisonContext;
use crate::entry::EntryStack;
use crate::error::{EntryError, EntryResult};

/// Type-erased entry value.
pub(crate) type DynValue = Arc<dyn Any + Send + Sync>;

/// Operations governing the values of one entry type.
pub trait EntryDefinition: Send + Sync + 'static {
    /// Value type carried by stacks of this entry type.
    type Value: Clone + fmt::Debug + Send + Sync + 'static;

    /// Returns the type id this definition is registered under.
    fn entry_type(&self) -> EntryTypeId;

    /// Check if a value represents nothing.
    fn is_empty(&self, value: &Self::Value) -> bool;

    /// Returns the quantity held by a value.
    fn amount(&self, value: &Self::Value) -> u64;

    /// Returns a copy of `value` holding `amount`.
    fn with_amount(&self, value: &Self::Value, amount: u64) -> Self::Value;

    /// Quantity used by [`EntryDefinition::normalize`].
    fn reference_amount(&self) -> u64 {
        1
    }

    /// Returns a copy with the reference quantity, for quantity-blind comparison and storage.
    fn normalize(&self, value: &Self::Value) -> Self::Value {
        self.with_amount(value, self.reference_amount())
    }

    /// Same-type equality under `context`. Amounts never participate.
    fn equals(&self, left: &Self::Value, right: &Self::Value, context: ComparisonContext) -> bool;

    /// Hash consistent with [`EntryDefinition::equals`] under `context`.
    fn hash(&self, value: &Self::Value, context: ComparisonContext) -> u64;

    /// Identifier of the underlying thing a value refers to, if it has one.
    fn identifier(&self, _value: &Self::Value) -> Option<Identifier> {
        None
    }

    /// Largest amount one container slot may hold.
    fn max_stack_size(&self, _value: &Self::Value) -> u32 {
        u32::MAX
    }

    /// Check if automatic transfers may consume this value.
    fn auto_consumable(&self, _value: &Self::Value) -> bool {
        true
    }

    /// Writes a value to JSON.
    fn save(&self, value: &Self::Value) -> EntryResult<serde_json::Value>;

    /// Reads a value from JSON.
    fn read(&self, data: &serde_json::Value) -> EntryResult<Self::Value>;
}

/// Object-safe view of [`EntryDefinition`] used by [`EntryStack`].
pub(crate) trait DynDefinition: Send + Sync {
    fn entry_type(&self) -> EntryTypeId;
    fn is_empty(&self, value: &dyn Any) -> bool;
    fn amount(&self, value: &dyn Any) -> u64;
    fn with_amount(&self, value: &dyn Any, amount: u64) -> Option<DynValue>;
    fn normalize(&self, value: &dyn Any) -> Option<DynValue>;
    fn equals(&self, left: &dyn Any, right: &dyn Any, context: ComparisonContext) -> bool;
    fn hash(&self, value: &dyn Any, context: ComparisonContext) -> u64;
    fn identifier(&self, value: &dyn Any) -> Option<Identifier>;
    fn max_stack_size(&self, value: &dyn Any) -> u32;
    fn auto_consumable(&self, value: &dyn Any) -> bool;
    fn save(&self, value: &dyn Any) -> EntryResult<serde_json::Value>;
    fn read(&self, data: &serde_json::Value) -> EntryResult<DynValue>;
    fn fmt_value(&self, value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<D: EntryDefinition> DynDefinition for D {
    fn entry_type(&self) -> EntryTypeId {
        EntryDefinition::entry_type(self)
    }

    fn is_empty(&self, value: &dyn Any) -> bool {
        value
            .downcast_ref::<D::Value>()
            .map_or(true, |v| EntryDefinition::is_empty(self, v))
    }

    fn amount(&self, value: &dyn Any) -> u64 {
        value
            .downcast_ref::<D::Value>()
            .map_or(0, |v| EntryDefinition::amount(self, v))
    }

    fn with_amount(&self, value: &dyn Any, amount: u64) -> Option<DynValue> {
        let value = value.downcast_ref::<D::Value>()?;
        Some(Arc::new(EntryDefinition::with_amount(self, value, amount)))
    }

    fn normalize(&self, value: &dyn Any) -> Option<DynValue> {
        let value = value.downcast_ref::<D::Value>()?;
        Some(Arc::new(EntryDefinition::normalize(self, value)))
    }

    fn equals(&self, left: &dyn Any, right: &dyn Any, context: ComparisonContext) -> bool {
        match (
            left.downcast_ref::<D::Value>(),
            right.downcast_ref::<D::Value>(),
        ) {
            (Some(left), Some(right)) => EntryDefinition::equals(self, left, right, context),
            _ => false,
        }
    }

    fn hash(&self, value: &dyn Any, context: ComparisonContext) -> u64 {
        value
            .downcast_ref::<D::Value>()
            .map_or(0, |v| EntryDefinition::hash(self, v, context))
    }

    fn identifier(&self, value: &dyn Any) -> Option<Identifier> {
        value
            .downcast_ref::<D::Value>()
            .and_then(|v| EntryDefinition::identifier(self, v))
    }

    fn max_stack_size(&self, value: &dyn Any) -> u32 {
        value
            .downcast_ref::<D::Value>()
            .map_or(0, |v| EntryDefinition::max_stack_size(self, v))
    }

    fn auto_consumable(&self, value: &dyn Any) -> bool {
        value
            .downcast_ref::<D::Value>()
            .is_some_and(|v| EntryDefinition::auto_consumable(self, v))
    }

    fn save(&self, value: &dyn Any) -> EntryResult<serde_json::Value> {
        match value.downcast_ref::<D::Value>() {
            Some(v) => EntryDefinition::save(self, v),
            None => Err(EntryError::Serialization(format!(
                "value does not belong to {}",
                EntryDefinition::entry_type(self)
            ))),
        }
    }

    fn read(&self, data: &serde_json::Value) -> EntryResult<DynValue> {
        let value = EntryDefinition::read(self, data)?;
        Ok(Arc::new(value))
    }

    fn fmt_value(&self, value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match value.downcast_ref::<D::Value>() {
            Some(v) => fmt::Debug::fmt(v, f),
            None => f.write_str("<foreign value>"),
        }
    }
}

/// Typed handle to a registered entry type.
pub struct EntryType<D: EntryDefinition> {
    definition: Arc<D>,
}

impl<D: EntryDefinition> EntryType<D> {
    /// Wraps a definition.
    #[must_use]
    pub fn new(definition: D) -> Self {
        Self {
            definition: Arc::new(definition),
        }
    }

    /// Returns the type id.
    #[must_use]
    pub fn id(&self) -> EntryTypeId {
        EntryDefinition::entry_type(&*self.definition)
    }

    /// Returns the definition.
    #[must_use]
    pub fn definition(&self) -> &D {
        &self.definition
    }

    /// Creates a stack of this type.
    #[must_use]
    pub fn stack(&self, value: D::Value) -> EntryStack {
        EntryStack::from_parts(Arc::clone(&self.definition), value)
    }

    /// Returns the typed value of `stack` if it belongs to this type.
    #[must_use]
    pub fn value_of<'a>(&self, stack: &'a EntryStack) -> Option<&'a D::Value> {
        if stack.is_type(&self.id()) {
            stack.value::<D::Value>()
        } else {
            None
        }
    }

    /// Like [`EntryType::value_of`], reporting the stack's actual type on mismatch.
    pub fn try_value_of<'a>(&self, stack: &'a EntryStack) -> EntryResult<&'a D::Value> {
        self.value_of(stack).ok_or_else(|| EntryError::TypeMismatch {
            expected: self.id(),
            actual: stack.entry_type(),
        })
    }

    pub(crate) fn dyn_definition(&self) -> Arc<dyn DynDefinition> {
        Arc::clone(&self.definition) as Arc<dyn DynDefinition>
    }
}

impl<D: EntryDefinition> Clone for EntryType<D> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
        }
    }
}

impl<D: EntryDefinition> fmt::Debug for EntryType<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntryType").field(&self.id()).finish()
    }
}
