//! Entry stacks, the unit of everything recipes and containers hold.

use crafthand_common::{EntryTypeId, Identifier};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::ComparisonContext;
use crate::definition::{DynDefinition, DynValue, EntryDefinition};
use crate::error::EntryResult;

/// Type id written for the empty stack.
#[must_use]
pub fn empty_type_id() -> EntryTypeId {
    EntryTypeId::new(Identifier::builtin("empty"))
}

#[derive(Clone)]
struct StackInner {
    definition: Arc<dyn DynDefinition>,
    value: DynValue,
}

/// A typed value plus its amount.
///
/// Stacks are immutable; every modifier returns a new stack. A stack whose
/// value is empty or whose amount is zero collapses to [`EntryStack::empty`],
/// so there is exactly one empty representation.
#[derive(Clone, Default)]
pub struct EntryStack {
    inner: Option<StackInner>,
}

impl EntryStack {
    /// The empty sentinel.
    #[must_use]
    pub const fn empty() -> Self {
        Self { inner: None }
    }

    pub(crate) fn from_parts<D: EntryDefinition>(definition: Arc<D>, value: D::Value) -> Self {
        if EntryDefinition::is_empty(&*definition, &value) {
            return Self::empty();
        }
        Self {
            inner: Some(StackInner {
                definition,
                value: Arc::new(value),
            }),
        }
    }

    pub(crate) fn from_dyn(definition: Arc<dyn DynDefinition>, value: DynValue) -> Self {
        if definition.is_empty(&*value) {
            return Self::empty();
        }
        Self {
            inner: Some(StackInner { definition, value }),
        }
    }

    /// Check if this is the empty sentinel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns the entry type, or `None` for the empty stack.
    #[must_use]
    pub fn entry_type(&self) -> Option<EntryTypeId> {
        self.inner.as_ref().map(|inner| inner.definition.entry_type())
    }

    /// Check if the stack is of the given type.
    #[must_use]
    pub fn is_type(&self, entry_type: &EntryTypeId) -> bool {
        self.entry_type().as_ref() == Some(entry_type)
    }

    /// Check if both stacks are non-empty and of the same type.
    #[must_use]
    pub fn same_type(&self, other: &EntryStack) -> bool {
        match (self.entry_type(), other.entry_type()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Returns the amount held (0 when empty).
    #[must_use]
    pub fn amount(&self) -> u64 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.definition.amount(&*inner.value))
    }

    /// Returns a copy holding `amount`; zero yields the empty stack.
    #[must_use]
    pub fn with_amount(&self, amount: u64) -> Self {
        let Some(inner) = &self.inner else {
            return Self::empty();
        };
        match inner.definition.with_amount(&*inner.value, amount) {
            Some(value) => Self::from_dyn(Arc::clone(&inner.definition), value),
            None => Self::empty(),
        }
    }

    /// Returns a copy at the type's reference quantity.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let Some(inner) = &self.inner else {
            return Self::empty();
        };
        match inner.definition.normalize(&*inner.value) {
            Some(value) => Self::from_dyn(Arc::clone(&inner.definition), value),
            None => Self::empty(),
        }
    }

    /// Returns an independent copy.
    ///
    /// Values are immutable, so the copy shares storage with the original.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns the typed value, if the stack holds a `T`.
    #[must_use]
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.inner
            .as_ref()
            .and_then(|inner| inner.value.downcast_ref::<T>())
    }

    /// Identifier of the underlying thing, if the type provides one.
    #[must_use]
    pub fn identifier(&self) -> Option<Identifier> {
        self.inner
            .as_ref()
            .and_then(|inner| inner.definition.identifier(&*inner.value))
    }

    /// Largest amount one slot may hold (0 when empty).
    #[must_use]
    pub fn max_stack_size(&self) -> u32 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.definition.max_stack_size(&*inner.value))
    }

    /// Check if automatic transfers may consume this stack.
    #[must_use]
    pub fn auto_consumable(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|inner| inner.definition.auto_consumable(&*inner.value))
    }

    /// Definition-level equality. Only meaningful for stacks of the same type.
    pub(crate) fn definition_equals(&self, other: &EntryStack, context: ComparisonContext) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => a.definition.equals(&*a.value, &*b.value, context),
            (None, None) => true,
            _ => false,
        }
    }

    /// Definition-level hash; 0 for the empty stack.
    pub(crate) fn definition_hash(&self, context: ComparisonContext) -> u64 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.definition.hash(&*inner.value, context))
    }

    /// Writes the stack in its serialized form.
    pub fn save(&self) -> EntryResult<SerializedEntry> {
        match &self.inner {
            None => Ok(SerializedEntry {
                entry_type: empty_type_id(),
                value: serde_json::Value::Null,
            }),
            Some(inner) => Ok(SerializedEntry {
                entry_type: inner.definition.entry_type(),
                value: inner.definition.save(&*inner.value)?,
            }),
        }
    }

    pub(crate) fn read_with(
        definition: Arc<dyn DynDefinition>,
        data: &serde_json::Value,
    ) -> EntryResult<Self> {
        let value = definition.read(data)?;
        Ok(Self::from_dyn(definition, value))
    }
}

impl fmt::Debug for EntryStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            None => f.write_str("EntryStack(empty)"),
            Some(inner) => {
                write!(f, "EntryStack({}, ", inner.definition.entry_type())?;
                inner.definition.fmt_value(&*inner.value, f)?;
                f.write_str(")")
            }
        }
    }
}

/// Serialized form of one stack: its type id plus the definition's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedEntry {
    /// Entry type id
    #[serde(rename = "type")]
    pub entry_type: EntryTypeId,
    /// Definition-specific payload
    #[serde(default)]
    pub value: serde_json::Value,
}

impl SerializedEntry {
    /// Check if this encodes the empty stack.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry_type == empty_type_id()
    }
}
