//! Item and fluid values carried by entries.

use crafthand_common::{FluidId, Identifier, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default maximum stack size for items.
pub const DEFAULT_MAX_STACK_SIZE: u32 = 64;

/// Fluid amount of one bucket, in millibuckets.
pub const BUCKET_AMOUNT: u64 = 1000;

/// Static properties of an item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKind {
    /// Item kind identifier
    pub id: ItemId,
    /// Largest count one slot may hold
    pub max_stack_size: u32,
    /// Durability (0 = not damageable)
    pub max_damage: u32,
}

impl ItemKind {
    /// Creates a stackable, non-damageable item kind.
    #[must_use]
    pub const fn new(id: ItemId) -> Self {
        Self {
            id,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            max_damage: 0,
        }
    }

    /// Sets the maximum stack size.
    #[must_use]
    pub const fn with_max_stack_size(mut self, size: u32) -> Self {
        self.max_stack_size = size;
        self
    }

    /// Sets the durability; damageable kinds never stack.
    #[must_use]
    pub const fn with_max_damage(mut self, damage: u32) -> Self {
        self.max_damage = damage;
        self.max_stack_size = 1;
        self
    }

    /// Creates a stack of this kind.
    #[must_use]
    pub fn stack(self, count: u32) -> ItemStack {
        ItemStack::new(self, count)
    }
}

/// A quantity of one item kind plus its identity-relevant state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item kind
    pub kind: ItemKind,
    /// Number of items
    pub count: u32,
    /// Damage taken (0 = pristine)
    #[serde(default)]
    pub damage: u32,
    /// Enchantments and their levels
    #[serde(default)]
    pub enchantments: BTreeMap<Identifier, u16>,
    /// Player-given display name
    #[serde(default)]
    pub custom_name: Option<String>,
    /// Free-form data attached by the game or plugins
    #[serde(default)]
    pub tag: BTreeMap<String, String>,
}

impl ItemStack {
    /// Creates a plain stack.
    #[must_use]
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self {
            kind,
            count,
            damage: 0,
            enchantments: BTreeMap::new(),
            custom_name: None,
            tag: BTreeMap::new(),
        }
    }

    /// Returns the item kind id.
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.kind.id
    }

    /// Check if the stack holds nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if the item has taken damage.
    #[must_use]
    pub const fn is_damaged(&self) -> bool {
        self.damage > 0
    }

    /// Check if the item carries enchantments.
    #[must_use]
    pub fn is_enchanted(&self) -> bool {
        !self.enchantments.is_empty()
    }

    /// Check if the item was renamed.
    #[must_use]
    pub const fn has_custom_name(&self) -> bool {
        self.custom_name.is_some()
    }

    /// Sets the damage value.
    #[must_use]
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    /// Adds an enchantment.
    #[must_use]
    pub fn with_enchantment(mut self, enchantment: Identifier, level: u16) -> Self {
        self.enchantments.insert(enchantment, level);
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_custom_name(mut self, name: impl Into<String>) -> Self {
        self.custom_name = Some(name.into());
        self
    }

    /// Attaches a tag entry.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tag.insert(key.into(), value.into());
        self
    }

    /// Returns a copy with a different count.
    #[must_use]
    pub fn with_count(&self, count: u32) -> Self {
        let mut copy = self.clone();
        copy.count = count;
        copy
    }
}

/// A quantity of fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FluidStack {
    /// Fluid kind
    pub fluid: FluidId,
    /// Amount in millibuckets
    pub amount: u64,
}

impl FluidStack {
    /// Creates a fluid stack.
    #[must_use]
    pub const fn new(fluid: FluidId, amount: u64) -> Self {
        Self { fluid, amount }
    }

    /// Creates one bucket of fluid.
    #[must_use]
    pub const fn bucket(fluid: FluidId) -> Self {
        Self::new(fluid, BUCKET_AMOUNT)
    }
}
