//! Cross-type bridges.
//!
//! A bridge lets a stack of one entry type stand in for stacks of another,
//! such as a filled bucket for the fluid it holds. Bridges are directional.
//!
//! Each source type bridges to a single target type, possibly through
//! several bridges. The first bridge that applies to a stack speaks for it
//! in both equality and hashing.
//!
//! Implementations must keep two promises for hashing to stay consistent
//! with equality: all candidates returned from one call are equal to each
//! other, and equal inputs produce equal candidates.

use ahash::AHashMap;
use crafthand_common::{EntryTypeId, FluidId, ItemId};

use crate::builtin::{FluidEntryDefinition, ItemEntryDefinition};
use crate::definition::EntryType;
use crate::entry::EntryStack;
use crate::stack::{FluidStack, ItemStack};

/// Result of asking a bridge to convert a stack.
#[derive(Debug, Clone)]
pub enum BridgeOutcome {
    /// The bridge does not apply to this stack
    Pass,
    /// Stacks of the target type the input stands for
    Bridged(Vec<EntryStack>),
}

impl BridgeOutcome {
    /// Returns the first non-empty candidate, if any.
    #[must_use]
    pub fn first(&self) -> Option<&EntryStack> {
        match self {
            Self::Pass => None,
            Self::Bridged(candidates) => candidates.iter().find(|c| !c.is_empty()),
        }
    }
}

/// Converts stacks of a source type into a target type.
pub trait EntryTypeBridge: Send + Sync {
    /// Converts `stack` into stacks of `target`.
    fn bridge(&self, stack: &EntryStack, target: &EntryTypeId) -> BridgeOutcome;
}

impl<F> EntryTypeBridge for F
where
    F: Fn(&EntryStack) -> BridgeOutcome + Send + Sync,
{
    fn bridge(&self, stack: &EntryStack, _target: &EntryTypeId) -> BridgeOutcome {
        self(stack)
    }
}

/// Bridges filled container items to the fluid they hold.
///
/// A stack of `count` containers stands for `count` times the per-container
/// amount.
#[derive(Debug, Clone)]
pub struct FluidContainerBridge {
    item: EntryType<ItemEntryDefinition>,
    fluid: EntryType<FluidEntryDefinition>,
    containers: AHashMap<ItemId, (FluidId, u64)>,
}

impl FluidContainerBridge {
    /// Creates a bridge with no known containers.
    #[must_use]
    pub fn new(
        item: EntryType<ItemEntryDefinition>,
        fluid: EntryType<FluidEntryDefinition>,
    ) -> Self {
        Self {
            item,
            fluid,
            containers: AHashMap::new(),
        }
    }

    /// Declares that one `container` item holds `amount` of `fluid`.
    #[must_use]
    pub fn with_container(mut self, container: ItemId, fluid: FluidId, amount: u64) -> Self {
        self.containers.insert(container, (fluid, amount));
        self
    }

    /// Returns what one container of `item` holds.
    #[must_use]
    pub fn contents(&self, item: ItemId) -> Option<(FluidId, u64)> {
        self.containers.get(&item).copied()
    }

    fn fluid_of(&self, stack: &ItemStack) -> Option<FluidStack> {
        let (fluid, amount) = self.contents(stack.id())?;
        Some(FluidStack::new(
            fluid,
            amount.saturating_mul(u64::from(stack.count)),
        ))
    }
}

impl EntryTypeBridge for FluidContainerBridge {
    fn bridge(&self, stack: &EntryStack, target: &EntryTypeId) -> BridgeOutcome {
        if *target != self.fluid.id() {
            return BridgeOutcome::Pass;
        }
        match self.item.value_of(stack).and_then(|item| self.fluid_of(item)) {
            Some(fluid) => BridgeOutcome::Bridged(vec![self.fluid.stack(fluid)]),
            None => BridgeOutcome::Pass,
        }
    }
}
