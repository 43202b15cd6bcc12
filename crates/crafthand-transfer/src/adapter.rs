//! Container adapters.
//!
//! An adapter tells the allocator where the crafting grid and the inventory
//! of one open container are, and how the container wants to be notified.

use crafthand_entry::{Display, EntryIngredient, EntryRegistry, EntryStack};
use std::cell::Cell;
use std::ops::Range;
use tracing::trace;

use crate::accessor::{SharedContainer, SlotAccessor};
use crate::finder::RecipeFinder;

/// Boxed slot accessor.
pub type BoxedSlot = Box<dyn SlotAccessor>;

/// The allocator's view of one container.
pub trait ContainerAdapter {
    /// Crafting-grid slots, in the order ingredients are laid onto them.
    fn input_slots(&self) -> Vec<BoxedSlot>;

    /// Inventory slots items are taken from and returned to.
    fn inventory_slots(&self) -> Vec<BoxedSlot>;

    /// Ingredients to place, in grid order.
    fn display_inputs(&self, display: &Display) -> Vec<EntryIngredient> {
        display.inputs().to_vec()
    }

    /// Seeds the finder with what the inventory can supply.
    fn populate_recipe_finder(&self, finder: &mut RecipeFinder<'_>) {
        for slot in self.inventory_slots() {
            finder.add_stack(&slot.get());
        }
    }

    /// Returns grid contents to the inventory.
    fn clean_inputs(&self, registry: &EntryRegistry) {
        return_to_inventory(registry, &self.input_slots(), &self.inventory_slots());
    }

    /// Signals that slot contents changed.
    fn mark_dirty(&self);
}

/// Moves every grid stack back into the inventory.
///
/// Stacks first top up equal inventory stacks, then fill empty slots, both
/// bounded by the stack size. Whatever does not fit stays in the grid.
pub fn return_to_inventory(registry: &EntryRegistry, grid: &[BoxedSlot], inventory: &[BoxedSlot]) {
    for input in grid {
        let mut remaining = input.get();
        if remaining.is_empty() {
            continue;
        }
        for target in inventory {
            if remaining.is_empty() {
                break;
            }
            let current = target.get();
            if current.same_type(&remaining) && registry.equals_exact(&current, &remaining) {
                remaining = merge_into(&**target, &current, &remaining);
            }
        }
        for target in inventory {
            if remaining.is_empty() {
                break;
            }
            let current = target.get();
            if current.is_empty() {
                remaining = merge_into(&**target, &current, &remaining);
            }
        }
        trace!("Returned grid stack, {} units left over", remaining.amount());
        input.set(remaining);
    }
}

/// Adds as much of `incoming` to `target` as its stack size allows and
/// returns the rest.
fn merge_into(target: &dyn SlotAccessor, current: &EntryStack, incoming: &EntryStack) -> EntryStack {
    let limit = u64::from(incoming.max_stack_size());
    let held = current.amount();
    let room = limit.saturating_sub(held);
    let moved = room.min(incoming.amount());
    if moved == 0 {
        return incoming.clone();
    }
    let base = if current.is_empty() { incoming } else { current };
    target.set(base.with_amount(held + moved));
    incoming.with_amount(incoming.amount() - moved)
}

/// A crafting menu laid out over one [`SharedContainer`]: a range of grid
/// slots and a range of inventory slots.
#[derive(Debug)]
pub struct SimpleCraftingMenu {
    container: SharedContainer,
    grid: Range<usize>,
    inventory: Range<usize>,
    dirty: Cell<u32>,
}

impl SimpleCraftingMenu {
    /// Creates a menu over `container`.
    #[must_use]
    pub fn new(container: SharedContainer, grid: Range<usize>, inventory: Range<usize>) -> Self {
        Self {
            container,
            grid,
            inventory,
            dirty: Cell::new(0),
        }
    }

    /// Returns the underlying container.
    #[must_use]
    pub fn container(&self) -> &SharedContainer {
        &self.container
    }

    /// Returns the grid stacks, in order.
    #[must_use]
    pub fn grid_stacks(&self) -> Vec<EntryStack> {
        self.grid.clone().map(|index| self.container.get(index)).collect()
    }

    /// Returns the inventory stacks, in order.
    #[must_use]
    pub fn inventory_stacks(&self) -> Vec<EntryStack> {
        self.inventory
            .clone()
            .map(|index| self.container.get(index))
            .collect()
    }

    /// Number of times the menu was marked dirty.
    #[must_use]
    pub fn dirty_count(&self) -> u32 {
        self.dirty.get()
    }

    fn slots(&self, range: &Range<usize>) -> Vec<BoxedSlot> {
        range
            .clone()
            .map(|index| Box::new(self.container.slot(index)) as BoxedSlot)
            .collect()
    }
}

impl ContainerAdapter for SimpleCraftingMenu {
    fn input_slots(&self) -> Vec<BoxedSlot> {
        self.slots(&self.grid)
    }

    fn inventory_slots(&self) -> Vec<BoxedSlot> {
        self.slots(&self.inventory)
    }

    fn mark_dirty(&self) {
        self.dirty.set(self.dirty.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crafthand_common::ItemId;
    use crafthand_entry::{BuiltinTypes, ItemKind};

    fn stick(types: &BuiltinTypes, count: u32) -> EntryStack {
        types.item.stack(ItemKind::new(ItemId::new(280)).stack(count))
    }

    #[test]
    fn test_clean_merges_before_using_empty_slots() {
        let (registry, types) = EntryRegistry::with_builtins();
        // grid: 0..2, inventory: 2..5
        let container = SharedContainer::from_stacks(vec![
            stick(&types, 10),
            EntryStack::empty(),
            EntryStack::empty(),
            stick(&types, 60),
            EntryStack::empty(),
        ]);
        let menu = SimpleCraftingMenu::new(container, 0..2, 2..5);
        menu.clean_inputs(&registry);

        assert!(menu.grid_stacks().iter().all(EntryStack::is_empty));
        let inventory = menu.inventory_stacks();
        assert_eq!(inventory[0].amount(), 6);
        assert_eq!(inventory[1].amount(), 64);
        assert!(inventory[2].is_empty());
    }

    #[test]
    fn test_clean_leaves_overflow_in_grid() {
        let (registry, types) = EntryRegistry::with_builtins();
        let container = SharedContainer::from_stacks(vec![stick(&types, 5), stick(&types, 62)]);
        let menu = SimpleCraftingMenu::new(container, 0..1, 1..2);
        menu.clean_inputs(&registry);

        assert_eq!(menu.grid_stacks()[0].amount(), 3);
        assert_eq!(menu.inventory_stacks()[0].amount(), 64);
    }

    #[test]
    fn test_clean_keeps_distinct_stacks_apart() {
        let (registry, types) = EntryRegistry::with_builtins();
        let named = types
            .item
            .stack(ItemKind::new(ItemId::new(280)).stack(2).with_custom_name("Wand"));
        let container = SharedContainer::from_stacks(vec![named, stick(&types, 1), EntryStack::empty()]);
        let menu = SimpleCraftingMenu::new(container, 0..1, 1..3);
        menu.clean_inputs(&registry);

        let inventory = menu.inventory_stacks();
        assert_eq!(inventory[0].amount(), 1);
        assert_eq!(inventory[1].amount(), 2);
        assert!(!registry.equals_exact(&inventory[0], &inventory[1]));
    }

    #[test]
    fn test_default_populate_reads_inventory() {
        let (registry, types) = EntryRegistry::with_builtins();
        let container = SharedContainer::from_stacks(vec![
            stick(&types, 9),
            stick(&types, 2),
            stick(&types, 3),
        ]);
        let menu = SimpleCraftingMenu::new(container, 0..1, 1..3);
        let mut finder = RecipeFinder::new(&registry);
        menu.populate_recipe_finder(&mut finder);
        let id = finder.intern(&stick(&types, 1)).expect("interned");
        assert_eq!(finder.available(id), 5);
        assert_eq!(menu.dirty_count(), 0);
        menu.mark_dirty();
        assert_eq!(menu.dirty_count(), 1);
    }
}
