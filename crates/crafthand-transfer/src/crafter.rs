//! Crafting-grid filler.
//!
//! One [`InputSlotCrafter`] runs one allocation attempt against one
//! container:
//!
//! ```text
//! Start -> Cleaned -> Matched -> Aligned -> Committed
//!              \
//!               -> Failed
//! ```
//!
//! Transfers are best effort. Units already moved stay in the grid when a
//! later unit cannot be supplied; the [`AllocationReport`] lists what fell
//! short.

use crafthand_entry::{
    ComparisonContext, Display, EntryIngredient, EntryRegistry, EntryStack, SerializedDisplay,
};
use crossbeam_channel::Sender;
use tracing::{debug, warn};

use crate::accessor::SlotAccessor;
use crate::adapter::{BoxedSlot, ContainerAdapter};
use crate::config::TransferConfig;
use crate::error::{TransferError, TransferResult};
use crate::events::TransferEvent;
use crate::finder::{CraftPlan, RecipeFinder};

/// Progress of one allocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrafterState {
    /// Nothing done yet
    #[default]
    Start,
    /// Grid contents returned to the inventory
    Cleaned,
    /// A plan was found
    Matched,
    /// Plan slots paired with grid slots
    Aligned,
    /// Transfers performed
    Committed,
    /// No plan exists for the current inventory
    Failed,
}

/// Why a planned unit did not reach its grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortfallReason {
    /// No inventory slot holds a consumable matching stack
    NoSource,
    /// The grid slot holds a different stack
    SlotOccupied,
    /// The grid slot is at its stack size
    SlotFull,
}

/// Units placed into one grid slot.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Grid slot position
    pub grid_slot: usize,
    /// Ingredient the slot serves
    pub ingredient_index: usize,
    /// Stack that was placed, at reference quantity
    pub stack: EntryStack,
    /// Units planned
    pub planned: u32,
    /// Units moved
    pub moved: u32,
}

/// Planned units that were not moved into one grid slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    /// Grid slot position
    pub grid_slot: usize,
    /// Ingredient the slot serves
    pub ingredient_index: usize,
    /// Units not moved
    pub missing: u32,
    /// Why the first missing unit failed
    pub reason: ShortfallReason,
}

/// Outcome of a committed allocation.
#[derive(Debug, Clone, Default)]
pub struct AllocationReport {
    /// Crafts the plan was made for
    pub crafts: u32,
    /// Per grid slot placements
    pub placements: Vec<Placement>,
    /// Slots that did not receive every planned unit
    pub shortfall: Vec<Shortfall>,
}

impl AllocationReport {
    /// Check if every planned unit was moved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shortfall.is_empty()
    }

    /// Total units moved.
    #[must_use]
    pub fn units_moved(&self) -> u64 {
        self.placements.iter().map(|p| u64::from(p.moved)).sum()
    }

    /// Total units planned but not moved.
    #[must_use]
    pub fn missing_units(&self) -> u64 {
        self.shortfall.iter().map(|s| u64::from(s.missing)).sum()
    }

    /// Re-validates grid contents against the recipe.
    ///
    /// True when every placed slot holds a stack its ingredient accepts,
    /// in at least the planned quantity.
    #[must_use]
    pub fn verify_grid(
        &self,
        registry: &EntryRegistry,
        grid: &[EntryStack],
        ingredients: &[EntryIngredient],
    ) -> bool {
        self.placements.iter().all(|placement| {
            let (Some(stack), Some(ingredient)) = (
                grid.get(placement.grid_slot),
                ingredients.get(placement.ingredient_index),
            ) else {
                return false;
            };
            stack.amount() >= u64::from(placement.planned)
                && ingredient.is_satisfied_by(registry, stack, ComparisonContext::Exact)
        })
    }
}

/// Fills a container's crafting grid from its inventory.
pub struct InputSlotCrafter<'a, A: ContainerAdapter + ?Sized> {
    registry: &'a EntryRegistry,
    adapter: &'a A,
    config: TransferConfig,
    events: Option<Sender<TransferEvent>>,
    state: CrafterState,
}

impl<'a, A: ContainerAdapter + ?Sized> InputSlotCrafter<'a, A> {
    /// Creates a crafter with default configuration.
    #[must_use]
    pub fn new(registry: &'a EntryRegistry, adapter: &'a A) -> Self {
        Self {
            registry,
            adapter,
            config: TransferConfig::default(),
            events: None,
            state: CrafterState::Start,
        }
    }

    /// Uses `config` instead of the defaults.
    #[must_use]
    pub fn with_config(mut self, mut config: TransferConfig) -> Self {
        config.validate();
        self.config = config;
        self
    }

    /// Publishes [`TransferEvent`]s on `sender`.
    #[must_use]
    pub fn with_events(mut self, sender: Sender<TransferEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> CrafterState {
        self.state
    }

    /// Fills the grid for `display` with default configuration.
    pub fn start(
        registry: &'a EntryRegistry,
        adapter: &'a A,
        display: &Display,
        bulk: bool,
    ) -> TransferResult<AllocationReport> {
        Self::new(registry, adapter).fill(display, bulk)
    }

    /// Like [`InputSlotCrafter::start`], for a display received serialized.
    pub fn start_serialized(
        registry: &'a EntryRegistry,
        adapter: &'a A,
        display: &SerializedDisplay,
        bulk: bool,
    ) -> TransferResult<AllocationReport> {
        Self::new(registry, adapter).fill_serialized(display, bulk)
    }

    /// Rebuilds `display` and fills the grid for it.
    pub fn fill_serialized(
        &mut self,
        display: &SerializedDisplay,
        bulk: bool,
    ) -> TransferResult<AllocationReport> {
        let display = Display::read(self.registry, display)?;
        self.fill(&display, bulk)
    }

    /// Fills the grid for `display`; `bulk` asks for as many crafts as the
    /// configuration allows.
    ///
    /// Nothing is touched when the grid has fewer slots than the recipe has
    /// ingredients. When the inventory cannot supply one craft the grid is
    /// left cleaned and [`TransferError::InsufficientMaterials`] is returned.
    pub fn fill(&mut self, display: &Display, bulk: bool) -> TransferResult<AllocationReport> {
        self.state = CrafterState::Start;
        let category = display.category();
        let ingredients = self.adapter.display_inputs(display);
        let grid = self.adapter.input_slots();
        if ingredients.len() > grid.len() {
            return Err(TransferError::GridTooSmall {
                required: ingredients.len(),
                available: grid.len(),
            });
        }

        self.adapter.clean_inputs(self.registry);
        self.state = CrafterState::Cleaned;

        let mut finder = RecipeFinder::new(self.registry);
        self.adapter.populate_recipe_finder(&mut finder);
        let requested = self.config.requested_crafts(bulk);
        let Some(plan) = finder.find_recipe(&ingredients, requested) else {
            self.state = CrafterState::Failed;
            if self.config.clean_on_failure {
                self.adapter.clean_inputs(self.registry);
            }
            self.adapter.mark_dirty();
            debug!(
                "Not enough materials for {} ({} ingredients)",
                category,
                ingredients.len()
            );
            self.publish(TransferEvent::InsufficientMaterials {
                category: category.clone(),
            });
            return Err(TransferError::InsufficientMaterials);
        };
        self.state = CrafterState::Matched;

        let aligned = align(&finder, &plan);
        self.state = CrafterState::Aligned;

        let inventory = self.adapter.inventory_slots();
        let report = self.commit(&grid, &inventory, plan.crafts, aligned);
        self.adapter.mark_dirty();
        self.state = CrafterState::Committed;

        if report.is_complete() {
            debug!(
                "Filled {} crafts of {} ({} units)",
                report.crafts,
                category,
                report.units_moved()
            );
            self.publish(TransferEvent::Committed {
                category: category.clone(),
                crafts: report.crafts,
                units: report.units_moved(),
            });
        } else {
            warn!(
                "Grid fill for {} fell short by {} units",
                category,
                report.missing_units()
            );
            if self.config.report_shortfall_events {
                self.publish(TransferEvent::Shortfall {
                    category: category.clone(),
                    missing: report.missing_units(),
                });
            }
        }
        Ok(report)
    }

    fn commit(
        &self,
        grid: &[BoxedSlot],
        inventory: &[BoxedSlot],
        crafts: u32,
        aligned: Vec<(usize, EntryStack)>,
    ) -> AllocationReport {
        let mut report = AllocationReport {
            crafts,
            ..AllocationReport::default()
        };
        for (grid_slot, (ingredient_index, wanted)) in aligned.into_iter().enumerate() {
            let target = &*grid[grid_slot];
            let mut moved = 0;
            let mut failure = None;
            while moved < crafts {
                match self.move_one(target, inventory, &wanted) {
                    Ok(()) => moved += 1,
                    Err(reason) => {
                        failure = Some(reason);
                        break;
                    },
                }
            }
            if let Some(reason) = failure {
                report.shortfall.push(Shortfall {
                    grid_slot,
                    ingredient_index,
                    missing: crafts - moved,
                    reason,
                });
            }
            report.placements.push(Placement {
                grid_slot,
                ingredient_index,
                stack: wanted,
                planned: crafts,
                moved,
            });
        }
        report
    }

    /// Moves one unit of `wanted` from the inventory into `target`.
    fn move_one(
        &self,
        target: &dyn SlotAccessor,
        inventory: &[BoxedSlot],
        wanted: &EntryStack,
    ) -> Result<(), ShortfallReason> {
        let current = target.get();
        if !current.is_empty() {
            if !self.is_same_stack(&current, wanted) {
                return Err(ShortfallReason::SlotOccupied);
            }
            if current.amount() >= u64::from(current.max_stack_size()) {
                return Err(ShortfallReason::SlotFull);
            }
        }
        let source = inventory
            .iter()
            .find(|slot| {
                let stack = slot.get();
                !stack.is_empty() && stack.auto_consumable() && self.is_same_stack(&stack, wanted)
            })
            .ok_or(ShortfallReason::NoSource)?;
        let taken = source.take_units(1);
        if taken.is_empty() {
            return Err(ShortfallReason::NoSource);
        }
        if current.is_empty() {
            target.set(taken);
        } else {
            target.set(current.with_amount(current.amount() + 1));
        }
        Ok(())
    }

    fn is_same_stack(&self, stack: &EntryStack, wanted: &EntryStack) -> bool {
        stack.same_type(wanted) && self.registry.equals_exact(stack, wanted)
    }

    fn publish(&self, event: TransferEvent) {
        if let Some(events) = &self.events {
            let _ = events.try_send(event);
        }
    }
}

/// Pairs each planned slot, in ingredient order, with its representative stack.
fn align(finder: &RecipeFinder<'_>, plan: &CraftPlan) -> Vec<(usize, EntryStack)> {
    plan.slots
        .iter()
        .map(|slot| {
            let stack = finder.stack_for(slot.item).cloned().unwrap_or_default();
            (slot.ingredient_index, stack)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::SharedContainer;
    use crate::adapter::SimpleCraftingMenu;
    use crafthand_common::{CategoryId, EventBus, Identifier, ItemId};
    use crafthand_entry::{
        fluid_type_id, item_type_id, BuiltinTypes, FluidContainerBridge, FluidStack, ItemKind,
        ItemStack, BUCKET_AMOUNT,
    };

    const GRID: usize = 4;

    fn crafting() -> CategoryId {
        CategoryId::parse("minecraft:crafting").expect("valid category")
    }

    fn kind(id: u32) -> ItemKind {
        ItemKind::new(ItemId::new(id))
    }

    fn menu(inventory: Vec<EntryStack>) -> SimpleCraftingMenu {
        let mut slots = vec![EntryStack::empty(); GRID];
        let size = inventory.len();
        slots.extend(inventory);
        SimpleCraftingMenu::new(SharedContainer::from_stacks(slots), 0..GRID, GRID..GRID + size)
    }

    fn display_of(types: &BuiltinTypes, slots: &[&[u32]]) -> Display {
        Display::new(crafting()).with_inputs(slots.iter().map(|ids| {
            ids.iter()
                .map(|&id| types.item.stack(kind(id).stack(1)))
                .collect::<EntryIngredient>()
        }))
    }

    fn item_of<'s>(types: &BuiltinTypes, stack: &'s EntryStack) -> &'s ItemStack {
        types.item.value_of(stack).expect("item stack")
    }

    #[test]
    fn test_fills_one_to_one() {
        let (registry, types) = EntryRegistry::with_builtins();
        let menu = menu(vec![
            types.item.stack(kind(3).stack(1)),
            types.item.stack(kind(1).stack(1)),
            types.item.stack(kind(2).stack(1)),
        ]);
        let display = display_of(&types, &[&[1], &[2], &[3]]);

        let mut crafter = InputSlotCrafter::new(&registry, &menu);
        let report = crafter.fill(&display, false).expect("materials present");
        assert_eq!(crafter.state(), CrafterState::Committed);
        assert!(report.is_complete());
        assert_eq!(report.crafts, 1);

        let grid = menu.grid_stacks();
        for (index, id) in [1, 2, 3].into_iter().enumerate() {
            assert_eq!(item_of(&types, &grid[index]).id(), ItemId::new(id));
            assert_eq!(grid[index].amount(), 1);
        }
        assert!(grid[3].is_empty());
        assert!(menu.inventory_stacks().iter().all(EntryStack::is_empty));
        assert!(report.verify_grid(&registry, &grid, display.inputs()));
        assert_eq!(menu.dirty_count(), 1);
    }

    #[test]
    fn test_shared_alternative_goes_to_second_choice() {
        let (registry, types) = EntryRegistry::with_builtins();
        let menu = menu(vec![
            types.item.stack(kind(1).stack(1)),
            types.item.stack(kind(2).stack(1)),
        ]);
        let display = display_of(&types, &[&[1], &[1, 2]]);

        let report = InputSlotCrafter::start(&registry, &menu, &display, false).expect("fits");
        assert!(report.is_complete());
        let grid = menu.grid_stacks();
        assert_eq!(item_of(&types, &grid[0]).id(), ItemId::new(1));
        assert_eq!(item_of(&types, &grid[1]).id(), ItemId::new(2));
    }

    #[test]
    fn test_bulk_fills_up_to_stack_size() {
        let (registry, types) = EntryRegistry::with_builtins();
        let egg = kind(344).with_max_stack_size(16);
        let menu = menu(vec![
            types.item.stack(egg.stack(16)),
            types.item.stack(egg.stack(16)),
            types.item.stack(egg.stack(5)),
        ]);
        let display = Display::new(crafting())
            .with_input(EntryIngredient::single(types.item.stack(egg.stack(1))));

        let report = InputSlotCrafter::start(&registry, &menu, &display, true).expect("fits");
        assert_eq!(report.crafts, 16);
        assert_eq!(menu.grid_stacks()[0].amount(), 16);
        let left: u64 = menu.inventory_stacks().iter().map(EntryStack::amount).sum();
        assert_eq!(left, 21);
    }

    #[test]
    fn test_bulk_respects_config() {
        let (registry, types) = EntryRegistry::with_builtins();
        let menu = menu(vec![types.item.stack(kind(5).stack(40))]);
        let display = display_of(&types, &[&[5], &[5]]);

        let capped = TransferConfig {
            max_crafts_per_transfer: 8,
            ..TransferConfig::default()
        };
        let report = InputSlotCrafter::new(&registry, &menu)
            .with_config(capped)
            .fill(&display, true)
            .expect("fits");
        assert_eq!(report.crafts, 8);

        let no_bulk = TransferConfig {
            bulk_transfer_enabled: false,
            ..TransferConfig::default()
        };
        let report = InputSlotCrafter::new(&registry, &menu)
            .with_config(no_bulk)
            .fill(&display, true)
            .expect("fits");
        assert_eq!(report.crafts, 1);
        // The earlier fill was returned to the inventory first.
        assert_eq!(menu.grid_stacks()[0].amount(), 1);
        assert_eq!(menu.grid_stacks()[1].amount(), 1);
    }

    #[test]
    fn test_insufficient_materials_leaves_grid_clean() {
        let (registry, types) = EntryRegistry::with_builtins();
        let bus = EventBus::new(8);
        let stick = types.item.stack(kind(280).stack(1));
        let container = SharedContainer::from_stacks(vec![
            stick.clone(),
            EntryStack::empty(),
            EntryStack::empty(),
        ]);
        let menu = SimpleCraftingMenu::new(container, 0..2, 2..3);
        let display = display_of(&types, &[&[280], &[280]]);

        let mut crafter = InputSlotCrafter::new(&registry, &menu).with_events(bus.sender());
        let result = crafter.fill(&display, false);
        assert!(matches!(result, Err(TransferError::InsufficientMaterials)));
        assert_eq!(crafter.state(), CrafterState::Failed);
        assert!(menu.grid_stacks().iter().all(EntryStack::is_empty));
        assert_eq!(menu.inventory_stacks()[0].amount(), 1);
        assert_eq!(menu.dirty_count(), 1);
        assert_eq!(
            bus.drain(),
            vec![TransferEvent::InsufficientMaterials { category: crafting() }]
        );
    }

    #[test]
    fn test_enchanted_source_is_never_consumed() {
        let (registry, types) = EntryRegistry::with_builtins();
        let bus = EventBus::new(8);
        let book = kind(403)
            .stack(1)
            .with_enchantment(Identifier::parse("silk_touch").expect("valid id"), 1);
        let menu = menu(vec![types.item.stack(book.clone())]);
        let display = Display::new(crafting())
            .with_input(EntryIngredient::single(types.item.stack(book)));

        let report = InputSlotCrafter::new(&registry, &menu)
            .with_events(bus.sender())
            .fill(&display, false)
            .expect("plan exists");
        assert!(!report.is_complete());
        assert_eq!(
            report.shortfall,
            vec![Shortfall {
                grid_slot: 0,
                ingredient_index: 0,
                missing: 1,
                reason: ShortfallReason::NoSource,
            }]
        );
        assert!(menu.grid_stacks()[0].is_empty());
        assert_eq!(menu.inventory_stacks()[0].amount(), 1);
        assert!(!report.verify_grid(&registry, &menu.grid_stacks(), display.inputs()));
        assert_eq!(
            bus.drain(),
            vec![TransferEvent::Shortfall {
                category: crafting(),
                missing: 1,
            }]
        );
    }

    #[test]
    fn test_occupied_slot_is_not_overwritten() {
        let (registry, types) = EntryRegistry::with_builtins();
        let wand = types
            .item
            .stack(kind(280).stack(1).with_custom_name("Wand"));
        // Full inventory: the renamed stick cannot be returned.
        let container = SharedContainer::from_stacks(vec![
            wand,
            types.item.stack(kind(280).stack(64)),
        ]);
        let menu = SimpleCraftingMenu::new(container, 0..1, 1..2);
        let display = display_of(&types, &[&[280]]);

        let report = InputSlotCrafter::start(&registry, &menu, &display, false).expect("plan");
        assert_eq!(report.shortfall[0].reason, ShortfallReason::SlotOccupied);
        assert!(item_of(&types, &menu.grid_stacks()[0]).has_custom_name());
        assert_eq!(menu.inventory_stacks()[0].amount(), 64);
    }

    #[test]
    fn test_grid_too_small_touches_nothing() {
        let (registry, types) = EntryRegistry::with_builtins();
        let menu = menu(vec![types.item.stack(kind(1).stack(64))]);
        let display = display_of(&types, &[&[1], &[1], &[1], &[1], &[1]]);

        let result = InputSlotCrafter::start(&registry, &menu, &display, false);
        assert!(matches!(
            result,
            Err(TransferError::GridTooSmall {
                required: 5,
                available: GRID
            })
        ));
        assert_eq!(menu.dirty_count(), 0);
        assert_eq!(menu.inventory_stacks()[0].amount(), 64);
    }

    #[test]
    fn test_refill_is_idempotent() {
        let (registry, types) = EntryRegistry::with_builtins();
        let menu = menu(vec![
            types.item.stack(kind(1).stack(64)),
            types.item.stack(kind(2).stack(64)),
            types.item.stack(kind(1).stack(64)),
        ]);
        let display = display_of(&types, &[&[2, 1], &[1], &[1, 2]]);

        InputSlotCrafter::start(&registry, &menu, &display, true).expect("first fill");
        let first = menu.grid_stacks();
        InputSlotCrafter::start(&registry, &menu, &display, true).expect("second fill");
        let second = menu.grid_stacks();

        for (a, b) in first.iter().zip(&second) {
            assert!(registry.equals_exact(a, b));
            assert_eq!(a.amount(), b.amount());
        }
        assert_eq!(menu.dirty_count(), 2);
    }

    #[test]
    fn test_bridged_fluid_is_not_moved_for_bucket_ingredient() {
        let (mut registry, types) = EntryRegistry::with_builtins();
        let bucket = kind(327).with_max_stack_size(1);
        let lava = crafthand_common::FluidId::new(2);
        let bridge = FluidContainerBridge::new(types.item.clone(), types.fluid.clone())
            .with_container(bucket.id, lava, BUCKET_AMOUNT);
        registry
            .register_bridge(item_type_id(), fluid_type_id(), bridge)
            .expect("bridge registers");

        let menu = menu(vec![types.fluid.stack(FluidStack::new(lava, 5 * BUCKET_AMOUNT))]);
        let display = Display::new(crafting())
            .with_input(EntryIngredient::single(types.item.stack(bucket.stack(1))));

        let result = InputSlotCrafter::start(&registry, &menu, &display, true);
        assert!(matches!(result, Err(TransferError::InsufficientMaterials)));
        assert!(menu.grid_stacks().iter().all(EntryStack::is_empty));
        assert_eq!(menu.inventory_stacks()[0].amount(), 5 * BUCKET_AMOUNT);
    }

    #[test]
    fn test_start_serialized() {
        let (registry, types) = EntryRegistry::with_builtins();
        let menu = menu(vec![types.item.stack(kind(7).stack(3))]);
        let serialized = display_of(&types, &[&[7]]).save().expect("save");

        let report =
            InputSlotCrafter::start_serialized(&registry, &menu, &serialized, true).expect("fits");
        assert_eq!(report.crafts, 3);

        let mut broken = serialized;
        broken.inputs[0][0].entry_type =
            crafthand_common::EntryTypeId::parse("other:mana").expect("valid id");
        assert!(matches!(
            InputSlotCrafter::start_serialized(&registry, &menu, &broken, false),
            Err(TransferError::MalformedDisplay(_))
        ));
    }
}
