//! Recipe finder.
//!
//! Matches a recipe's ingredient slots against a pool of available stacks.
//! Stacks are interned into small ids for the lifetime of one finder, so
//! the matching itself only deals with integer counts.
//!
//! Each craft takes one unit of one alternative per slot. Filling `n`
//! crafts therefore needs `n` units for every slot, and an id holding `a`
//! units can serve at most `a / n` slots. Finding a plan for `n` crafts is a
//! bipartite assignment of slots to ids under those capacities.
//!
//! Ids are per entry type. A recipe alternative of one type is only ever
//! supplied by pool stacks of that same type.

use ahash::AHashMap;
use crafthand_entry::{EntryIngredient, EntryRegistry, EntryStack};
use tracing::trace;

/// Id of a distinct stack within one [`RecipeFinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternedId(u32);

impl InternedId {
    /// Returns the position in the finder's tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One ingredient slot of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedSlot {
    /// Position of the ingredient in the recipe
    pub ingredient_index: usize,
    /// Chosen alternative
    pub item: InternedId,
    /// Units to place (one per craft)
    pub count: u32,
}

/// A consistent assignment of alternatives to every ingredient slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftPlan {
    /// Crafts the plan fills
    pub crafts: u32,
    /// One entry per ingredient, in recipe order
    pub slots: Vec<PlannedSlot>,
}

/// Multiset matcher over an interned pool of stacks.
pub struct RecipeFinder<'r> {
    registry: &'r EntryRegistry,
    stacks: Vec<EntryStack>,
    available: Vec<u64>,
    buckets: AHashMap<u64, Vec<InternedId>>,
}

impl<'r> RecipeFinder<'r> {
    /// Creates an empty finder comparing through `registry`.
    #[must_use]
    pub fn new(registry: &'r EntryRegistry) -> Self {
        Self {
            registry,
            stacks: Vec::new(),
            available: Vec::new(),
            buckets: AHashMap::new(),
        }
    }

    /// Returns the id of `stack`, interning it if unseen. `None` for the
    /// empty stack.
    ///
    /// Interning compares under the exact context, so cosmetically different
    /// stacks never share an id. Stacks of different entry types never share
    /// an id either, even when a bridge makes them compare equal.
    pub fn intern(&mut self, stack: &EntryStack) -> Option<InternedId> {
        if stack.is_empty() {
            return None;
        }
        let hash = self.registry.hash_exact(stack);
        if let Some(ids) = self.buckets.get(&hash) {
            for &id in ids {
                let known = &self.stacks[id.index()];
                if known.same_type(stack) && self.registry.equals_exact(known, stack) {
                    return Some(id);
                }
            }
        }
        let id = InternedId(self.stacks.len() as u32);
        self.stacks.push(stack.normalize());
        self.available.push(0);
        self.buckets.entry(hash).or_default().push(id);
        Some(id)
    }

    /// Adds a stack to the available pool. Empty stacks are ignored.
    pub fn add_stack(&mut self, stack: &EntryStack) {
        let amount = stack.amount();
        if amount == 0 {
            return;
        }
        if let Some(id) = self.intern(stack) {
            self.available[id.index()] = self.available[id.index()].saturating_add(amount);
        }
    }

    /// Adds several stacks to the available pool.
    pub fn add_stacks<'s>(&mut self, stacks: impl IntoIterator<Item = &'s EntryStack>) {
        for stack in stacks {
            self.add_stack(stack);
        }
    }

    /// Returns the representative stack of an id, at its reference quantity.
    #[must_use]
    pub fn stack_for(&self, id: InternedId) -> Option<&EntryStack> {
        self.stacks.get(id.index())
    }

    /// Returns the pooled amount of an id.
    #[must_use]
    pub fn available(&self, id: InternedId) -> u64 {
        self.available.get(id.index()).copied().unwrap_or(0)
    }

    /// Get number of distinct interned stacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Check if nothing was interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Finds a plan for as many crafts as possible, up to `limit`.
    pub fn find_recipe(&mut self, ingredients: &[EntryIngredient], limit: u32) -> Option<CraftPlan> {
        let crafts = self.count_crafts(ingredients, limit);
        if crafts == 0 {
            return None;
        }
        self.plan(ingredients, crafts)
    }

    /// Returns the largest craft count up to `limit` the pool can fill.
    ///
    /// A recipe with no ingredients, or with an ingredient that has no
    /// alternatives, can never be filled.
    pub fn count_crafts(&mut self, ingredients: &[EntryIngredient], limit: u32) -> u32 {
        let Some(alternatives) = self.resolve(ingredients) else {
            return 0;
        };
        if limit == 0 || self.assign(&alternatives, 1).is_none() {
            return 0;
        }
        let upper = self.upper_bound(&alternatives).min(limit);
        // Feasibility only shrinks as `n` grows, so the first hit is the maximum.
        let mut crafts = upper;
        while crafts > 1 {
            if self.assign(&alternatives, crafts).is_some() {
                break;
            }
            crafts -= 1;
        }
        trace!("Recipe of {} slots fits {} crafts", ingredients.len(), crafts);
        crafts
    }

    /// Returns a plan for exactly `crafts` crafts, if the pool allows it.
    pub fn plan(&mut self, ingredients: &[EntryIngredient], crafts: u32) -> Option<CraftPlan> {
        if crafts == 0 {
            return None;
        }
        let alternatives = self.resolve(ingredients)?;
        let assignment = self.assign(&alternatives, crafts)?;
        Some(CraftPlan {
            crafts,
            slots: assignment
                .into_iter()
                .enumerate()
                .map(|(ingredient_index, item)| PlannedSlot {
                    ingredient_index,
                    item,
                    count: crafts,
                })
                .collect(),
        })
    }

    /// Interns every alternative, per slot, dropping repeats.
    fn resolve(&mut self, ingredients: &[EntryIngredient]) -> Option<Vec<Vec<InternedId>>> {
        if ingredients.is_empty() {
            return None;
        }
        let mut resolved = Vec::with_capacity(ingredients.len());
        for ingredient in ingredients {
            let mut ids = Vec::with_capacity(ingredient.len());
            for alternative in ingredient {
                if let Some(id) = self.intern(alternative) {
                    if !ids.contains(&id) {
                        ids.push(id);
                    }
                }
            }
            if ids.is_empty() {
                return None;
            }
            resolved.push(ids);
        }
        Some(resolved)
    }

    /// Per-slot best case, ignoring contention between slots.
    fn upper_bound(&self, alternatives: &[Vec<InternedId>]) -> u32 {
        alternatives
            .iter()
            .map(|ids| {
                ids.iter()
                    .map(|&id| {
                        let cap = u64::from(self.max_stack_size(id));
                        self.available(id).min(cap) as u32
                    })
                    .max()
                    .unwrap_or(0)
            })
            .min()
            .unwrap_or(0)
    }

    fn max_stack_size(&self, id: InternedId) -> u32 {
        self.stack_for(id).map_or(0, EntryStack::max_stack_size)
    }

    fn assign(&self, alternatives: &[Vec<InternedId>], crafts: u32) -> Option<Vec<InternedId>> {
        let capacity = (0..self.stacks.len())
            .map(|index| {
                let id = InternedId(index as u32);
                if self.max_stack_size(id) < crafts {
                    0
                } else {
                    self.available[index] / u64::from(crafts)
                }
            })
            .collect();
        Matcher::new(alternatives, capacity).solve()
    }
}

impl std::fmt::Debug for RecipeFinder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeFinder")
            .field("stacks", &self.stacks)
            .field("available", &self.available)
            .finish()
    }
}

/// Slot-to-id assignment under per-id capacities.
///
/// Slots are first placed greedily in declaration order on their first
/// alternative with room left. A slot that finds none triggers an
/// augmenting-path search that moves earlier slots to other alternatives.
struct Matcher<'a> {
    alternatives: &'a [Vec<InternedId>],
    capacity: Vec<u64>,
    owners: Vec<Vec<usize>>,
    assignment: Vec<Option<InternedId>>,
}

impl<'a> Matcher<'a> {
    fn new(alternatives: &'a [Vec<InternedId>], capacity: Vec<u64>) -> Self {
        let ids = capacity.len();
        Self {
            alternatives,
            capacity,
            owners: vec![Vec::new(); ids],
            assignment: vec![None; alternatives.len()],
        }
    }

    fn has_room(&self, id: InternedId) -> bool {
        (self.owners[id.index()].len() as u64) < self.capacity[id.index()]
    }

    fn place(&mut self, slot: usize, id: InternedId) {
        self.owners[id.index()].push(slot);
        self.assignment[slot] = Some(id);
    }

    fn solve(mut self) -> Option<Vec<InternedId>> {
        for slot in 0..self.alternatives.len() {
            let first_fit = self.alternatives[slot]
                .iter()
                .copied()
                .find(|&id| self.has_room(id));
            match first_fit {
                Some(id) => self.place(slot, id),
                None => {
                    let mut visited = vec![false; self.capacity.len()];
                    if !self.augment(slot, &mut visited) {
                        return None;
                    }
                },
            }
        }
        self.assignment.into_iter().collect()
    }

    fn augment(&mut self, slot: usize, visited: &mut [bool]) -> bool {
        let alternatives = self.alternatives;
        for &id in &alternatives[slot] {
            if visited[id.index()] {
                continue;
            }
            visited[id.index()] = true;
            if self.has_room(id) {
                self.place(slot, id);
                return true;
            }
            for position in 0..self.owners[id.index()].len() {
                let displaced = self.owners[id.index()][position];
                if self.augment(displaced, visited) {
                    // `displaced` now sits under another id; hand its place here to `slot`.
                    self.owners[id.index()][position] = slot;
                    self.assignment[slot] = Some(id);
                    return true;
                }
            }
        }
        false
    }
}
