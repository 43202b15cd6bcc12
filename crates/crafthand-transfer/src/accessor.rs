//! Slot accessors: uniform views over single container slots.

use crafthand_entry::EntryStack;
use std::cell::RefCell;
use std::rc::Rc;

/// Read, write and take access to one container slot.
///
/// An accessor is a view, not a copy: writes land in the container it was
/// created from and touch no other slot.
pub trait SlotAccessor {
    /// Returns the current stack.
    fn get(&self) -> EntryStack;

    /// Replaces the stack. Setting the empty stack clears the slot.
    fn set(&self, stack: EntryStack);

    /// Removes up to `amount` units and returns what was removed.
    fn take_units(&self, amount: u64) -> EntryStack {
        let current = self.get();
        let taken = amount.min(current.amount());
        if taken == 0 {
            return EntryStack::empty();
        }
        self.set(current.with_amount(current.amount() - taken));
        current.with_amount(taken)
    }
}

/// Slots shared between a container and the accessors viewing it.
///
/// Single-threaded; the owner serializes allocation attempts.
#[derive(Debug, Clone, Default)]
pub struct SharedContainer {
    slots: Rc<RefCell<Vec<EntryStack>>>,
}

impl SharedContainer {
    /// Creates a container with `size` empty slots.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self::from_stacks(vec![EntryStack::empty(); size])
    }

    /// Creates a container holding `stacks`.
    #[must_use]
    pub fn from_stacks(stacks: Vec<EntryStack>) -> Self {
        Self {
            slots: Rc::new(RefCell::new(stacks)),
        }
    }

    /// Get number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Check if the container has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Returns the stack at `index`; empty when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> EntryStack {
        self.slots.borrow().get(index).cloned().unwrap_or_default()
    }

    /// Replaces the stack at `index`. Out-of-range writes are ignored.
    pub fn set(&self, index: usize, stack: EntryStack) {
        if let Some(slot) = self.slots.borrow_mut().get_mut(index) {
            *slot = stack;
        }
    }

    /// Returns an accessor for the slot at `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> ContainerSlot {
        ContainerSlot {
            container: self.clone(),
            index,
        }
    }

    /// Returns a copy of every slot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EntryStack> {
        self.slots.borrow().clone()
    }
}

/// Accessor for one slot of a [`SharedContainer`].
#[derive(Debug, Clone)]
pub struct ContainerSlot {
    container: SharedContainer,
    index: usize,
}

impl ContainerSlot {
    /// Returns the slot index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl SlotAccessor for ContainerSlot {
    fn get(&self) -> EntryStack {
        self.container.get(self.index)
    }

    fn set(&self, stack: EntryStack) {
        self.container.set(self.index, stack);
    }
}
