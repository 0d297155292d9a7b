//! Crafting Grid Snapshot
//!
//! The 3x3 crafting matrix as an immutable-by-convention value. Slots are
//! stored row-major, index `row * 3 + column`.
//!
//! # Example
//!
//! ```
//! use craftkit_common::ItemKey;
//! use craftkit_kernel::crafting_grid::CraftingGrid;
//! use craftkit_kernel::item_stack::ItemStack;
//!
//! let grid = CraftingGrid::empty()
//!     .with_slot(4, Some(ItemStack::new(ItemKey::minecraft("diamond"), 2)));
//!
//! assert_eq!(grid.amount_at(4), 2);
//! assert_eq!(grid.occupied_count(), 1);
//!
//! // Anything but nine slots is a contract violation.
//! assert!(CraftingGrid::from_slots(vec![None; 8]).is_err());
//! ```

use craftkit_common::GridError;

use crate::item_stack::ItemStack;

/// Width and height of the crafting matrix.
pub const GRID_SIDE: usize = 3;

/// Number of slots in the crafting matrix.
pub const GRID_SLOTS: usize = GRID_SIDE * GRID_SIDE;

/// Slot content: a stack, or `None` for an empty slot.
pub type Slot = Option<ItemStack>;

/// A 3x3 crafting matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CraftingGrid {
    slots: [Slot; GRID_SLOTS],
}

impl CraftingGrid {
    /// Create a grid with every slot empty.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a grid from a slot sequence supplied by the host.
    ///
    /// Stacks with an amount of zero are normalised to empty slots.
    pub fn from_slots(slots: Vec<Slot>) -> Result<Self, GridError> {
        let slots: [Slot; GRID_SLOTS] =
            slots
                .try_into()
                .map_err(|rejected: Vec<Slot>| GridError::InvalidSize {
                    expected: GRID_SLOTS,
                    actual: rejected.len(),
                })?;

        Ok(Self {
            slots: slots.map(|slot| slot.filter(|stack| !stack.is_empty())),
        })
    }

    /// Copy of this grid with one slot replaced.
    ///
    /// # Panics
    /// Panics if `index` is outside the grid.
    #[must_use]
    pub fn with_slot(mut self, index: usize, slot: Slot) -> Self {
        self.set(index, slot);
        self
    }

    /// Stack at `index`, or `None` when empty or out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Amount held at `index`; zero for empty slots.
    #[must_use]
    pub fn amount_at(&self, index: usize) -> u32 {
        self.get(index).map_or(0, ItemStack::amount)
    }

    /// Check whether a slot is occupied.
    #[must_use]
    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Check if the grid is completely empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Count non-empty slots.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// All slots in row-major order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Occupied slots with their indices.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &ItemStack)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|stack| (index, stack)))
    }

    /// Consume the grid, returning the slots for the host to write back.
    #[must_use]
    pub fn into_slots(self) -> Vec<Slot> {
        self.slots.into()
    }

    /// Replace a slot in place. Empty stacks become empty slots.
    pub(crate) fn set(&mut self, index: usize, slot: Slot) {
        self.slots[index] = slot.filter(|stack| !stack.is_empty());
    }

    /// Remove up to `count` items from a slot, returning how many were taken.
    pub(crate) fn take(&mut self, index: usize, count: u32) -> u32 {
        let Some(stack) = self.get(index) else {
            return 0;
        };
        let taken = count.min(stack.amount());
        let remaining = stack.shrink(taken);
        self.set(index, Some(remaining));
        taken
    }
}

impl TryFrom<Vec<Slot>> for CraftingGrid {
    type Error = GridError;

    fn try_from(slots: Vec<Slot>) -> Result<Self, Self::Error> {
        Self::from_slots(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftkit_common::ItemKey;

    fn stone(amount: u32) -> Slot {
        Some(ItemStack::new(ItemKey::minecraft("stone"), amount))
    }

    #[test]
    fn test_empty_grid() {
        let grid = CraftingGrid::empty();
        assert!(grid.is_empty());
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.slots().len(), GRID_SLOTS);
    }

    #[test]
    fn test_from_slots_rejects_wrong_size() {
        assert_eq!(
            CraftingGrid::from_slots(vec![None; 8]),
            Err(GridError::InvalidSize {
                expected: 9,
                actual: 8
            })
        );
        assert!(CraftingGrid::try_from(vec![None; 10]).is_err());
        assert!(CraftingGrid::from_slots(Vec::new()).is_err());
    }

    #[test]
    fn test_from_slots_normalises_zero_amounts() {
        let mut slots = vec![None; 9];
        slots[2] = stone(0);
        slots[3] = stone(5);

        let grid = CraftingGrid::from_slots(slots).expect("nine slots");
        assert!(!grid.is_occupied(2));
        assert_eq!(grid.amount_at(3), 5);
    }

    #[test]
    fn test_take_clears_exhausted_slot() {
        let mut grid = CraftingGrid::empty().with_slot(0, stone(3));
        assert_eq!(grid.take(0, 2), 2);
        assert_eq!(grid.amount_at(0), 1);
        assert_eq!(grid.take(0, 5), 1);
        assert!(!grid.is_occupied(0));
        assert_eq!(grid.take(0, 1), 0);
    }

    #[test]
    fn test_occupied_iterates_in_slot_order() {
        let grid = CraftingGrid::empty()
            .with_slot(7, stone(1))
            .with_slot(1, stone(2));
        let indices: Vec<_> = grid.occupied().map(|(index, _)| index).collect();
        assert_eq!(indices, vec![1, 7]);
    }

    #[test]
    fn test_into_slots_round_trip() {
        let grid = CraftingGrid::empty().with_slot(4, stone(9));
        let slots = grid.clone().into_slots();
        assert_eq!(slots.len(), 9);
        assert_eq!(CraftingGrid::from_slots(slots), Ok(grid));
    }
}
