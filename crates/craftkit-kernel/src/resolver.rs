//! Host stack resolution.
//!
//! The host owns live, mutable item objects. A [`StackResolver`] turns one of
//! those into an [`ItemStack`] snapshot carrying the stable identity key (the
//! persistent tag on custom items, the kind key otherwise) and model data.

use craftkit_common::GridError;

use crate::crafting_grid::{CraftingGrid, Slot};
use crate::item_stack::ItemStack;

/// Maps host item objects to stack snapshots.
pub trait StackResolver {
    /// The host's item type.
    type HostStack;

    /// Snapshot a host stack; `None` for air or an empty stack.
    fn resolve(&self, stack: &Self::HostStack) -> Option<ItemStack>;
}

/// Snapshot a host crafting matrix into a grid.
///
/// The host must supply exactly nine entries.
pub fn snapshot_grid<R: StackResolver>(
    resolver: &R,
    stacks: &[Option<R::HostStack>],
) -> Result<CraftingGrid, GridError> {
    let slots: Vec<Slot> = stacks
        .iter()
        .map(|stack| stack.as_ref().and_then(|stack| resolver.resolve(stack)))
        .collect();
    CraftingGrid::from_slots(slots)
}
