//! # craftkit kernel
//!
//! The crafting-matrix core: a 3x3 grid of item slots, shaped and shapeless
//! recipe definitions, and the matcher/reducer that decides whether a grid
//! satisfies a recipe and how many times it can be applied.
//!
//! Every operation is a pure function of its inputs. Grids are value
//! snapshots; reducing one returns a fresh grid and never touches the input.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod crafting_grid;
pub mod item_stack;
pub mod matcher;
pub mod recipe;
pub mod resolver;

pub use crafting_grid::{CraftingGrid, Slot, GRID_SIDE, GRID_SLOTS};
pub use item_stack::{Ingredient, ItemStack, DEFAULT_MAX_STACK};
pub use matcher::{
    matches_ingredient, reduce, reduce_slots, validate, validate_shaped, validate_shapeless,
    validate_slots, Reduction,
};
pub use recipe::{CellRequirement, CraftingRecipe, RecipeSpec, ShapedPattern, ShapelessIngredients};
pub use resolver::{snapshot_grid, StackResolver};
