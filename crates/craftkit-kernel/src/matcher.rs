//! Recipe Matching and Matrix Reduction
//!
//! Validation answers "does this grid satisfy the recipe?". Reduction
//! answers "how many times can it be applied?" and returns the grid with
//! the consumed ingredients removed.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────────┐
//! │ CraftingGrid    │────▶│ validate()       │────▶│ reduce()            │
//! │ (host snapshot) │     │ (offset search / │     │ (craft count, fresh │
//! │                 │     │  first-fit set)  │     │  grid)              │
//! └─────────────────┘     └──────────────────┘     └─────────────────────┘
//! ```
//!
//! Both paths compare ingredients through [`matches_ingredient`] only.
//!
//! Shaped recipes are searched at every offset that keeps the pattern inside
//! the 3x3 grid. Only the cells under the pattern are inspected; slots
//! outside the pattern footprint are neither checked nor consumed.
//!
//! Shapeless recipes use first-fit assignment: each occupied slot, in slot
//! order, claims the first unclaimed ingredient it satisfies. This is not a
//! bipartite matching and can reject a grid that a different pairing would
//! accept.

use craftkit_common::GridError;
use tracing::{debug, trace};

use crate::crafting_grid::{CraftingGrid, Slot, GRID_SLOTS};
use crate::item_stack::{Ingredient, ItemStack};
use crate::recipe::{CellRequirement, CraftingRecipe, RecipeSpec, ShapedPattern, ShapelessIngredients};

/// Outcome of reducing a grid against a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// Grid after consumption. Equal to the input when `crafts == 0`.
    pub grid: CraftingGrid,
    /// Number of recipe applications performed.
    pub crafts: u32,
}

impl Reduction {
    fn unchanged(grid: &CraftingGrid) -> Self {
        Self {
            grid: grid.clone(),
            crafts: 0,
        }
    }

    /// True when nothing could be crafted.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.crafts == 0
    }
}

/// Check a slot against a required ingredient.
///
/// An absent requirement matches anything, including an empty slot. A
/// present one needs a non-empty slot of the same kind holding at least the
/// required amount; model data is compared only when both sides have it.
#[must_use]
pub fn matches_ingredient(slot: Option<&ItemStack>, required: Option<&Ingredient>) -> bool {
    let Some(required) = required else {
        return true;
    };
    let Some(stack) = slot else {
        return false;
    };
    !stack.is_empty() && stack.amount() >= required.amount() && required.accepts_kind(stack)
}

fn cell_matches(grid: &CraftingGrid, index: usize, requirement: CellRequirement<'_>) -> bool {
    match requirement {
        CellRequirement::Empty => !grid.is_occupied(index),
        CellRequirement::Any => true,
        CellRequirement::Item(ingredient) => matches_ingredient(grid.get(index), Some(ingredient)),
    }
}

/// First offset, rows first, at which every pattern cell is satisfied.
fn matching_offset(pattern: &ShapedPattern, grid: &CraftingGrid) -> Option<(usize, usize)> {
    pattern.offsets().find(|&offset| {
        let matched = pattern
            .cells_at(offset)
            .all(|(index, requirement)| cell_matches(grid, index, requirement));
        trace!(?offset, matched, "shaped offset checked");
        matched
    })
}

/// Check a grid against a shaped pattern at every valid offset.
#[must_use]
pub fn validate_shaped(pattern: &ShapedPattern, grid: &CraftingGrid) -> bool {
    matching_offset(pattern, grid).is_some()
}

/// Check that the grid holds exactly the multiset of ingredients.
#[must_use]
pub fn validate_shapeless(ingredients: &ShapelessIngredients, grid: &CraftingGrid) -> bool {
    let mut unclaimed: Vec<&Ingredient> = ingredients.as_slice().iter().collect();

    for (index, stack) in grid.occupied() {
        let Some(position) = unclaimed
            .iter()
            .position(|ingredient| matches_ingredient(Some(stack), Some(ingredient)))
        else {
            trace!(index, key = %stack.key(), "slot claims no ingredient");
            return false;
        };
        unclaimed.remove(position);
    }

    unclaimed.is_empty()
}

/// Check whether a grid satisfies a recipe.
#[must_use]
pub fn validate(recipe: &CraftingRecipe, grid: &CraftingGrid) -> bool {
    match recipe.spec() {
        RecipeSpec::Shaped(pattern) => validate_shaped(pattern, grid),
        RecipeSpec::Shapeless(ingredients) => validate_shapeless(ingredients, grid),
    }
}

/// Validate a raw slot sequence from the host.
///
/// A sequence that is not nine slots long is a contract violation.
pub fn validate_slots(recipe: &CraftingRecipe, slots: &[Slot]) -> Result<bool, GridError> {
    let grid = CraftingGrid::from_slots(slots.to_vec())?;
    Ok(validate(recipe, &grid))
}

/// Compute how many crafts the grid supports and consume their ingredients.
///
/// With `process_all` the count is the maximum possible (bulk crafting);
/// otherwise it is at most one. The count never exceeds the output's max
/// stack size. A count of zero returns the input grid unchanged.
#[must_use]
pub fn reduce(recipe: &CraftingRecipe, grid: &CraftingGrid, process_all: bool) -> Reduction {
    let max_stack = recipe.max_stack_size();
    let reduced = match recipe.spec() {
        RecipeSpec::Shaped(pattern) => reduce_shaped(pattern, grid, max_stack, process_all),
        RecipeSpec::Shapeless(ingredients) => {
            reduce_shapeless(ingredients, grid, max_stack, process_all)
        },
    };

    match reduced {
        Some(reduction) => {
            debug!(
                result = %recipe.result().key(),
                crafts = reduction.crafts,
                process_all,
                "Reduced crafting matrix"
            );
            reduction
        },
        None => Reduction::unchanged(grid),
    }
}

/// Reduce a raw slot sequence from the host.
pub fn reduce_slots(
    recipe: &CraftingRecipe,
    slots: &[Slot],
    process_all: bool,
) -> Result<Reduction, GridError> {
    let grid = CraftingGrid::from_slots(slots.to_vec())?;
    Ok(reduce(recipe, &grid, process_all))
}

fn craft_count(bound: u32, max_stack: u32, process_all: bool) -> u32 {
    let bound = bound.min(max_stack);
    if process_all {
        bound
    } else {
        bound.min(1)
    }
}

fn reduce_shaped(
    pattern: &ShapedPattern,
    grid: &CraftingGrid,
    max_stack: u32,
    process_all: bool,
) -> Option<Reduction> {
    let offset = matching_offset(pattern, grid)?;

    // Bottleneck ingredient across the matched cells
    let bound = pattern
        .cells_at(offset)
        .filter_map(|(index, requirement)| match requirement {
            CellRequirement::Item(ingredient) => {
                Some(if matches_ingredient(grid.get(index), Some(ingredient)) {
                    grid.amount_at(index) / ingredient.amount()
                } else {
                    0
                })
            },
            CellRequirement::Empty | CellRequirement::Any => None,
        })
        .min()
        .unwrap_or(u32::MAX);

    let crafts = craft_count(bound, max_stack, process_all);
    if crafts == 0 {
        return None;
    }

    let mut result = grid.clone();
    for (index, requirement) in pattern.cells_at(offset) {
        if let CellRequirement::Item(ingredient) = requirement {
            result.take(index, ingredient.amount() * crafts);
        }
    }

    Some(Reduction {
        grid: result,
        crafts,
    })
}

/// Total amount held by slots that satisfy the ingredient.
fn available(grid: &CraftingGrid, ingredient: &Ingredient) -> u32 {
    grid.occupied()
        .filter(|(_, stack)| matches_ingredient(Some(stack), Some(ingredient)))
        .fold(0u32, |total, (_, stack)| total.saturating_add(stack.amount()))
}

/// Take `amount * crafts` of every ingredient, greedily in slot order.
///
/// Returns `None` if some ingredient cannot be fully paid, which happens
/// when several ingredients draw on the same slots.
fn consume(
    ingredients: &ShapelessIngredients,
    grid: &CraftingGrid,
    crafts: u32,
) -> Option<CraftingGrid> {
    let mut result = grid.clone();

    for ingredient in ingredients.as_slice() {
        let mut owed = ingredient.amount().saturating_mul(crafts);
        for index in 0..GRID_SLOTS {
            if owed == 0 {
                break;
            }
            if matches_ingredient(grid.get(index), Some(ingredient)) {
                owed -= result.take(index, owed);
            }
        }
        if owed > 0 {
            return None;
        }
    }

    Some(result)
}

fn reduce_shapeless(
    ingredients: &ShapelessIngredients,
    grid: &CraftingGrid,
    max_stack: u32,
    process_all: bool,
) -> Option<Reduction> {
    // Ingredients split across several slots are aggregated
    let bound = ingredients
        .as_slice()
        .iter()
        .map(|ingredient| available(grid, ingredient) / ingredient.amount())
        .min()
        .unwrap_or(0);

    let mut crafts = craft_count(bound, max_stack, process_all);
    while crafts > 0 {
        if let Some(result) = consume(ingredients, grid, crafts) {
            return Some(Reduction {
                grid: result,
                crafts,
            });
        }
        crafts -= 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftkit_common::ItemKey;

    fn key(path: &str) -> ItemKey {
        ItemKey::minecraft(path)
    }

    fn stack(path: &str, amount: u32) -> Slot {
        Some(ItemStack::new(key(path), amount))
    }

    fn grid_with(entries: &[(usize, Slot)]) -> CraftingGrid {
        entries
            .iter()
            .fold(CraftingGrid::empty(), |grid, (index, slot)| {
                grid.with_slot(*index, slot.clone())
            })
    }

    fn output(max_stack: u32) -> ItemStack {
        ItemStack::new(key("diamond_block"), 1).with_max_stack(max_stack)
    }

    fn single_cell_recipe(amount: u32, max_stack: u32) -> CraftingRecipe {
        let pattern =
            ShapedPattern::new(["X"], [('X', Some(Ingredient::new(key("a"), amount)))]).unwrap();
        CraftingRecipe::shaped(pattern, output(max_stack)).unwrap()
    }

    fn shapeless(entries: &[(&str, u32)], max_stack: u32) -> CraftingRecipe {
        let set = ShapelessIngredients::new(
            entries
                .iter()
                .map(|(path, amount)| Ingredient::new(key(path), *amount)),
        )
        .unwrap();
        CraftingRecipe::shapeless(set, output(max_stack)).unwrap()
    }

    fn pickaxe_recipe() -> CraftingRecipe {
        let pattern = ShapedPattern::new(
            ["III", " S ", " S "],
            [
                ('I', Some(Ingredient::new(key("iron_ingot"), 1))),
                ('S', Some(Ingredient::new(key("stick"), 1))),
            ],
        )
        .unwrap();
        CraftingRecipe::shaped(pattern, output(1)).unwrap()
    }

    fn pickaxe_grid(iron: u32, sticks: u32) -> CraftingGrid {
        grid_with(&[
            (0, stack("iron_ingot", iron)),
            (1, stack("iron_ingot", iron)),
            (2, stack("iron_ingot", iron)),
            (4, stack("stick", sticks)),
            (7, stack("stick", sticks)),
        ])
    }

    // === matches_ingredient ===

    #[test]
    fn test_absent_requirement_matches_anything() {
        assert!(matches_ingredient(None, None));
        let present = ItemStack::new(key("a"), 1);
        assert!(matches_ingredient(Some(&present), None));
    }

    #[test]
    fn test_present_requirement_needs_stack() {
        let required = Ingredient::new(key("a"), 1);
        assert!(!matches_ingredient(None, Some(&required)));
        let empty = ItemStack::new(key("a"), 0);
        assert!(!matches_ingredient(Some(&empty), Some(&required)));
    }

    #[test]
    fn test_requirement_amount() {
        let required = Ingredient::new(key("a"), 3);
        let two = ItemStack::new(key("a"), 2);
        let three = ItemStack::new(key("a"), 3);
        assert!(!matches_ingredient(Some(&two), Some(&required)));
        assert!(matches_ingredient(Some(&three), Some(&required)));
    }

    #[test]
    fn test_requirement_kind_and_model() {
        let required = Ingredient::new(key("a"), 1).with_model(5);
        let other_kind = ItemStack::new(key("b"), 1).with_model(5);
        let other_model = ItemStack::new(key("a"), 1).with_model(6);
        let no_model = ItemStack::new(key("a"), 1);

        assert!(!matches_ingredient(Some(&other_kind), Some(&required)));
        assert!(!matches_ingredient(Some(&other_model), Some(&required)));
        assert!(matches_ingredient(Some(&no_model), Some(&required)));
    }

    // === shaped ===

    #[test]
    fn test_single_cell_center() {
        let recipe = single_cell_recipe(1, 64);
        let grid = grid_with(&[(4, stack("a", 3))]);

        assert!(validate(&recipe, &grid));
        let reduction = reduce(&recipe, &grid, true);
        assert_eq!(reduction.crafts, 3);
        assert_eq!(reduction.grid.amount_at(4), 0);
        assert!(reduction.grid.is_empty());
    }

    #[test]
    fn test_single_cell_clamped_by_max_stack() {
        let recipe = single_cell_recipe(1, 2);
        let grid = grid_with(&[(4, stack("a", 3))]);

        let reduction = reduce(&recipe, &grid, true);
        assert_eq!(reduction.crafts, 2);
        assert_eq!(reduction.grid.amount_at(4), 1);
    }

    #[test]
    fn test_shaped_single_application() {
        let recipe = pickaxe_recipe();
        let grid = pickaxe_grid(5, 5);

        let reduction = reduce(&recipe, &grid, false);
        assert_eq!(reduction.crafts, 1);
        for index in [0, 1, 2, 4, 7] {
            assert_eq!(reduction.grid.amount_at(index), 4);
        }
    }

    #[test]
    fn test_shaped_blank_must_be_empty() {
        let recipe = pickaxe_recipe();
        let grid = pickaxe_grid(1, 1).with_slot(3, stack("dirt", 1));

        assert!(!validate(&recipe, &grid));
        let reduction = reduce(&recipe, &grid, true);
        assert!(reduction.is_noop());
        assert_eq!(reduction.grid, grid);
    }

    #[test]
    fn test_shaped_bottleneck() {
        let pattern = ShapedPattern::new(
            ["AB"],
            [
                ('A', Some(Ingredient::new(key("a"), 2))),
                ('B', Some(Ingredient::new(key("b"), 1))),
            ],
        )
        .unwrap();
        let recipe = CraftingRecipe::shaped(pattern, output(64)).unwrap();
        let grid = grid_with(&[(3, stack("a", 7)), (4, stack("b", 10))]);

        let reduction = reduce(&recipe, &grid, true);
        assert_eq!(reduction.crafts, 3);
        assert_eq!(reduction.grid.amount_at(3), 1);
        assert_eq!(reduction.grid.amount_at(4), 7);
    }

    #[test]
    fn test_shaped_every_offset() {
        let pattern = ShapedPattern::new(
            ["AB"],
            [
                ('A', Some(Ingredient::new(key("a"), 1))),
                ('B', Some(Ingredient::new(key("b"), 1))),
            ],
        )
        .unwrap();
        let recipe = CraftingRecipe::shaped(pattern, output(64)).unwrap();

        for row in 0..3 {
            for column in 0..2 {
                let start = row * 3 + column;
                let grid = grid_with(&[(start, stack("a", 1)), (start + 1, stack("b", 1))]);
                assert!(validate(&recipe, &grid), "offset ({row}, {column})");
            }
        }

        // Wrapped across a row boundary
        let wrapped = grid_with(&[(2, stack("a", 1)), (3, stack("b", 1))]);
        assert!(!validate(&recipe, &wrapped));
    }

    #[test]
    fn test_shaped_any_symbol() {
        let pattern = ShapedPattern::new(
            ["A?"],
            [('A', Some(Ingredient::new(key("a"), 1))), ('?', None)],
        )
        .unwrap();
        let recipe = CraftingRecipe::shaped(pattern, output(64)).unwrap();

        let bare = grid_with(&[(0, stack("a", 2))]);
        let filled = grid_with(&[(0, stack("a", 2)), (1, stack("feather", 1))]);

        assert!(validate(&recipe, &bare));
        assert!(validate(&recipe, &filled));

        // Don't-care cells are not consumed
        let reduction = reduce(&recipe, &filled, true);
        assert_eq!(reduction.crafts, 2);
        assert_eq!(reduction.grid.amount_at(1), 1);
    }

    #[test]
    fn test_shaped_model_data() {
        let pattern = ShapedPattern::new(
            ["G"],
            [('G', Some(Ingredient::new(key("a"), 1).with_model(9)))],
        )
        .unwrap();
        let recipe = CraftingRecipe::shaped(pattern, output(64)).unwrap();

        let right = grid_with(&[(0, Some(ItemStack::new(key("a"), 1).with_model(9)))]);
        let wrong = grid_with(&[(0, Some(ItemStack::new(key("a"), 1).with_model(2)))]);
        assert!(validate(&recipe, &right));
        assert!(!validate(&recipe, &wrong));
    }

    #[test]
    fn test_shaped_empty_grid() {
        let recipe = pickaxe_recipe();
        let grid = CraftingGrid::empty();
        assert!(!validate(&recipe, &grid));
        assert_eq!(reduce(&recipe, &grid, true), Reduction::unchanged(&grid));
    }

    // === shapeless ===

    #[test]
    fn test_shapeless_example() {
        let recipe = shapeless(&[("a", 2), ("b", 1)], 64);
        let grid = grid_with(&[(0, stack("a", 2)), (5, stack("b", 1))]);

        assert!(validate(&recipe, &grid));
        let reduction = reduce(&recipe, &grid, false);
        assert_eq!(reduction.crafts, 1);
        assert!(!reduction.grid.is_occupied(0));
        assert!(!reduction.grid.is_occupied(5));
        assert!(reduction.grid.is_empty());
    }

    #[test]
    fn test_shapeless_rejects_extra_item() {
        let recipe = shapeless(&[("a", 1)], 64);
        let grid = grid_with(&[(0, stack("a", 1)), (1, stack("b", 1))]);
        assert!(!validate(&recipe, &grid));
    }

    #[test]
    fn test_shapeless_rejects_leftover_ingredient() {
        let recipe = shapeless(&[("a", 1), ("b", 1)], 64);
        let grid = grid_with(&[(8, stack("a", 1))]);
        assert!(!validate(&recipe, &grid));
    }

    #[test]
    fn test_shapeless_duplicate_ingredients() {
        let recipe = shapeless(&[("a", 1), ("a", 1)], 64);
        let one = grid_with(&[(0, stack("a", 5))]);
        let two = grid_with(&[(0, stack("a", 5)), (4, stack("a", 1))]);

        assert!(!validate(&recipe, &one));
        assert!(validate(&recipe, &two));
    }

    #[test]
    fn test_shapeless_first_fit_is_greedy() {
        // The model-less ingredient is listed first, so the modelled stack
        // claims it and the plain stack is left without a partner.
        let set = ShapelessIngredients::new([
            Ingredient::new(key("a"), 1),
            Ingredient::new(key("a"), 1).with_model(1),
        ])
        .unwrap();
        let recipe = CraftingRecipe::shapeless(set, output(64)).unwrap();
        let grid = grid_with(&[
            (0, Some(ItemStack::new(key("a"), 1).with_model(1))),
            (1, Some(ItemStack::new(key("a"), 1).with_model(2))),
        ]);

        assert!(!validate(&recipe, &grid));
    }

    #[test]
    fn test_shapeless_aggregates_split_ingredient() {
        let recipe = shapeless(&[("a", 1), ("b", 1)], 64);
        let grid = grid_with(&[
            (0, stack("a", 3)),
            (1, stack("a", 4)),
            (2, stack("b", 10)),
        ]);

        let reduction = reduce(&recipe, &grid, true);
        assert_eq!(reduction.crafts, 7);
        assert!(!reduction.grid.is_occupied(0));
        assert!(!reduction.grid.is_occupied(1));
        assert_eq!(reduction.grid.amount_at(2), 3);
    }

    #[test]
    fn test_shapeless_consumes_in_slot_order() {
        let recipe = shapeless(&[("a", 2)], 64);
        let grid = grid_with(&[(3, stack("a", 3)), (6, stack("a", 5))]);

        let reduction = reduce(&recipe, &grid, true);
        assert_eq!(reduction.crafts, 4);
        assert!(reduction.grid.is_empty());

        let reduction = reduce(&recipe, &grid, false);
        assert_eq!(reduction.crafts, 1);
        assert_eq!(reduction.grid.amount_at(3), 1);
        assert_eq!(reduction.grid.amount_at(6), 5);
    }

    #[test]
    fn test_shapeless_shared_slots_stay_conserved() {
        let recipe = shapeless(&[("a", 1), ("a", 1)], 64);
        let grid = grid_with(&[(0, stack("a", 3)), (1, stack("a", 3))]);

        let reduction = reduce(&recipe, &grid, true);
        assert_eq!(reduction.crafts, 3);
        assert!(reduction.grid.is_empty());
    }

    #[test]
    fn test_shapeless_insufficient() {
        let recipe = shapeless(&[("a", 4)], 64);
        let grid = grid_with(&[(0, stack("a", 3))]);
        let reduction = reduce(&recipe, &grid, true);
        assert!(reduction.is_noop());
        assert_eq!(reduction.grid, grid);
    }

    #[test]
    fn test_stack_clamp() {
        let recipe = shapeless(&[("a", 1)], 4);
        let grid = grid_with(&[(0, stack("a", 10))]);
        let reduction = reduce(&recipe, &grid, true);
        assert_eq!(reduction.crafts, 4);
        assert_eq!(reduction.grid.amount_at(0), 6);
    }

    // === raw slots ===

    #[test]
    fn test_slot_sequence_wrong_length() {
        let recipe = single_cell_recipe(1, 64);
        let short = vec![None; 8];

        assert_eq!(
            validate_slots(&recipe, &short),
            Err(GridError::InvalidSize {
                expected: 9,
                actual: 8
            })
        );
        assert!(reduce_slots(&recipe, &short, true).is_err());
    }

    #[test]
    fn test_slot_sequence_valid_length() {
        let recipe = single_cell_recipe(1, 64);
        let mut slots = vec![None; 9];
        slots[4] = stack("a", 2);

        assert_eq!(validate_slots(&recipe, &slots), Ok(true));
        let reduction = reduce_slots(&recipe, &slots, true).expect("nine slots");
        assert_eq!(reduction.crafts, 2);
    }
}
