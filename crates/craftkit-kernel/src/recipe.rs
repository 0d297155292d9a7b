//! Recipe Definitions
//!
//! Recipes are a tagged union of a shaped pattern and a shapeless
//! ingredient multiset, plus the output stack that bounds how many crafts a
//! single reduction may perform.
//!
//! Construction validates the shape invariants (at least one row, equal row
//! lengths, fits in 3x3) and rejects zero quantities, so the matcher never
//! sees a malformed recipe.
//!
//! # Example
//!
//! ```
//! use craftkit_common::ItemKey;
//! use craftkit_kernel::item_stack::{Ingredient, ItemStack};
//! use craftkit_kernel::recipe::{CraftingRecipe, RecipeSpec, ShapedPattern};
//!
//! let plank = Ingredient::new(ItemKey::minecraft("oak_planks"), 1);
//! let pattern = ShapedPattern::new(["#", "#"], [('#', Some(plank))]).unwrap();
//!
//! let sticks = CraftingRecipe::shaped(
//!     pattern,
//!     ItemStack::new(ItemKey::minecraft("stick"), 4),
//! )
//! .unwrap();
//!
//! assert!(matches!(sticks.spec(), RecipeSpec::Shaped(p) if p.rows() == 2));
//! ```

use std::collections::BTreeMap;

use craftkit_common::RecipeError;

use crate::crafting_grid::{GRID_SIDE, GRID_SLOTS};
use crate::item_stack::{Ingredient, ItemStack};

/// Symbol meaning "this cell must be empty".
pub const BLANK_SYMBOL: char = ' ';

/// What a single shape cell demands from the grid cell under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRequirement<'a> {
    /// Blank or unmapped symbol: the grid cell must be empty.
    Empty,
    /// Symbol mapped to no descriptor: anything is accepted.
    Any,
    /// A specific ingredient.
    Item(&'a Ingredient),
}

/// A shaped pattern of at most 3x3 symbols with its ingredient map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedPattern {
    cells: Vec<char>,
    rows: usize,
    columns: usize,
    ingredients: BTreeMap<char, Option<Ingredient>>,
}

impl ShapedPattern {
    /// Build a pattern from its rows and symbol map.
    ///
    /// A symbol mapped to `None` accepts any cell content. Symbols that do
    /// not appear in the map require an empty cell, like the blank symbol.
    pub fn new<R, S, I>(rows: R, ingredients: I) -> Result<Self, RecipeError>
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
        I: IntoIterator<Item = (char, Option<Ingredient>)>,
    {
        let rows: Vec<Vec<char>> = rows
            .into_iter()
            .map(|row| row.as_ref().chars().collect())
            .collect();

        let Some(first) = rows.first() else {
            return Err(RecipeError::EmptyShape);
        };
        let columns = first.len();
        if columns == 0 {
            return Err(RecipeError::EmptyRow);
        }
        if let Some((row, bad)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns)
        {
            return Err(RecipeError::RowLengthMismatch {
                row,
                expected: columns,
                actual: bad.len(),
            });
        }
        if rows.len() > GRID_SIDE || columns > GRID_SIDE {
            return Err(RecipeError::ShapeTooLarge {
                rows: rows.len(),
                columns,
            });
        }

        let mut map = BTreeMap::new();
        for (symbol, ingredient) in ingredients {
            if symbol == BLANK_SYMBOL {
                return Err(RecipeError::BlankSymbolMapped);
            }
            map.insert(symbol, ingredient.map(Ingredient::checked).transpose()?);
        }

        Ok(Self {
            rows: rows.len(),
            columns,
            cells: rows.into_iter().flatten().collect(),
            ingredients: map,
        })
    }

    /// Number of pattern rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of pattern columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Symbol at (`row`, `column`) of the pattern.
    #[must_use]
    pub fn symbol(&self, row: usize, column: usize) -> char {
        self.cells[row * self.columns + column]
    }

    /// The ingredient map.
    #[must_use]
    pub const fn ingredients(&self) -> &BTreeMap<char, Option<Ingredient>> {
        &self.ingredients
    }

    /// Requirement of the pattern cell at (`row`, `column`).
    #[must_use]
    pub fn requirement(&self, row: usize, column: usize) -> CellRequirement<'_> {
        let symbol = self.symbol(row, column);
        if symbol == BLANK_SYMBOL {
            return CellRequirement::Empty;
        }
        match self.ingredients.get(&symbol) {
            None => CellRequirement::Empty,
            Some(None) => CellRequirement::Any,
            Some(Some(ingredient)) => CellRequirement::Item(ingredient),
        }
    }

    /// Every placement of the pattern inside the 3x3 grid, as
    /// `(row_offset, column_offset)`, rows first.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> {
        let row_span = GRID_SIDE - self.rows;
        let column_span = GRID_SIDE - self.columns;
        (0..=row_span).flat_map(move |row| (0..=column_span).map(move |column| (row, column)))
    }

    /// Pattern cells with the grid index they cover at the given offset.
    pub fn cells_at(
        &self,
        (row_offset, column_offset): (usize, usize),
    ) -> impl Iterator<Item = (usize, CellRequirement<'_>)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| {
                let index = (row + row_offset) * GRID_SIDE + (column + column_offset);
                (index, self.requirement(row, column))
            })
        })
    }
}

/// An unordered multiset of required ingredients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapelessIngredients {
    ingredients: Vec<Ingredient>,
}

impl ShapelessIngredients {
    /// Build the multiset; between one and nine ingredients.
    pub fn new(ingredients: impl IntoIterator<Item = Ingredient>) -> Result<Self, RecipeError> {
        let ingredients = ingredients
            .into_iter()
            .map(Ingredient::checked)
            .collect::<Result<Vec<_>, _>>()?;

        if ingredients.is_empty() {
            return Err(RecipeError::NoIngredients);
        }
        if ingredients.len() > GRID_SLOTS {
            return Err(RecipeError::TooManyIngredients(ingredients.len()));
        }
        Ok(Self { ingredients })
    }

    /// Ingredients in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[Ingredient] {
        &self.ingredients
    }

    /// Number of ingredient entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Always false for a constructed multiset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

/// Shaped or shapeless recipe body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeSpec {
    /// Ingredients in fixed relative positions.
    Shaped(ShapedPattern),
    /// Ingredients anywhere in the grid.
    Shapeless(ShapelessIngredients),
}

/// A recipe together with the stack it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftingRecipe {
    spec: RecipeSpec,
    result: ItemStack,
}

impl CraftingRecipe {
    /// Create a recipe.
    pub fn new(spec: RecipeSpec, result: ItemStack) -> Result<Self, RecipeError> {
        if result.max_stack_size() == 0 {
            return Err(RecipeError::ZeroMaxStack);
        }
        Ok(Self { spec, result })
    }

    /// Create a shaped recipe.
    pub fn shaped(pattern: ShapedPattern, result: ItemStack) -> Result<Self, RecipeError> {
        Self::new(RecipeSpec::Shaped(pattern), result)
    }

    /// Create a shapeless recipe.
    pub fn shapeless(
        ingredients: ShapelessIngredients,
        result: ItemStack,
    ) -> Result<Self, RecipeError> {
        Self::new(RecipeSpec::Shapeless(ingredients), result)
    }

    /// Recipe body.
    #[must_use]
    pub const fn spec(&self) -> &RecipeSpec {
        &self.spec
    }

    /// Output stack template.
    #[must_use]
    pub const fn result(&self) -> &ItemStack {
        &self.result
    }

    /// Upper bound on crafts per reduction.
    #[must_use]
    pub const fn max_stack_size(&self) -> u32 {
        self.result.max_stack_size()
    }
}
