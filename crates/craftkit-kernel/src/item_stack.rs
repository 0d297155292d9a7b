//! Item Stack Snapshots
//!
//! Plain value types standing in for the host's live item objects:
//!
//! - [`ItemStack`]: what occupies a grid slot (kind, amount, stack limit,
//!   optional model data)
//! - [`Ingredient`]: what a recipe requires (kind, amount, optional model
//!   data)
//!
//! # Example
//!
//! ```
//! use craftkit_common::ItemKey;
//! use craftkit_kernel::item_stack::{Ingredient, ItemStack};
//!
//! let planks = ItemStack::new(ItemKey::minecraft("oak_planks"), 12);
//! let needed = Ingredient::new(ItemKey::minecraft("oak_planks"), 4);
//!
//! assert!(needed.accepts_kind(&planks));
//! assert_eq!(planks.shrink(8).amount(), 4);
//! ```

use craftkit_common::{ItemKey, ModelData, RecipeError};

/// Default maximum stack size for an item kind.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// A stack of items occupying one grid slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemStack {
    key: ItemKey,
    amount: u32,
    max_stack_size: u32,
    model: Option<ModelData>,
}

impl ItemStack {
    /// Create a stack with the default stack limit and no model data.
    #[must_use]
    pub fn new(key: ItemKey, amount: u32) -> Self {
        Self {
            key,
            amount,
            max_stack_size: DEFAULT_MAX_STACK,
            model: None,
        }
    }

    /// Set the maximum stack size for this kind.
    #[must_use]
    pub const fn with_max_stack(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    /// Attach custom model data.
    #[must_use]
    pub const fn with_model(mut self, model: ModelData) -> Self {
        self.model = Some(model);
        self
    }

    /// Replace the amount, keeping identity and limits.
    #[must_use]
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    /// Identity key of the kind.
    #[must_use]
    pub const fn key(&self) -> &ItemKey {
        &self.key
    }

    /// Number of items in the stack.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Maximum number of items a single stack of this kind can hold.
    #[must_use]
    pub const fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    /// Custom model data, if any.
    #[must_use]
    pub const fn model(&self) -> Option<ModelData> {
        self.model
    }

    /// A stack with no items is treated as an empty slot.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount == 0
    }

    /// Check whether the stack is at its limit.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.amount >= self.max_stack_size
    }

    /// Copy of this stack with `count` items removed (saturating at zero).
    #[must_use]
    pub fn shrink(&self, count: u32) -> Self {
        self.with_amount(self.amount.saturating_sub(count))
    }

    /// Whether two stacks are the same kind and could merge.
    #[must_use]
    pub fn is_similar(&self, other: &Self) -> bool {
        self.key == other.key && self.model == other.model
    }
}

/// A required ingredient: kind, quantity per craft, and optional model data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ingredient {
    key: ItemKey,
    amount: u32,
    model: Option<ModelData>,
}

impl Ingredient {
    /// Create an ingredient requirement.
    ///
    /// A zero amount is accepted here and rejected when the recipe is built;
    /// see [`Ingredient::checked`].
    #[must_use]
    pub fn new(key: ItemKey, amount: u32) -> Self {
        Self {
            key,
            amount,
            model: None,
        }
    }

    /// Require specific model data.
    #[must_use]
    pub const fn with_model(mut self, model: ModelData) -> Self {
        self.model = Some(model);
        self
    }

    /// Identity key of the required kind.
    #[must_use]
    pub const fn key(&self) -> &ItemKey {
        &self.key
    }

    /// Quantity consumed per craft.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Required model data, if any.
    #[must_use]
    pub const fn model(&self) -> Option<ModelData> {
        self.model
    }

    /// Identity comparison, ignoring quantities.
    ///
    /// Kinds must be equal. Model data is only compared when both sides
    /// carry it.
    #[must_use]
    pub fn accepts_kind(&self, stack: &ItemStack) -> bool {
        if self.key != *stack.key() {
            return false;
        }
        match (self.model, stack.model()) {
            (Some(required), Some(present)) => required == present,
            _ => true,
        }
    }

    /// Returns the ingredient if its amount is usable in a recipe.
    pub(crate) fn checked(self) -> Result<Self, RecipeError> {
        if self.amount == 0 {
            return Err(RecipeError::ZeroQuantity(self.key.to_string()));
        }
        Ok(self)
    }
}
