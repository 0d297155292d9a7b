//! Crafting event decisions.
//!
//! The host forwards its crafting events here as plain data and applies the
//! returned decision to its live inventories.
//!
//! ```text
//! prepare (result slot refresh)   craft (player click)      autocraft (crafter)
//!            │                           │                          │
//!            └──────────┬────────────────┴────────────┬─────────────┘
//!                       ▼                             ▼
//!            resolve result -> custom item      reduce(recipe, grid)
//!                       │                             │
//!        enabled? station? validate(grid)?      new matrix + crafts
//! ```
//!
//! Results that are not custom items pass through to the host, except when a
//! custom item sits in the grid of a host recipe that does not itself accept
//! it.

use craftkit_common::ItemKey;
use craftkit_kernel::{reduce, validate, CraftingGrid, CraftingRecipe, ItemStack};
use thiserror::Error;
use tracing::debug;

use crate::custom_item::{CraftingStation, CustomItem};
use crate::registry::CustomItemRegistry;

/// How the player clicked the result slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Plain click, one craft
    Single,
    /// Shift click, as many crafts as fit in one output stack
    Shift,
}

impl ClickKind {
    /// Whether the click crafts in bulk.
    #[must_use]
    pub const fn is_bulk(self) -> bool {
        matches!(self, Self::Shift)
    }
}

/// Where the crafted output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Placed on the empty cursor
    Cursor,
    /// Added to the stack already on the cursor
    MergeIntoCursor,
    /// Added to the player inventory
    Inventory,
}

/// Why a craft was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftRejection {
    /// The item is disabled by configuration
    #[error("Item {0} is disabled")]
    Disabled(ItemKey),

    /// The item cannot be crafted at this station
    #[error("Item {item} cannot be crafted in {station}")]
    WrongStation {
        /// Item being crafted
        item: ItemKey,
        /// Station the grid belongs to
        station: CraftingStation,
    },

    /// The item has no recipe
    #[error("Item {0} has no recipe")]
    NoRecipe(ItemKey),

    /// The grid does not satisfy the item's recipe
    #[error("Grid does not satisfy the recipe for {0}")]
    InvalidForRecipe(ItemKey),

    /// A custom item was placed in a grid for a host recipe
    #[error("Custom items cannot be used in this recipe")]
    UnsupportedCustomIngredient,
}

/// Decision for a result slot refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// Not ours; leave the host's result alone
    PassThrough,
    /// Show the custom item; `crafts` is what a shift click would yield
    Preview {
        /// Item shown in the result slot
        item: ItemKey,
        /// Bulk craft count
        crafts: u32,
    },
    /// Clear the result slot
    Rejected(CraftRejection),
}

/// A completed craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftOutcome {
    /// Matrix to write back to the host
    pub matrix: CraftingGrid,
    /// Number of times the recipe was applied
    pub crafts: u32,
    /// Stack handed to the player
    pub output: ItemStack,
    /// Where the output goes
    pub delivery: Delivery,
}

/// Decision for a click or autocrafter event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CraftDecision {
    /// Not ours; let the host craft
    PassThrough,
    /// Cancel the event
    Rejected(CraftRejection),
    /// Cancel the host craft and apply this outcome instead
    Crafted(CraftOutcome),
}

/// Decides crafting events against a registry.
#[derive(Debug, Clone, Copy)]
pub struct CraftingHandler<'a> {
    registry: &'a CustomItemRegistry,
}

impl<'a> CraftingHandler<'a> {
    /// Creates a handler over a registry.
    #[must_use]
    pub const fn new(registry: &'a CustomItemRegistry) -> Self {
        Self { registry }
    }

    /// Result slot refresh.
    ///
    /// `host_recipe` is the recipe the host matched for a non-custom result,
    /// if any.
    #[must_use]
    pub fn prepare(
        &self,
        station: CraftingStation,
        result: Option<&ItemKey>,
        host_recipe: Option<&CraftingRecipe>,
        grid: &CraftingGrid,
    ) -> PrepareOutcome {
        let Some(item) = result.and_then(|key| self.registry.get(key)) else {
            return match host_recipe {
                Some(recipe) if self.registry.contains_custom(grid) && !validate(recipe, grid) => {
                    debug!("Custom item in host recipe grid");
                    PrepareOutcome::Rejected(CraftRejection::UnsupportedCustomIngredient)
                }
                _ => PrepareOutcome::PassThrough,
            };
        };

        match Self::check(item, Some(station), grid) {
            Ok(recipe) => PrepareOutcome::Preview {
                item: item.key().clone(),
                crafts: reduce(recipe, grid, true).crafts,
            },
            Err(rejection) => {
                debug!(item = %item.key(), %rejection, "Preview rejected");
                PrepareOutcome::Rejected(rejection)
            }
        }
    }

    /// Player click on the result slot.
    #[must_use]
    pub fn craft(
        &self,
        station: CraftingStation,
        result: Option<&ItemKey>,
        grid: &CraftingGrid,
        click: ClickKind,
        cursor: Option<&ItemStack>,
    ) -> CraftDecision {
        let Some(item) = result.and_then(|key| self.registry.get(key)) else {
            return CraftDecision::PassThrough;
        };

        let recipe = match Self::check(item, Some(station), grid) {
            Ok(recipe) => recipe,
            Err(rejection) => return Self::rejected(item, rejection),
        };

        let reduction = reduce(recipe, grid, click.is_bulk());
        let output = item.item_for_player(reduction.crafts);
        let delivery = delivery(click, cursor, &output);
        debug!(item = %item.key(), crafts = reduction.crafts, ?delivery, "Crafted custom item");

        CraftDecision::Crafted(CraftOutcome {
            matrix: reduction.grid,
            crafts: reduction.crafts,
            output,
            delivery,
        })
    }

    /// Crafter block firing. Always a single craft; the output is dispensed
    /// by the host.
    #[must_use]
    pub fn autocraft(&self, result: Option<&ItemKey>, grid: &CraftingGrid) -> CraftDecision {
        let Some(item) = result.and_then(|key| self.registry.get(key)) else {
            return CraftDecision::PassThrough;
        };

        let recipe = match Self::check(item, None, grid) {
            Ok(recipe) => recipe,
            Err(rejection) => return Self::rejected(item, rejection),
        };

        let reduction = reduce(recipe, grid, false);
        debug!(item = %item.key(), crafts = reduction.crafts, "Autocrafted custom item");

        CraftDecision::Crafted(CraftOutcome {
            matrix: reduction.grid,
            crafts: reduction.crafts,
            output: item.item_for_player(reduction.crafts),
            delivery: Delivery::Inventory,
        })
    }

    /// Common gate for every custom craft.
    fn check<'i>(
        item: &'i CustomItem,
        station: Option<CraftingStation>,
        grid: &CraftingGrid,
    ) -> Result<&'i CraftingRecipe, CraftRejection> {
        if !item.is_enabled() {
            return Err(CraftRejection::Disabled(item.key().clone()));
        }
        if let Some(station) = station {
            if !item.craftable_in(station) {
                return Err(CraftRejection::WrongStation {
                    item: item.key().clone(),
                    station,
                });
            }
        }
        let recipe = item
            .recipe()
            .ok_or_else(|| CraftRejection::NoRecipe(item.key().clone()))?;
        if !validate(recipe, grid) {
            return Err(CraftRejection::InvalidForRecipe(item.key().clone()));
        }
        Ok(recipe)
    }

    fn rejected(item: &CustomItem, rejection: CraftRejection) -> CraftDecision {
        debug!(item = %item.key(), %rejection, "Craft rejected");
        CraftDecision::Rejected(rejection)
    }
}

/// Where a freshly crafted stack should go.
///
/// Merging needs a similar stack (same key and model data) on the cursor with
/// room for the whole output.
#[must_use]
pub fn delivery(click: ClickKind, cursor: Option<&ItemStack>, output: &ItemStack) -> Delivery {
    if click.is_bulk() {
        return Delivery::Inventory;
    }
    match cursor.filter(|stack| !stack.is_empty()) {
        None => Delivery::Cursor,
        Some(held)
            if held.is_similar(output)
                && !held.is_full()
                && held.amount().saturating_add(output.amount()) <= held.max_stack_size() =>
        {
            Delivery::MergeIntoCursor
        }
        Some(_) => Delivery::Inventory,
    }
}
