//! # craftkit gameplay
//!
//! Custom item definitions and the decisions the host makes around a
//! crafting matrix:
//! - Custom items with rarity, model data, allowed stations and a recipe
//! - A registry keyed by item identity, with config-driven enable gating
//! - Pure crafting event handlers (preview, click, autocrafter)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod crafting_events;
pub mod custom_item;
pub mod registry;

pub use crafting_events::{
    delivery, ClickKind, CraftDecision, CraftOutcome, CraftRejection, CraftingHandler, Delivery,
    PrepareOutcome,
};
pub use custom_item::{CraftingStation, CustomItem, CustomItemBuilder, ItemRarity};
pub use registry::{CustomItemRegistry, ItemGate, RegistryError};
