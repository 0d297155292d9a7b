//! Custom item definitions.

use std::fmt;

use craftkit_common::{ItemKey, ModelData, RecipeError};
use craftkit_kernel::item_stack::{ItemStack, DEFAULT_MAX_STACK};
use craftkit_kernel::recipe::{CraftingRecipe, RecipeSpec};
use serde::{Deserialize, Serialize};

/// Rarity tier shown on a custom item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemRarity {
    /// No rarity tag
    #[default]
    None,
    /// Common
    Common,
    /// Uncommon
    Uncommon,
    /// Rare
    Rare,
    /// Epic
    Epic,
    /// Legendary
    Legendary,
    /// Mythical
    Mythical,
    /// Staff-only items
    Admin,
}

impl ItemRarity {
    /// Label rendered in the item tooltip; empty for [`ItemRarity::None`].
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Mythical => "Mythical",
            Self::Admin => "Admin",
        }
    }

    /// Tooltip colour as a hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::None => "#FFFFFF",
            Self::Common => "#AAAAAA",
            Self::Uncommon => "#55FF55",
            Self::Rare => "#0000AA",
            Self::Epic => "#AA00AA",
            Self::Legendary => "#FFAA00",
            Self::Mythical => "#FFFF55",
            Self::Admin => "#AA0000",
        }
    }
}

/// Inventory in which a crafting matrix is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CraftingStation {
    /// Crafting table opened by a player
    Workbench,
    /// Automated crafter block
    Crafter,
    /// The 2x2 grid in the player inventory
    PlayerInventory,
}

impl CraftingStation {
    /// Every station.
    pub const ALL: [Self; 3] = [Self::Workbench, Self::Crafter, Self::PlayerInventory];
}

impl fmt::Display for CraftingStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Workbench => "workbench",
            Self::Crafter => "crafter",
            Self::PlayerInventory => "player_inventory",
        };
        f.write_str(name)
    }
}

/// A custom item and, optionally, the recipe that produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomItem {
    key: ItemKey,
    display_name: String,
    rarity: ItemRarity,
    special: bool,
    template: ItemStack,
    stations: Vec<CraftingStation>,
    descriptions: Vec<String>,
    recipe: Option<CraftingRecipe>,
    enabled: bool,
}

impl CustomItem {
    /// Creates a new custom item builder.
    #[must_use]
    pub fn builder(key: ItemKey, display_name: impl Into<String>) -> CustomItemBuilder {
        CustomItemBuilder::new(key, display_name)
    }

    /// Identity key persisted on every stack of this item.
    #[must_use]
    pub const fn key(&self) -> &ItemKey {
        &self.key
    }

    /// Display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Rarity tier.
    #[must_use]
    pub const fn rarity(&self) -> ItemRarity {
        self.rarity
    }

    /// Whether the item is flagged special (glint, unique handling).
    #[must_use]
    pub const fn is_special(&self) -> bool {
        self.special
    }

    /// Custom model data.
    #[must_use]
    pub const fn model(&self) -> Option<ModelData> {
        self.template.model()
    }

    /// Maximum stack size of the item.
    #[must_use]
    pub const fn max_stack_size(&self) -> u32 {
        self.template.max_stack_size()
    }

    /// Stations the item may be crafted in.
    #[must_use]
    pub fn stations(&self) -> &[CraftingStation] {
        &self.stations
    }

    /// Tooltip lines.
    #[must_use]
    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    /// Recipe producing this item.
    #[must_use]
    pub const fn recipe(&self) -> Option<&CraftingRecipe> {
        self.recipe.as_ref()
    }

    /// Whether crafting this item is currently allowed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the item.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check whether the item can be crafted at a station.
    #[must_use]
    pub fn craftable_in(&self, station: CraftingStation) -> bool {
        self.stations.contains(&station)
    }

    /// Check whether a stack is this item.
    #[must_use]
    pub fn is_item(&self, stack: &ItemStack) -> bool {
        stack.key() == &self.key
    }

    /// Stack handed to a player after crafting.
    #[must_use]
    pub fn item_for_player(&self, amount: u32) -> ItemStack {
        self.template.with_amount(amount)
    }
}

/// Builder for creating custom items.
#[derive(Debug)]
pub struct CustomItemBuilder {
    key: ItemKey,
    display_name: String,
    rarity: ItemRarity,
    special: bool,
    model: Option<ModelData>,
    max_stack_size: u32,
    stations: Vec<CraftingStation>,
    descriptions: Vec<String>,
    recipe: Option<RecipeSpec>,
    enabled: bool,
}

impl CustomItemBuilder {
    fn new(key: ItemKey, display_name: impl Into<String>) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            rarity: ItemRarity::None,
            special: false,
            model: None,
            max_stack_size: DEFAULT_MAX_STACK,
            stations: Vec::new(),
            descriptions: Vec::new(),
            recipe: None,
            enabled: true,
        }
    }

    /// Sets the rarity tier.
    #[must_use]
    pub const fn rarity(mut self, rarity: ItemRarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Flags the item as special.
    #[must_use]
    pub const fn special(mut self, special: bool) -> Self {
        self.special = special;
        self
    }

    /// Sets custom model data.
    #[must_use]
    pub const fn model(mut self, model: ModelData) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the maximum stack size.
    #[must_use]
    pub const fn max_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    /// Allows crafting at a station. With none set, every station is allowed.
    #[must_use]
    pub fn station(mut self, station: CraftingStation) -> Self {
        if !self.stations.contains(&station) {
            self.stations.push(station);
        }
        self
    }

    /// Adds a tooltip line.
    #[must_use]
    pub fn description(mut self, line: impl Into<String>) -> Self {
        self.descriptions.push(line.into());
        self
    }

    /// Sets the recipe producing the item.
    #[must_use]
    pub fn recipe(mut self, spec: RecipeSpec) -> Self {
        self.recipe = Some(spec);
        self
    }

    /// Sets the initial enabled state.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builds the item. The recipe output is the item itself.
    pub fn build(self) -> Result<CustomItem, RecipeError> {
        let mut template = ItemStack::new(self.key.clone(), 1).with_max_stack(self.max_stack_size);
        if let Some(model) = self.model {
            template = template.with_model(model);
        }

        let recipe = self
            .recipe
            .map(|spec| CraftingRecipe::new(spec, template.clone()))
            .transpose()?;

        let stations = if self.stations.is_empty() {
            CraftingStation::ALL.to_vec()
        } else {
            self.stations
        };

        Ok(CustomItem {
            key: self.key,
            display_name: self.display_name,
            rarity: self.rarity,
            special: self.special,
            template,
            stations,
            descriptions: self.descriptions,
            recipe,
            enabled: self.enabled,
        })
    }
}
