//! Item definition loading.
//!
//! This module provides:
//! - Loading custom items and their recipes from `<directory>/*.toml`
//! - Definition validation on load; bad entries are skipped, not fatal
//! - Enable gating applied after every load
//! - Hot-reload support driven by file modification times
//!
//! A definition file looks like:
//!
//! ```toml
//! version = "1.0.0"
//!
//! [[items]]
//! key = "gems:ruby"
//! name = "Ruby"
//! rarity = "rare"
//! model = 1001
//! stations = ["workbench"]
//!
//! [items.recipe]
//! type = "shaped"
//! shape = ["rr", "rr"]
//! ingredients = { r = { item = "redstone", amount = 2 } }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use craftkit_common::{ItemKey, KeyError, ModelData, RecipeError};
use craftkit_gameplay::{CraftingStation, CustomItem, CustomItemRegistry, ItemGate, ItemRarity};
use craftkit_kernel::{
    Ingredient, RecipeSpec, ShapedPattern, ShapelessIngredients, DEFAULT_MAX_STACK,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default directory for item definition files.
pub const DEFAULT_ITEM_PATH: &str = "items";

/// Errors that can occur during item loading.
#[derive(Debug, Error)]
pub enum ItemLoadError {
    /// Failed to read file.
    #[error("Failed to read item file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse item TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Malformed item or ingredient key.
    #[error("Invalid key {key:?}: {source}")]
    InvalidKey {
        /// Key as written
        key: String,
        /// Why it was refused
        source: KeyError,
    },

    /// Recipe rejected by the kernel.
    #[error("Invalid recipe for {item}: {source}")]
    InvalidRecipe {
        /// Item the recipe produces
        item: String,
        /// Why it was refused
        source: RecipeError,
    },

    /// Validation error.
    #[error("Item validation error: {0}")]
    ValidationError(String),
}

/// Result type for item loading operations.
pub type ItemLoadResult<T> = Result<T, ItemLoadError>;

fn parse_key(raw: &str) -> ItemLoadResult<ItemKey> {
    ItemKey::parse(raw).map_err(|source| ItemLoadError::InvalidKey {
        key: raw.to_string(),
        source,
    })
}

/// An ingredient from file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDefinition {
    /// Item key; the namespace defaults to `minecraft`.
    pub item: String,
    /// Quantity required per craft.
    #[serde(default = "default_amount")]
    pub amount: u32,
    /// Required custom model data.
    #[serde(default)]
    pub model: Option<ModelData>,
}

const fn default_amount() -> u32 {
    1
}

impl IngredientDefinition {
    fn to_ingredient(&self) -> ItemLoadResult<Ingredient> {
        let ingredient = Ingredient::new(parse_key(&self.item)?, self.amount);
        Ok(match self.model {
            Some(model) => ingredient.with_model(model),
            None => ingredient,
        })
    }
}

/// A recipe from file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecipeDefinition {
    /// Positional recipe.
    Shaped {
        /// Pattern rows, top to bottom.
        shape: Vec<String>,
        /// Ingredient per single-character symbol.
        #[serde(default)]
        ingredients: BTreeMap<String, IngredientDefinition>,
        /// Symbols that accept any cell content.
        #[serde(default)]
        wildcards: Vec<String>,
    },
    /// Unordered recipe.
    Shapeless {
        /// Required ingredients.
        ingredients: Vec<IngredientDefinition>,
    },
}

fn symbol(raw: &str) -> ItemLoadResult<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(ItemLoadError::ValidationError(format!(
            "Recipe symbol {raw:?} must be a single character"
        ))),
    }
}

impl RecipeDefinition {
    /// Converts to a kernel recipe shape.
    pub fn to_spec(&self, item: &str) -> ItemLoadResult<RecipeSpec> {
        let invalid = |source| ItemLoadError::InvalidRecipe {
            item: item.to_string(),
            source,
        };

        match self {
            Self::Shaped {
                shape,
                ingredients,
                wildcards,
            } => {
                let mut symbols = Vec::with_capacity(ingredients.len() + wildcards.len());
                for (raw, definition) in ingredients {
                    symbols.push((symbol(raw)?, Some(definition.to_ingredient()?)));
                }
                for raw in wildcards {
                    symbols.push((symbol(raw)?, None));
                }
                let pattern = ShapedPattern::new(shape, symbols).map_err(invalid)?;
                Ok(RecipeSpec::Shaped(pattern))
            },
            Self::Shapeless { ingredients } => {
                let ingredients = ingredients
                    .iter()
                    .map(IngredientDefinition::to_ingredient)
                    .collect::<ItemLoadResult<Vec<_>>>()?;
                let set = ShapelessIngredients::new(ingredients).map_err(invalid)?;
                Ok(RecipeSpec::Shapeless(set))
            },
        }
    }
}

/// A custom item definition loaded from file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Identity key, e.g. `gems:ruby`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Rarity tier.
    #[serde(default)]
    pub rarity: ItemRarity,
    /// Special flag.
    #[serde(default)]
    pub special: bool,
    /// Custom model data.
    #[serde(default)]
    pub model: Option<ModelData>,
    /// Maximum stack size.
    #[serde(default = "default_max_stack")]
    pub max_stack_size: u32,
    /// Stations the item may be crafted in; empty allows all.
    #[serde(default)]
    pub stations: Vec<CraftingStation>,
    /// Tooltip lines.
    #[serde(default)]
    pub description: Vec<String>,
    /// Recipe producing the item.
    #[serde(default)]
    pub recipe: Option<RecipeDefinition>,
}

const fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

impl ItemDefinition {
    /// Validates the fields the kernel does not check.
    pub fn validate(&self) -> ItemLoadResult<()> {
        if self.name.trim().is_empty() {
            return Err(ItemLoadError::ValidationError(format!(
                "Item {} has empty name",
                self.key
            )));
        }

        if self.max_stack_size == 0 {
            return Err(ItemLoadError::ValidationError(format!(
                "Item {} has zero max stack size",
                self.key
            )));
        }

        Ok(())
    }

    /// Converts to a gameplay custom item.
    pub fn to_custom_item(&self) -> ItemLoadResult<CustomItem> {
        self.validate()?;

        let mut builder = CustomItem::builder(parse_key(&self.key)?, &self.name)
            .rarity(self.rarity)
            .special(self.special)
            .max_stack_size(self.max_stack_size);

        if let Some(model) = self.model {
            builder = builder.model(model);
        }
        for station in &self.stations {
            builder = builder.station(*station);
        }
        for line in &self.description {
            builder = builder.description(line);
        }
        if let Some(recipe) = &self.recipe {
            builder = builder.recipe(recipe.to_spec(&self.key)?);
        }

        builder.build().map_err(|source| ItemLoadError::InvalidRecipe {
            item: self.key.clone(),
            source,
        })
    }
}

/// A collection of items from a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Items in this file.
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Statistics for the item loader.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ItemLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of items registered.
    pub items_loaded: u32,
    /// Number of items carrying a recipe.
    pub recipes_loaded: u32,
    /// Number of skipped files and entries.
    pub validation_errors: u32,
    /// Number of hot-reloads performed.
    pub hot_reloads: u32,
}

/// Item definition loader with hot-reload support.
pub struct ItemLoader {
    /// Directory holding definition files.
    base_path: PathBuf,
    /// Loaded items.
    registry: CustomItemRegistry,
    /// Gating applied after each load.
    gate: ItemGate,
    /// Modification times for hot-reload detection.
    mod_times: HashMap<PathBuf, SystemTime>,
    /// Whether hot-reload is enabled.
    hot_reload_enabled: bool,
    /// Statistics.
    stats: ItemLoaderStats,
}

impl ItemLoader {
    /// Creates a new item loader.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("Initializing item loader at: {:?}", base_path);

        Self {
            base_path,
            registry: CustomItemRegistry::new(),
            gate: ItemGate::allow_all(),
            mod_times: HashMap::new(),
            hot_reload_enabled: cfg!(debug_assertions),
            stats: ItemLoaderStats::default(),
        }
    }

    /// Enables or disables hot-reload.
    #[must_use]
    pub fn with_hot_reload(mut self, enabled: bool) -> Self {
        self.hot_reload_enabled = enabled;
        self
    }

    /// Sets the enable gating applied after loading.
    #[must_use]
    pub fn with_gate(mut self, gate: ItemGate) -> Self {
        self.gate = gate;
        self
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the item registry.
    #[must_use]
    pub fn registry(&self) -> &CustomItemRegistry {
        &self.registry
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &ItemLoaderStats {
        &self.stats
    }

    /// Loads every `*.toml` file in the base path, in file name order.
    pub fn load_all(&mut self) -> ItemLoadResult<()> {
        if !self.base_path.exists() {
            info!(
                "Item directory does not exist, creating: {:?}",
                self.base_path
            );
            fs::create_dir_all(&self.base_path)?;
            return Ok(());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_path)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            if let Err(e) = self.load_file(&path) {
                warn!("Failed to load item file {:?}: {}", path, e);
                self.stats.validation_errors += 1;
            }
        }

        let enabled = self.registry.apply_gate(&self.gate);
        info!(
            "Loaded {} items ({} enabled, {} with recipes) from {} files",
            self.stats.items_loaded, enabled, self.stats.recipes_loaded, self.stats.files_loaded
        );

        Ok(())
    }

    /// Loads items from a single file.
    pub fn load_file(&mut self, path: &Path) -> ItemLoadResult<()> {
        debug!("Loading item file: {:?}", path);

        // Tracked before parsing so a broken file only reloads once it changes
        if let Ok(modified) = fs::metadata(path).and_then(|metadata| metadata.modified()) {
            self.mod_times.insert(path.to_path_buf(), modified);
        }

        let content = fs::read_to_string(path)?;
        let item_file: ItemFile = toml::from_str(&content)?;

        let mut loaded_count = 0;
        for definition in item_file.items {
            let item = match definition.to_custom_item() {
                Ok(item) => item,
                Err(e) => {
                    warn!("Invalid item in {:?}: {}", path, e);
                    self.stats.validation_errors += 1;
                    continue;
                },
            };

            let has_recipe = item.recipe().is_some();
            match self.registry.register(item) {
                Ok(()) => {
                    loaded_count += 1;
                    if has_recipe {
                        self.stats.recipes_loaded += 1;
                    }
                },
                Err(e) => {
                    warn!("Failed to register item from {:?}: {}", path, e);
                    self.stats.validation_errors += 1;
                },
            }
        }

        self.stats.files_loaded += 1;
        self.stats.items_loaded += loaded_count;
        debug!("Loaded {} items from {:?}", loaded_count, path);

        Ok(())
    }

    /// Checks for modified or new files and reloads everything if any changed.
    ///
    /// Returns true if the registry was rebuilt.
    pub fn check_hot_reload(&mut self) -> bool {
        if !self.hot_reload_enabled || !self.has_changes() {
            return false;
        }

        info!("Hot-reloading item files from {:?}", self.base_path);
        let hot_reloads = self.stats.hot_reloads;
        self.registry = CustomItemRegistry::new();
        self.mod_times.clear();
        self.stats = ItemLoaderStats {
            hot_reloads,
            ..ItemLoaderStats::default()
        };

        match self.load_all() {
            Ok(()) => {
                self.stats.hot_reloads += 1;
                true
            },
            Err(e) => {
                warn!("Hot-reload failed: {}", e);
                false
            },
        }
    }

    fn has_changes(&self) -> bool {
        if self.mod_times.keys().any(|path| !path.exists()) {
            return true;
        }

        let Ok(entries) = fs::read_dir(&self.base_path) else {
            return false;
        };

        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .any(|path| {
                let modified = fs::metadata(&path).and_then(|metadata| metadata.modified()).ok();
                match (self.mod_times.get(&path), modified) {
                    (Some(previous), Some(modified)) => modified > *previous,
                    (None, _) => true,
                    (Some(_), None) => false,
                }
            })
    }
}
