//! Custom item registry.
//!
//! Items are keyed by their identity key and remembered in registration
//! order, which is the order [`CustomItemRegistry::matching_items`] reports.

use ahash::AHashMap;
use craftkit_common::ItemKey;
use craftkit_kernel::{validate, CraftingGrid, ItemStack};
use thiserror::Error;
use tracing::debug;

use crate::custom_item::CustomItem;

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// An item with the same key is already registered
    #[error("Item already registered: {0}")]
    DuplicateKey(ItemKey),

    /// No item with this key is registered
    #[error("Unknown item: {0}")]
    UnknownItem(ItemKey),
}

/// Enable gating rules applied to the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemGate {
    /// Only items named in `enabled_items` are enabled.
    pub only_listed: bool,
    /// Full keys (`gems:ruby`) or bare paths (`ruby`).
    pub enabled_items: Vec<String>,
}

impl ItemGate {
    /// Gate that enables every item.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Gate that enables only the listed items.
    #[must_use]
    pub fn only<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            only_listed: true,
            enabled_items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether an item passes the gate.
    #[must_use]
    pub fn allows(&self, key: &ItemKey) -> bool {
        !self.only_listed
            || self
                .enabled_items
                .iter()
                .any(|entry| entry == key.as_str() || entry == key.path())
    }
}

/// Registry of custom items.
#[derive(Debug, Default)]
pub struct CustomItemRegistry {
    items: AHashMap<ItemKey, CustomItem>,
    order: Vec<ItemKey>,
}

impl CustomItemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item.
    pub fn register(&mut self, item: CustomItem) -> Result<(), RegistryError> {
        let key = item.key().clone();
        if self.items.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }

        debug!(item = %key, recipe = item.recipe().is_some(), "Registered custom item");
        self.order.push(key.clone());
        self.items.insert(key, item);
        Ok(())
    }

    /// Remove an item, returning it if it was registered.
    pub fn unregister(&mut self, key: &ItemKey) -> Option<CustomItem> {
        let item = self.items.remove(key)?;
        self.order.retain(|k| k != key);
        debug!(item = %key, "Unregistered custom item");
        Some(item)
    }

    /// Look up an item by key.
    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<&CustomItem> {
        self.items.get(key)
    }

    /// Look up the custom item a stack is an instance of.
    #[must_use]
    pub fn get_for_stack(&self, stack: &ItemStack) -> Option<&CustomItem> {
        self.items.get(stack.key())
    }

    /// Check whether a slot holds a registered custom item.
    #[must_use]
    pub fn is_custom_stack(&self, stack: Option<&ItemStack>) -> bool {
        stack.is_some_and(|stack| self.items.contains_key(stack.key()))
    }

    /// Check whether any grid slot holds a registered custom item.
    #[must_use]
    pub fn contains_custom(&self, grid: &CraftingGrid) -> bool {
        grid.occupied()
            .any(|(_, stack)| self.items.contains_key(stack.key()))
    }

    /// Enable or disable a single item.
    pub fn set_enabled(&mut self, key: &ItemKey, enabled: bool) -> Result<(), RegistryError> {
        let item = self
            .items
            .get_mut(key)
            .ok_or_else(|| RegistryError::UnknownItem(key.clone()))?;
        item.set_enabled(enabled);
        Ok(())
    }

    /// Apply enable gating to every item. Returns the number left enabled.
    pub fn apply_gate(&mut self, gate: &ItemGate) -> usize {
        let mut enabled = 0;
        for item in self.items.values_mut() {
            let allowed = gate.allows(item.key());
            item.set_enabled(allowed);
            if allowed {
                enabled += 1;
            }
        }
        debug!(
            enabled,
            total = self.items.len(),
            only_listed = gate.only_listed,
            "Applied item gate"
        );
        enabled
    }

    /// Enabled items whose recipe validates the grid, in registration order.
    #[must_use]
    pub fn matching_items(&self, grid: &CraftingGrid) -> Vec<&CustomItem> {
        self.iter()
            .filter(|item| item.is_enabled())
            .filter(|item| item.recipe().is_some_and(|recipe| validate(recipe, grid)))
            .collect()
    }

    /// Iterate items in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CustomItem> + '_ {
        self.order.iter().filter_map(|key| self.items.get(key))
    }

    /// Number of registered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
