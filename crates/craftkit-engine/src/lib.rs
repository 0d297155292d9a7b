//! # craftkit engine
//!
//! Wires the kernel and gameplay crates to the outside world:
//! - `craftkit.toml` configuration
//! - Item definition files with hot reload
//! - Tracing setup
//!
//! ```no_run
//! use craftkit_engine::{Extension, ExtensionConfig};
//!
//! let extension = Extension::bootstrap(ExtensionConfig::load())?;
//! let handler = extension.handler();
//! # let _ = handler;
//! # Ok::<(), anyhow::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod item_loader;
pub mod logging;

use anyhow::Context;
use craftkit_gameplay::{CraftingHandler, CustomItemRegistry};
use tracing::info;

pub use config::{ExtensionConfig, ItemsConfig, LoggingConfig, CONFIG_FILE};
pub use item_loader::{ItemLoadError, ItemLoader, ItemLoaderStats};
pub use logging::init_tracing;

/// A loaded extension: configuration plus the custom items it defines.
pub struct Extension {
    config: ExtensionConfig,
    loader: ItemLoader,
}

impl Extension {
    /// Load item definitions from the configured directory and apply gating.
    pub fn bootstrap(config: ExtensionConfig) -> anyhow::Result<Self> {
        let mut loader = ItemLoader::new(&config.items.directory)
            .with_hot_reload(config.items.hot_reload)
            .with_gate(config.items.gate());

        loader.load_all().with_context(|| {
            format!(
                "failed to load items from {}",
                config.items.directory.display()
            )
        })?;

        info!(
            items = loader.registry().len(),
            only_listed = config.items.only_listed,
            "Extension ready"
        );

        Ok(Self { config, loader })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Registered custom items.
    #[must_use]
    pub fn registry(&self) -> &CustomItemRegistry {
        self.loader.registry()
    }

    /// Loader statistics.
    #[must_use]
    pub fn stats(&self) -> &ItemLoaderStats {
        self.loader.stats()
    }

    /// Crafting event handler over the current registry.
    #[must_use]
    pub fn handler(&self) -> CraftingHandler<'_> {
        CraftingHandler::new(self.loader.registry())
    }

    /// Reload item files if any changed. Returns true if the registry was rebuilt.
    pub fn reload_if_changed(&mut self) -> bool {
        self.loader.check_hot_reload()
    }
}
