//! craftkit - validate item definitions and report what would load.
//!
//! Usage: `craftkit [config.toml]`

use anyhow::{Context, Result};
use craftkit_engine::{init_tracing, Extension, ExtensionConfig, CONFIG_FILE};
use tracing::{info, warn};

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| CONFIG_FILE.to_string());
    // A broken config must stop the run; no subscriber exists yet to log it
    let config = ExtensionConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load config {config_path}"))?;
    init_tracing(&config.logging)?;

    info!("craftkit starting with {}", config_path);
    let extension = Extension::bootstrap(config)?;

    for item in extension.registry().iter() {
        let recipe = match item.recipe().map(|recipe| recipe.spec()) {
            Some(craftkit_kernel::RecipeSpec::Shaped(pattern)) => {
                format!("shaped {}x{}", pattern.rows(), pattern.columns())
            },
            Some(craftkit_kernel::RecipeSpec::Shapeless(set)) => {
                format!("shapeless, {} ingredients", set.len())
            },
            None => "no recipe".to_string(),
        };
        info!(
            item = %item.key(),
            enabled = item.is_enabled(),
            rarity = item.rarity().label(),
            "{} ({recipe})",
            item.display_name()
        );
    }

    let stats = extension.stats();
    if stats.validation_errors > 0 {
        warn!("{} item definitions were skipped", stats.validation_errors);
    }
    info!(
        "{} items from {} files",
        stats.items_loaded, stats.files_loaded
    );

    Ok(())
}
