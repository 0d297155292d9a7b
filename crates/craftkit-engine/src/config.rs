//! Extension configuration.
//!
//! Item gating, the item definition directory and logging defaults, loaded
//! from and saved to a TOML file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use craftkit_common::{CraftkitError, CraftkitResult};
use craftkit_gameplay::ItemGate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "craftkit.toml";

/// Extension configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Item gating and definitions
    pub items: ItemsConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// Item settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemsConfig {
    /// Only items named in `enabled_items` can be crafted
    pub only_listed: bool,
    /// Item keys or bare paths enabled when `only_listed` is set
    pub enabled_items: Vec<String>,
    /// Directory of item definition files
    pub directory: PathBuf,
    /// Reload item files when they change on disk
    pub hot_reload: bool,
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            only_listed: false,
            enabled_items: Vec::new(),
            directory: PathBuf::from(crate::item_loader::DEFAULT_ITEM_PATH),
            hot_reload: cfg!(debug_assertions),
        }
    }
}

impl ItemsConfig {
    /// Gating rules for the registry.
    #[must_use]
    pub fn gate(&self) -> ItemGate {
        ItemGate {
            only_listed: self.only_listed,
            enabled_items: self.enabled_items.clone(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directive added to `RUST_LOG`
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "craftkit=info".to_string(),
            json: false,
        }
    }
}

impl ExtensionConfig {
    /// Load configuration from `craftkit.toml` in the working directory.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load configuration, treating only a missing file as "use defaults".
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> CraftkitResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::try_load_from(path)
    }

    /// Load configuration from a specific path, reporting any failure.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> CraftkitResult<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| CraftkitError::Config(e.to_string()))
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ExtensionConfig::default();
        assert!(!config.items.only_listed);
        assert!(config.items.enabled_items.is_empty());
        assert_eq!(config.items.directory, PathBuf::from("items"));
        assert_eq!(config.logging.filter, "craftkit=info");
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE);

        let mut config = ExtensionConfig::default();
        config.items.only_listed = true;
        config.items.enabled_items = vec!["ruby".to_string()];
        config.logging.json = true;

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = ExtensionConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = ExtensionConfig::load_from("/nonexistent/path/craftkit.toml");
        assert_eq!(config, ExtensionConfig::default());
    }

    #[test]
    fn test_config_partial_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "[items]\nonly_listed = true\n").expect("write");

        let config = ExtensionConfig::load_from(&config_path);
        assert!(config.items.only_listed);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_config_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "items = 3").expect("write");

        assert!(matches!(
            ExtensionConfig::try_load_from(&config_path),
            Err(CraftkitError::Config(_))
        ));
        assert_eq!(ExtensionConfig::load_from(&config_path), ExtensionConfig::default());
    }

    #[test]
    fn test_load_or_default_reports_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join(CONFIG_FILE);

        let config = ExtensionConfig::load_or_default(&config_path).expect("missing file is fine");
        assert_eq!(config, ExtensionConfig::default());

        fs::write(&config_path, "[items\nonly_listed = true\n").expect("write");
        assert!(matches!(
            ExtensionConfig::load_or_default(&config_path),
            Err(CraftkitError::Config(_))
        ));

        fs::write(&config_path, "[items]\nonly_listed = true\n").expect("write");
        let config = ExtensionConfig::load_or_default(&config_path).expect("valid file");
        assert!(config.items.only_listed);
    }

    #[test]
    fn test_gate_from_config() {
        let mut items = ItemsConfig::default();
        items.only_listed = true;
        items.enabled_items = vec!["gems:ruby".to_string()];

        let gate = items.gate();
        assert!(gate.only_listed);
        assert_eq!(gate.enabled_items, ["gems:ruby"]);
    }
}
