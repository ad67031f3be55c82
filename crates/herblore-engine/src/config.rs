//! Planner configuration.
//!
//! Provides the catalog location, log filter, active modifiers, recipe
//! selections and owned stock. Configuration can be loaded from and saved to
//! a TOML file. Pages and items are referred to by name so the file stays
//! readable; names are resolved against the catalog when planning.

use herblore_calc::catalog::Catalog;
use herblore_calc::modifiers::{Modifiers, PlanOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::catalog_loader::DEFAULT_CATALOG_PATH;

/// Configuration file name.
const CONFIG_FILE: &str = "herblore.toml";

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "herblore=info";

/// Planner configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Path of the catalog JSON asset
    pub catalog_path: PathBuf,
    /// Tracing filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Active modifiers
    pub modifiers: Modifiers,
    /// Selected recipe name per page name
    pub recipe_paths: BTreeMap<String, String>,
    /// Owned quantity per item name
    pub inventory: BTreeMap<String, u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            modifiers: Modifiers::default(),
            recipe_paths: BTreeMap::new(),
            inventory: BTreeMap::new(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let mut contents = String::new();
        if let Err(e) = fs::File::open(path).and_then(|mut file| file.read_to_string(&mut contents)) {
            warn!("Failed to read config file: {e}");
            return Self::default();
        }

        match toml::from_str::<Self>(&contents) {
            Ok(mut config) => {
                config.validate();
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to parse config file: {e}");
                Self::default()
            },
        }
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

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from(CONFIG_FILE),
            |dir| dir.join("herblore").join(CONFIG_FILE),
        )
    }

    /// Clamp modifier ranges and drop blank entries.
    pub fn validate(&mut self) {
        self.modifiers.normalize();

        if self.log_filter.trim().is_empty() {
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }

        self.recipe_paths
            .retain(|page, recipe| !page.trim().is_empty() && !recipe.trim().is_empty());
        self.inventory.retain(|item, quantity| !item.trim().is_empty() && *quantity > 0);
    }

    /// Resolves page and item names against the catalog. Unknown names are
    /// skipped with a warning.
    #[must_use]
    pub fn to_plan_options(&self, catalog: &Catalog) -> PlanOptions {
        let mut options = PlanOptions::new(self.modifiers.normalized());

        for (page_name, recipe) in &self.recipe_paths {
            match catalog.page_by_name(page_name) {
                Some(page) => {
                    if page.recipe(recipe).is_none() {
                        warn!("Page {page_name:?} has no recipe named {recipe:?}");
                    }
                    options.recipe_paths.insert(page.id, recipe.clone());
                },
                None => warn!("Skipping recipe selection for unknown page {page_name:?}"),
            }
        }

        for (item_name, &quantity) in &self.inventory {
            match catalog.item_by_name(item_name) {
                Some(item) => {
                    *options.owned_inventory.entry(item.id).or_default() += quantity;
                },
                None => warn!("Skipping owned stock of unknown item {item_name:?}"),
            }
        }

        options
    }
}
