//! Catalog asset loading.
//!
//! This module provides:
//! - The JSON layout of the catalog asset (items, pages, recipes)
//! - Per-recipe validation on load, skipping bad recipes with a warning
//! - Conversion into the validated [`Catalog`]
//! - Load statistics

use std::fs;
use std::path::{Path, PathBuf};

use herblore_calc::catalog::{Catalog, Input, Item, Page, Recipe, TickCost};
use herblore_common::{CatalogError, ItemId, PageId, SchemaVersion};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default catalog asset path.
pub const DEFAULT_CATALOG_PATH: &str = "assets/herblore_catalog.json";

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// File not found.
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse JSON.
    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The version string is malformed.
    #[error("Invalid catalog version: {0}")]
    InvalidVersion(String),

    /// The file was written for an incompatible schema.
    #[error("Catalog version {found} cannot be read (expected {expected})")]
    UnsupportedVersion {
        /// Version in the file
        found: SchemaVersion,
        /// Version this build reads
        expected: SchemaVersion,
    },

    /// The item/page graph is inconsistent.
    #[error("Catalog validation error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type for catalog loading.
pub type CatalogLoadResult<T> = Result<T, CatalogLoadError>;

/// An input as stored in the asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDefinition {
    /// Item consumed
    pub item_id: u32,
    /// Quantity per operation
    pub quantity: u32,
    /// Whether this is a secondary ingredient
    #[serde(default)]
    pub is_secondary: bool,
    /// Whether the scroll of cleansing can save it
    #[serde(default)]
    pub is_savable: Option<bool>,
}

/// A recipe as stored in the asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDefinition {
    /// Recipe name, unique within its page
    pub name: String,
    /// Item produced
    pub output_id: u32,
    /// Output quantity per operation
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Experience per operation
    #[serde(default)]
    pub exp: f64,
    /// Minimum Herblore level
    #[serde(default)]
    pub herb_level: u32,
    /// `[first, repeat]` tick costs
    #[serde(default)]
    pub ticks: Vec<u32>,
    /// Inputs consumed per operation
    #[serde(default)]
    pub inputs: Vec<InputDefinition>,
}

const fn default_quantity() -> u32 {
    1
}

impl RecipeDefinition {
    /// Checks the fields that can be judged without the rest of the catalog.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("recipe producing item {} has empty name", self.output_id));
        }
        if self.quantity == 0 {
            return Err(format!("recipe {:?} has zero output quantity", self.name));
        }
        if !self.exp.is_finite() || self.exp < 0.0 {
            return Err(format!("recipe {:?} has invalid exp: {}", self.name, self.exp));
        }
        if self.ticks.len() > 2 {
            return Err(format!(
                "recipe {:?} has {} tick entries, expected at most 2",
                self.name,
                self.ticks.len()
            ));
        }
        for (i, input) in self.inputs.iter().enumerate() {
            if input.quantity == 0 {
                return Err(format!(
                    "recipe {:?} input {} has zero quantity",
                    self.name, i
                ));
            }
        }

        Ok(())
    }

    /// Converts to a catalog recipe.
    #[must_use]
    pub fn to_recipe(&self) -> Recipe {
        let ticks = TickCost::from_slice(&self.ticks);
        let mut builder = Recipe::builder(&self.name, ItemId::new(self.output_id), self.quantity)
            .exp(self.exp)
            .ticks(ticks.first, ticks.repeat)
            .skill_level(self.herb_level);

        for input in &self.inputs {
            builder = builder.raw_input(Input::new(
                ItemId::new(input.item_id),
                input.quantity,
                input.is_secondary,
                input.is_savable.unwrap_or(true),
            ));
        }

        builder.build()
    }
}

/// A page as stored in the asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDefinition {
    /// Page identifier
    pub id: u32,
    /// Display name
    pub name: String,
    /// Category tags
    #[serde(default)]
    pub categories: Vec<String>,
    /// Recipes producing this page's items
    #[serde(default)]
    pub recipes: Vec<RecipeDefinition>,
}

/// An item as stored in the asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    /// Item identifier
    pub id: u32,
    /// Display name
    pub name: String,
    /// Owning page
    pub page_id: u32,
    /// Whether the item stacks in one slot
    #[serde(default)]
    pub stackable: bool,
    /// Doses, for potion variants
    #[serde(default)]
    pub doses: Option<u32>,
    /// Other variants of the same potion
    #[serde(default)]
    pub related_ids: Vec<u32>,
    /// Whether this variant is a flask
    #[serde(default)]
    pub flask: bool,
}

impl ItemDefinition {
    /// Converts to a catalog item.
    #[must_use]
    pub fn to_item(&self) -> Item {
        let mut item = Item::new(ItemId::new(self.id), &self.name, PageId::new(self.page_id))
            .with_related(self.related_ids.iter().copied().map(ItemId::new).collect());
        if let Some(doses) = self.doses {
            item = item.with_doses(doses);
        }
        if self.stackable {
            item = item.stackable();
        }
        if self.flask {
            item = item.flask();
        }
        item
    }
}

/// The whole catalog asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: String,
    /// All items
    #[serde(default)]
    pub items: Vec<ItemDefinition>,
    /// All pages
    #[serde(default)]
    pub pages: Vec<PageDefinition>,
}

fn default_version() -> String {
    SchemaVersion::CATALOG.to_string()
}

impl CatalogFile {
    /// Parses the asset from a JSON string.
    pub fn from_json(content: &str) -> CatalogLoadResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parses and checks the schema version.
    pub fn schema_version(&self) -> CatalogLoadResult<SchemaVersion> {
        let found: SchemaVersion = self
            .version
            .parse()
            .map_err(CatalogLoadError::InvalidVersion)?;
        if !SchemaVersion::CATALOG.can_read(&found) {
            return Err(CatalogLoadError::UnsupportedVersion {
                found,
                expected: SchemaVersion::CATALOG,
            });
        }
        Ok(found)
    }
}

/// Statistics for the catalog loader.
#[derive(Debug, Default, Clone)]
pub struct CatalogLoaderStats {
    /// Number of items loaded.
    pub items_loaded: u32,
    /// Number of pages loaded.
    pub pages_loaded: u32,
    /// Number of recipes loaded.
    pub recipes_loaded: u32,
    /// Number of recipes and items skipped as invalid.
    pub validation_errors: u32,
}

/// Loads the catalog asset from disk.
#[derive(Debug)]
pub struct CatalogLoader {
    path: PathBuf,
    stats: CatalogLoaderStats,
}

impl CatalogLoader {
    /// Creates a loader for the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Initializing catalog loader at: {:?}", path);

        Self {
            path,
            stats: CatalogLoaderStats::default(),
        }
    }

    /// Creates a loader with the default path.
    #[must_use]
    pub fn with_default_path() -> Self {
        Self::new(DEFAULT_CATALOG_PATH)
    }

    /// Returns the asset path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns statistics of the last load.
    #[must_use]
    pub fn stats(&self) -> &CatalogLoaderStats {
        &self.stats
    }

    /// Reads, validates and builds the catalog.
    pub fn load(&mut self) -> CatalogLoadResult<Catalog> {
        if !self.path.exists() {
            return Err(CatalogLoadError::NotFound(self.path.clone()));
        }

        debug!("Loading catalog file: {:?}", self.path);
        let content = fs::read_to_string(&self.path)?;
        let catalog = self.load_str(&content)?;

        info!(
            "Loaded {} items, {} pages and {} recipes from {:?}",
            self.stats.items_loaded, self.stats.pages_loaded, self.stats.recipes_loaded, self.path
        );

        Ok(catalog)
    }

    /// Builds the catalog from JSON content.
    pub fn load_str(&mut self, content: &str) -> CatalogLoadResult<Catalog> {
        self.stats = CatalogLoaderStats::default();

        let file = CatalogFile::from_json(content)?;
        let version = file.schema_version()?;
        let mut builder = Catalog::builder().version(version);

        for definition in &file.pages {
            let mut page = Page::new(PageId::new(definition.id), &definition.name);
            for category in &definition.categories {
                page = page.with_category(category.clone());
            }

            for recipe in &definition.recipes {
                if let Err(e) = recipe.validate() {
                    warn!("Skipping invalid recipe on page {}: {}", definition.id, e);
                    self.stats.validation_errors += 1;
                    continue;
                }
                page = page.with_recipe(recipe.to_recipe());
                self.stats.recipes_loaded += 1;
            }

            builder = builder.page(page);
            self.stats.pages_loaded += 1;
        }

        for definition in &file.items {
            if definition.doses == Some(0) {
                warn!("Skipping item {} ({}): zero doses", definition.id, definition.name);
                self.stats.validation_errors += 1;
                continue;
            }
            builder = builder.item(definition.to_item());
            self.stats.items_loaded += 1;
        }

        Ok(builder.build()?)
    }
}
