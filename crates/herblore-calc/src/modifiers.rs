//! Optional yield, experience and speed modifiers, plus the per-call plan
//! options that carry them.

use herblore_common::{ItemId, PageId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::inventory::OwnedInventory;

/// Highest underworld grimoire tier.
pub const MAX_GRIMOIRE_TIER: u8 = 4;

/// Pieces in the botanist's outfit.
pub const BOTANISTS_OUTFIT_PIECES: u8 = 5;

/// Maximum stacks of torstol incense.
pub const MAX_TORSTOL_INCENSE: u8 = 4;

/// Equipment, location and boost effects active while producing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Portable well
    pub well: bool,
    /// Brooch of the gods (only effective together with the well)
    pub brooch_of_the_gods: bool,
    /// Desert amulet 4 (super antifire extra doses)
    pub desert_amulet: bool,
    /// Botanist's necklace
    pub botanists_necklace: bool,
    /// Modified botanist's mask
    pub modified_botanist_mask: bool,
    /// Envenomed (poison extra doses)
    pub envenomed: bool,
    /// Factory outfit (3 equipment slots)
    pub factory_outfit: bool,
    /// Morytania legs 4 (prayer renewal extra doses)
    pub morytania_legs: bool,
    /// Scroll of cleansing
    pub scroll_of_cleansing: bool,
    /// Underworld grimoire tier, 0 to 4
    pub underworld_grimoire: u8,
    /// Botanist's outfit pieces worn, 0 to 5
    pub botanists_outfit: u8,
    /// Meilyr hour
    pub meilyr_hour: bool,
    /// Torstol incense stacks, 0 to 4
    pub torstol_incense: u8,
    /// Perfect juju herblore potion
    pub perfect_juju_herblore_potion: bool,
    /// Flat experience bonus in percent
    pub arbitrary_xp: f64,
}

impl Modifiers {
    /// Whether the well and brooch of the gods are both active.
    #[must_use]
    pub const fn brooch_effect(&self) -> bool {
        self.well && self.brooch_of_the_gods
    }

    /// Clamps ranged values and applies the dependencies between options:
    /// the brooch needs the well, and the modified mask counts as one outfit
    /// piece.
    pub fn normalize(&mut self) {
        self.underworld_grimoire = self.underworld_grimoire.min(MAX_GRIMOIRE_TIER);
        self.botanists_outfit = self.botanists_outfit.min(BOTANISTS_OUTFIT_PIECES);
        self.torstol_incense = self.torstol_incense.min(MAX_TORSTOL_INCENSE);
        if !self.arbitrary_xp.is_finite() || self.arbitrary_xp < 0.0 {
            self.arbitrary_xp = 0.0;
        }

        if !self.well {
            self.brooch_of_the_gods = false;
        }
        if self.modified_botanist_mask {
            self.botanists_outfit = self.botanists_outfit.max(1);
        }
    }

    /// Returns a normalised copy.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }
}

/// Selected recipe name per ambiguous page.
pub type RecipePaths = BTreeMap<PageId, String>;

/// Everything a single plan calculation needs besides the catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanOptions {
    /// Active modifiers
    pub modifiers: Modifiers,
    /// Recipe selections for pages with several recipes
    pub recipe_paths: RecipePaths,
    /// Stock already owned
    pub owned_inventory: OwnedInventory,
}

impl PlanOptions {
    /// Creates options with the given modifiers and nothing else.
    #[must_use]
    pub fn new(modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            ..Self::default()
        }
    }

    /// Selects the recipe to use for a page.
    #[must_use]
    pub fn with_recipe_path(mut self, page: PageId, recipe: impl Into<String>) -> Self {
        self.recipe_paths.insert(page, recipe.into());
        self
    }

    /// Records owned stock of an item.
    #[must_use]
    pub fn with_owned(mut self, item: ItemId, quantity: u64) -> Self {
        *self.owned_inventory.entry(item).or_default() += quantity;
        self
    }
}
