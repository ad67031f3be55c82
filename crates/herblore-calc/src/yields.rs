//! Expected output, experience and tick cost of a single recipe.
//!
//! All values are expected values over the stated probabilities; nothing here
//! samples randomness.

use herblore_common::PlannerResult;

use crate::catalog::{Catalog, Item, Page, Recipe};
use crate::modifiers::{Modifiers, BOTANISTS_OUTFIT_PIECES};

/// Inventory slots available for ingredients.
pub const INVENTORY_SIZE: u32 = 28;

/// Equipment slots shared by Morytania legs, factory outfit and botanist's
/// outfit pieces.
pub const ARMOUR_SLOTS: i32 = 5;

/// Equipment slots taken by the factory outfit.
pub const FACTORY_OUTFIT_SLOTS: i32 = 3;

/// Chance for the scroll of cleansing to save secondaries, split evenly
/// across a recipe's secondaries.
pub const SCROLL_OF_CLEANSING_SAVE_CHANCE: f64 = 0.1;

/// Chance for the scroll of cleansing to shave a tick off a repeat operation.
pub const SCROLL_OF_CLEANSING_SPEED_UP_CHANCE: f64 = 0.1;

/// Ticks saved when the scroll of cleansing speed-up procs.
pub const SCROLL_OF_CLEANSING_TICK_REDUCTION: f64 = 1.0;

const DESERT_AMULET_BONUS: f64 = 20.0;
const BOTANISTS_NECKLACE_BONUS: f64 = 5.0;
const ENVENOMED_BONUS: f64 = 10.0;
const MORYTANIA_LEGS_BONUS: f64 = 20.0;
const FACTORY_OUTFIT_BONUS: f64 = 12.5;
const GRIMOIRE_BONUS: f64 = 10.0;

/// Flat extra output from the modified botanist's mask, the well and the
/// brooch of the gods.
const FLAT_OUTPUT_BONUS: f64 = 0.05;

/// Adds a percentage bonus to a running probability with diminishing
/// returns.
#[must_use]
pub fn stack_chance(current: f64, bonus_percent: f64) -> f64 {
    current + (1.0 - current) * (bonus_percent / 100.0)
}

/// Yield calculator bound to one recipe of a catalog.
#[derive(Debug, Clone, Copy)]
pub struct YieldCalculator<'a> {
    catalog: &'a Catalog,
    recipe: &'a Recipe,
    output: &'a Item,
    output_page: &'a Page,
}

impl<'a> YieldCalculator<'a> {
    /// Resolves the recipe's output item and page.
    pub fn new(catalog: &'a Catalog, recipe: &'a Recipe) -> PlannerResult<Self> {
        let output = catalog.require_item(recipe.output.item)?;
        let output_page = catalog.require_page(output.page)?;

        Ok(Self {
            catalog,
            recipe,
            output,
            output_page,
        })
    }

    /// The recipe being evaluated.
    #[must_use]
    pub const fn recipe(&self) -> &'a Recipe {
        self.recipe
    }

    /// The item the recipe produces.
    #[must_use]
    pub const fn output_item(&self) -> &'a Item {
        self.output
    }

    /// Only single 3-dose outputs can be upgraded to 4 doses.
    #[must_use]
    pub fn can_produce_extra_dose(&self) -> bool {
        self.output.doses == Some(3) && self.recipe.output.quantity == 1
    }

    /// Probability of an extra dose per operation, in `[0, 1)`.
    #[must_use]
    pub fn extra_dose_chance(&self, modifiers: &Modifiers) -> f64 {
        if !self.can_produce_extra_dose() {
            return 0.0;
        }

        let item_name = self.output.name.to_lowercase();
        let page_name = self.output_page.name.to_lowercase();
        let mut chance = 0.0;

        if modifiers.desert_amulet && item_name.contains("super antifire") {
            chance = stack_chance(chance, DESERT_AMULET_BONUS);
        } else if modifiers.botanists_necklace {
            chance = stack_chance(chance, BOTANISTS_NECKLACE_BONUS);
        }

        if modifiers.envenomed && item_name.contains("poison") {
            chance = stack_chance(chance, ENVENOMED_BONUS);
        }

        if modifiers.morytania_legs && item_name.contains("prayer renewal") {
            chance = stack_chance(chance, MORYTANIA_LEGS_BONUS);
        }

        if modifiers.factory_outfit {
            chance = stack_chance(chance, FACTORY_OUTFIT_BONUS);
        }

        // Tier 4 always applies; lower tiers are lost to the brooch of the gods.
        let tier = modifiers.underworld_grimoire;
        let brooch = modifiers.brooch_effect();
        let grimoire = |min_tier: u8| tier >= 4 || (!brooch && tier >= min_tier);

        if page_name == "necromancy potion" && grimoire(1) {
            chance = stack_chance(chance, GRIMOIRE_BONUS);
        }
        if page_name.contains("super necromancy") && grimoire(2) {
            chance = stack_chance(chance, GRIMOIRE_BONUS);
        }
        if page_name.contains("extreme necromancy") && grimoire(3) {
            chance = stack_chance(chance, GRIMOIRE_BONUS);
        }

        chance
    }

    /// Expected output quantity per operation.
    #[must_use]
    pub fn calculate_quantity(&self, modifiers: &Modifiers) -> f64 {
        let mut quantity = f64::from(self.recipe.output.quantity);

        if self.can_produce_extra_dose() {
            let doses = f64::from(self.output.dose_count());
            quantity += 1.0 / doses * self.extra_dose_chance(modifiers);
        }

        if modifiers.modified_botanist_mask {
            quantity += FLAT_OUTPUT_BONUS;
        }
        if !self.output_page.is_combination_potion() {
            if modifiers.well {
                quantity += FLAT_OUTPUT_BONUS;
            }
            if modifiers.brooch_effect() {
                quantity += FLAT_OUTPUT_BONUS;
            }
        }

        quantity
    }

    /// Botanist's outfit pieces still worn once yield equipment has taken its
    /// slots. May be negative when the outfit is fully displaced.
    #[must_use]
    pub fn effective_botanists_outfit(&self, modifiers: &Modifiers) -> i32 {
        let mut outfit = i32::from(modifiers.botanists_outfit);
        let mut slots_used = outfit;

        if modifiers.morytania_legs && self.output.name.to_lowercase().contains("prayer renewal") {
            slots_used += 1;
        }
        if modifiers.factory_outfit && self.can_produce_extra_dose() {
            slots_used += FACTORY_OUTFIT_SLOTS;
        }

        if slots_used > ARMOUR_SLOTS {
            outfit -= slots_used - ARMOUR_SLOTS;
        }

        outfit
    }

    /// Experience per operation.
    #[must_use]
    pub fn calculate_exp(&self, modifiers: &Modifiers) -> f64 {
        let base = self.recipe.exp;
        let outfit = self.effective_botanists_outfit(modifiers);
        let incense = f64::from(modifiers.torstol_incense);

        let mut exp = base;
        if modifiers.arbitrary_xp != 0.0 {
            exp += base * (modifiers.arbitrary_xp / 100.0);
        }
        if modifiers.well {
            exp += base * 0.1;
        }
        if outfit > 0 {
            let bonus = if outfit == i32::from(BOTANISTS_OUTFIT_PIECES) {
                0.06
            } else {
                f64::from(outfit) / 100.0
            };
            exp += base * bonus;
        }

        if self.output_page.is_combination_potion() {
            if modifiers.perfect_juju_herblore_potion {
                exp += base * 0.05;
            }
            match (modifiers.meilyr_hour, modifiers.torstol_incense > 0) {
                (true, true) => exp += base * 0.2 * (1.0 + incense * 0.005),
                (true, false) => exp += base * 0.2,
                (false, true) => exp += base * incense * 0.005,
                (false, false) => {},
            }
        }

        exp
    }

    /// Operations that fit in one inventory load.
    #[must_use]
    pub fn operations_per_inventory(&self) -> u32 {
        match self.recipe.slots_used(self.catalog) {
            0 => INVENTORY_SIZE,
            slots => (INVENTORY_SIZE / slots).max(1),
        }
    }

    /// Inventory loads needed for `operations`.
    #[must_use]
    pub fn inventories_for_operations(&self, operations: u64) -> u64 {
        operations.div_ceil(u64::from(self.operations_per_inventory()))
    }

    /// Total ticks for `operations`. The first operation of every inventory
    /// load costs the first-operation rate, the rest the repeat rate.
    #[must_use]
    pub fn calculate_ticks_for_operations(&self, operations: u64, modifiers: &Modifiers) -> f64 {
        let first_ops = self.inventories_for_operations(operations);
        let repeat_ops = operations - first_ops;

        let first_ticks = f64::from(self.recipe.ticks.first);
        let mut repeat_ticks = f64::from(self.recipe.ticks.repeat_or_first());
        if modifiers.scroll_of_cleansing {
            let average_saving =
                SCROLL_OF_CLEANSING_SPEED_UP_CHANCE * SCROLL_OF_CLEANSING_TICK_REDUCTION;
            repeat_ticks = (repeat_ticks - average_saving).max(0.0);
        }

        first_ops as f64 * first_ticks + repeat_ops as f64 * repeat_ticks
    }
}
