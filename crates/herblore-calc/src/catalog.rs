//! Immutable item/page/recipe catalog.
//!
//! This module provides:
//! - Item, Page, Recipe, Input and Output definitions
//! - A builder that validates the graph once at startup
//! - Lookup by ID and by (case-insensitive) name
//! - Derived page attributes (member items, representative item)

use herblore_common::{
    CatalogError, CatalogResult, ItemId, PageId, PlannerError, PlannerResult, SchemaVersion,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Category marking a page as a potion.
pub const POTIONS_CATEGORY: &str = "Category:Potions";

/// Category marking a page as a combination potion.
pub const COMBINATION_POTIONS_CATEGORY: &str = "Category:Combination potions";

// ============================================================================
// Items
// ============================================================================

/// A concrete craftable or tradable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item identifier
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Whether the item stacks in one inventory slot
    pub stackable: bool,
    /// Number of doses, for potion variants
    pub doses: Option<u32>,
    /// Owning page
    pub page: PageId,
    /// Whether this variant is a flask
    pub flask: bool,
    /// Related items (other variants, noted forms, ...)
    pub related: Vec<ItemId>,
}

impl Item {
    /// Creates a non-stackable item without doses.
    #[must_use]
    pub fn new(id: ItemId, name: impl Into<String>, page: PageId) -> Self {
        Self {
            id,
            name: name.into(),
            stackable: false,
            doses: None,
            page,
            flask: false,
            related: Vec::new(),
        }
    }

    /// Sets the dose count.
    #[must_use]
    pub const fn with_doses(mut self, doses: u32) -> Self {
        self.doses = Some(doses);
        self
    }

    /// Marks the item as stackable.
    #[must_use]
    pub const fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    /// Marks the item as a flask.
    #[must_use]
    pub const fn flask(mut self) -> Self {
        self.flask = true;
        self
    }

    /// Sets the related item list.
    #[must_use]
    pub fn with_related(mut self, related: Vec<ItemId>) -> Self {
        self.related = related;
        self
    }

    /// Dose-equivalent units contributed by one of this item.
    #[must_use]
    pub fn dose_count(&self) -> u32 {
        self.doses.unwrap_or(1)
    }

    /// Whether this variant is a flask.
    #[must_use]
    pub const fn is_flask(&self) -> bool {
        self.flask
    }
}

// ============================================================================
// Recipes
// ============================================================================

/// An ingredient of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Item consumed
    pub item: ItemId,
    /// Quantity consumed per operation
    pub quantity: u32,
    /// Whether the input is a secondary (any position after the first)
    pub secondary: bool,
    /// Whether ingredient-saving effects apply
    pub savable: bool,
}

impl Input {
    /// Creates a new input.
    #[must_use]
    pub const fn new(item: ItemId, quantity: u32, secondary: bool, savable: bool) -> Self {
        Self {
            item,
            quantity,
            secondary,
            savable,
        }
    }
}

/// The item produced by a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Item produced
    pub item: ItemId,
    /// Nominal quantity per operation before bonuses
    pub quantity: u32,
}

/// Tick cost of an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickCost {
    /// Ticks for the first operation after loading an inventory
    pub first: u32,
    /// Ticks for each following operation in the same inventory
    pub repeat: Option<u32>,
}

impl TickCost {
    /// Creates a tick cost pair.
    #[must_use]
    pub const fn new(first: u32, repeat: Option<u32>) -> Self {
        Self { first, repeat }
    }

    /// Builds a tick cost from the raw `[first, repeat]` list. Missing entries
    /// leave `first` at zero and `repeat` unset.
    #[must_use]
    pub fn from_slice(ticks: &[u32]) -> Self {
        Self {
            first: ticks.first().copied().unwrap_or(0),
            repeat: ticks.get(1).copied(),
        }
    }

    /// Ticks for a repeat operation, falling back to the first-operation cost.
    #[must_use]
    pub fn repeat_or_first(&self) -> u32 {
        self.repeat.unwrap_or(self.first)
    }
}

/// One production method on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name, used to choose between recipes on the same page
    pub name: String,
    /// Experience per operation
    pub exp: f64,
    /// Tick cost pair
    pub ticks: TickCost,
    /// Minimum Herblore level
    pub skill_level: u32,
    /// Ordered ingredient list
    pub inputs: Vec<Input>,
    /// Produced item
    pub output: Output,
}

impl Recipe {
    /// Creates a new recipe builder.
    #[must_use]
    pub fn builder(name: impl Into<String>, output: ItemId, quantity: u32) -> RecipeBuilder {
        RecipeBuilder::new(name, output, quantity)
    }

    /// Inputs eligible for secondary-ingredient effects.
    pub fn secondaries(&self) -> impl Iterator<Item = &Input> + '_ {
        self.inputs.iter().filter(|i| i.secondary)
    }

    /// Inventory slots taken by the inputs of one operation. Stackable inputs
    /// take a single slot regardless of quantity.
    #[must_use]
    pub fn slots_used(&self, catalog: &Catalog) -> u32 {
        self.inputs
            .iter()
            .map(|input| match catalog.item(input.item) {
                Some(item) if item.stackable => 1,
                _ => input.quantity,
            })
            .sum()
    }
}

/// Builder for creating recipes.
#[derive(Debug)]
pub struct RecipeBuilder {
    name: String,
    exp: f64,
    ticks: TickCost,
    skill_level: u32,
    inputs: Vec<Input>,
    output: Output,
}

impl RecipeBuilder {
    fn new(name: impl Into<String>, output: ItemId, quantity: u32) -> Self {
        Self {
            name: name.into(),
            exp: 0.0,
            ticks: TickCost::default(),
            skill_level: 1,
            inputs: Vec::new(),
            output: Output {
                item: output,
                quantity,
            },
        }
    }

    /// Adds an input. Every input after the first is a secondary.
    #[must_use]
    pub fn input(mut self, item: ItemId, quantity: u32) -> Self {
        let secondary = !self.inputs.is_empty();
        self.inputs.push(Input::new(item, quantity, secondary, true));
        self
    }

    /// Adds a secondary input that ingredient-saving effects never apply to.
    #[must_use]
    pub fn unsavable_input(mut self, item: ItemId, quantity: u32) -> Self {
        let secondary = !self.inputs.is_empty();
        self.inputs.push(Input::new(item, quantity, secondary, false));
        self
    }

    /// Adds a fully specified input.
    #[must_use]
    pub fn raw_input(mut self, input: Input) -> Self {
        self.inputs.push(input);
        self
    }

    /// Sets experience per operation.
    #[must_use]
    pub const fn exp(mut self, exp: f64) -> Self {
        self.exp = exp;
        self
    }

    /// Sets the tick cost pair.
    #[must_use]
    pub const fn ticks(mut self, first: u32, repeat: Option<u32>) -> Self {
        self.ticks = TickCost::new(first, repeat);
        self
    }

    /// Sets the minimum Herblore level.
    #[must_use]
    pub const fn skill_level(mut self, level: u32) -> Self {
        self.skill_level = level;
        self
    }

    /// Builds the recipe.
    #[must_use]
    pub fn build(self) -> Recipe {
        Recipe {
            name: self.name,
            exp: self.exp,
            ticks: self.ticks,
            skill_level: self.skill_level,
            inputs: self.inputs,
            output: self.output,
        }
    }
}

// ============================================================================
// Pages
// ============================================================================

/// All dose/quantity variants of one potion type, plus their shared recipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page identifier
    pub id: PageId,
    /// Page name
    pub name: String,
    /// Wiki categories
    pub categories: BTreeSet<String>,
    /// Recipes producing an item of this page
    pub recipes: Vec<Recipe>,
}

impl Page {
    /// Creates a page with no categories or recipes.
    #[must_use]
    pub fn new(id: PageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            categories: BTreeSet::new(),
            recipes: Vec::new(),
        }
    }

    /// Adds a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Adds a recipe.
    #[must_use]
    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    /// Whether the page is a combination potion.
    #[must_use]
    pub fn is_combination_potion(&self) -> bool {
        self.categories.contains(COMBINATION_POTIONS_CATEGORY)
    }

    /// Whether the page is a potion. Vials of water are excluded.
    #[must_use]
    pub fn is_potion(&self) -> bool {
        self.id != PageId::VIAL_OF_WATER && self.categories.contains(POTIONS_CATEGORY)
    }

    /// Whether anything on this page can be produced.
    #[must_use]
    pub fn is_craftable(&self) -> bool {
        !self.recipes.is_empty()
    }

    /// Whether the caller must choose between recipes.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.recipes.len() > 1
    }

    /// Finds a recipe by exact name.
    #[must_use]
    pub fn recipe(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Read-only catalog of items and pages.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: SchemaVersion,
    items: HashMap<ItemId, Item>,
    pages: HashMap<PageId, Page>,
    /// Item IDs by lowercase name
    items_by_name: HashMap<String, ItemId>,
    /// Page IDs by lowercase name
    pages_by_name: HashMap<String, PageId>,
    /// Member items per page, sorted by ID
    page_items: HashMap<PageId, Vec<ItemId>>,
}

impl Catalog {
    /// Creates a catalog builder.
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Schema version the catalog was built from.
    #[must_use]
    pub const fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Gets an item by ID.
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Gets a page by ID.
    #[must_use]
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(&id)
    }

    /// Gets an item by name (case-insensitive).
    #[must_use]
    pub fn item_by_name(&self, name: &str) -> Option<&Item> {
        self.items_by_name
            .get(&name.to_lowercase())
            .and_then(|id| self.items.get(id))
    }

    /// Gets a page by name (case-insensitive).
    #[must_use]
    pub fn page_by_name(&self, name: &str) -> Option<&Page> {
        self.pages_by_name
            .get(&name.to_lowercase())
            .and_then(|id| self.pages.get(id))
    }

    /// Like [`Catalog::item`], but reports a missing item as an error.
    pub fn require_item(&self, id: ItemId) -> PlannerResult<&Item> {
        self.item(id).ok_or(PlannerError::UnknownItem(id))
    }

    /// Like [`Catalog::page`], but reports a missing page as an error.
    pub fn require_page(&self, id: PageId) -> PlannerResult<&Page> {
        self.page(id).ok_or(PlannerError::UnknownPage(id))
    }

    /// Page owning an item.
    #[must_use]
    pub fn page_of(&self, item: &Item) -> Option<&Page> {
        self.pages.get(&item.page)
    }

    /// Recipes able to produce an item (the recipes of its page).
    #[must_use]
    pub fn recipes_for(&self, item: &Item) -> &[Recipe] {
        self.page_of(item)
            .map(|page| page.recipes.as_slice())
            .unwrap_or_default()
    }

    /// Whether the item's page is a combination potion.
    #[must_use]
    pub fn is_combination_potion(&self, item: &Item) -> bool {
        self.page_of(item).is_some_and(Page::is_combination_potion)
    }

    /// Whether the item's page is a potion.
    #[must_use]
    pub fn is_potion(&self, item: &Item) -> bool {
        self.page_of(item).is_some_and(Page::is_potion)
    }

    /// Member items of a page, ordered by ID.
    #[must_use]
    pub fn page_items(&self, page: PageId) -> Vec<&Item> {
        self.page_items
            .get(&page)
            .map(|ids| ids.iter().filter_map(|id| self.items.get(id)).collect())
            .unwrap_or_default()
    }

    /// The item shown for a page: the first recipe's output, else the first
    /// member item.
    #[must_use]
    pub fn representative_item(&self, page: PageId) -> Option<&Item> {
        self.page(page)
            .and_then(|p| p.recipes.first())
            .and_then(|r| self.item(r.output.item))
            .or_else(|| self.page_items(page).into_iter().next())
    }

    /// Related items that exist in the catalog.
    #[must_use]
    pub fn related_items(&self, item: &Item) -> Vec<&Item> {
        item.related.iter().filter_map(|id| self.items.get(id)).collect()
    }

    /// Converts a quantity of one dose variant into the equivalent quantity of
    /// another variant of the same page.
    pub fn convert_dose_variant(
        &self,
        from: ItemId,
        quantity: f64,
        to: ItemId,
    ) -> PlannerResult<f64> {
        let from = self.require_item(from)?;
        let to = self.require_item(to)?;
        if from.page != to.page {
            return Err(PlannerError::PotionTypeMismatch {
                item: to.id,
                page: from.page,
            });
        }

        Ok(quantity * f64::from(from.dose_count()) / f64::from(to.dose_count()))
    }

    /// Returns an iterator over all items.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Returns an iterator over all pages.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Number of items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Searches pages by name substring (case-insensitive).
    pub fn search_pages(&self, query: &str) -> Vec<&Page> {
        let query_lower = query.to_lowercase();
        let mut found: Vec<&Page> = self
            .pages
            .values()
            .filter(|p| p.name.to_lowercase().contains(&query_lower))
            .collect();
        found.sort_by_key(|p| p.id);
        found
    }
}

/// Collects items and pages, then validates them into a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    version: Option<SchemaVersion>,
    items: Vec<Item>,
    pages: Vec<Page>,
}

impl CatalogBuilder {
    /// Sets the schema version (defaults to [`SchemaVersion::CATALOG`]).
    #[must_use]
    pub const fn version(mut self, version: SchemaVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Adds an item.
    #[must_use]
    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Adds a page.
    #[must_use]
    pub fn page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    /// Validates the graph and builds the catalog.
    pub fn build(self) -> CatalogResult<Catalog> {
        let mut pages = HashMap::with_capacity(self.pages.len());
        let mut pages_by_name = HashMap::with_capacity(self.pages.len());
        for page in self.pages {
            if pages.contains_key(&page.id) {
                return Err(CatalogError::DuplicatePage(page.id));
            }
            pages_by_name.insert(page.name.to_lowercase(), page.id);
            pages.insert(page.id, page);
        }

        let mut items = HashMap::with_capacity(self.items.len());
        let mut items_by_name = HashMap::with_capacity(self.items.len());
        let mut page_items: HashMap<PageId, Vec<ItemId>> = HashMap::new();
        for item in self.items {
            if items.contains_key(&item.id) {
                return Err(CatalogError::DuplicateItem(item.id));
            }
            if item.doses == Some(0) {
                return Err(CatalogError::ZeroDoses(item.id));
            }
            if !pages.contains_key(&item.page) {
                return Err(CatalogError::MissingPage {
                    item: item.id,
                    page: item.page,
                });
            }
            page_items.entry(item.page).or_default().push(item.id);
            items_by_name.insert(item.name.to_lowercase(), item.id);
            items.insert(item.id, item);
        }
        for members in page_items.values_mut() {
            members.sort_unstable();
        }

        for page in pages.values() {
            validate_page(page, &items)?;
        }

        debug!(
            "Built catalog with {} items and {} pages",
            items.len(),
            pages.len()
        );

        Ok(Catalog {
            version: self.version.unwrap_or(SchemaVersion::CATALOG),
            items,
            pages,
            items_by_name,
            pages_by_name,
            page_items,
        })
    }
}

fn validate_page(page: &Page, items: &HashMap<ItemId, Item>) -> CatalogResult<()> {
    let mut names = HashSet::new();

    for recipe in &page.recipes {
        let invalid = |reason: &str| CatalogError::InvalidRecipe {
            page: page.id,
            recipe: recipe.name.clone(),
            reason: reason.to_string(),
        };

        if recipe.name.is_empty() {
            return Err(invalid("empty name"));
        }
        if !names.insert(recipe.name.as_str()) {
            return Err(invalid("duplicate recipe name on page"));
        }
        if recipe.output.quantity == 0 {
            return Err(invalid("zero output quantity"));
        }
        if recipe.inputs.iter().any(|i| i.quantity == 0) {
            return Err(invalid("zero input quantity"));
        }

        let output = items.get(&recipe.output.item).ok_or_else(|| CatalogError::MissingItem {
            page: page.id,
            recipe: recipe.name.clone(),
            item: recipe.output.item,
        })?;
        if output.page != page.id {
            return Err(CatalogError::ForeignOutput {
                page: page.id,
                recipe: recipe.name.clone(),
                item: output.id,
            });
        }

        if let Some(missing) = recipe.inputs.iter().find(|i| !items.contains_key(&i.item)) {
            return Err(CatalogError::MissingItem {
                page: page.id,
                recipe: recipe.name.clone(),
                item: missing.item,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ids, sample_catalog};

    #[test]
    fn test_lookup_by_id_and_name() {
        let catalog = sample_catalog();

        let item = catalog.item(ids::ATTACK_3).expect("attack potion");
        assert_eq!(item.name, "Attack potion (3)");
        assert_eq!(item.dose_count(), 3);

        // Case-insensitive lookup
        assert!(catalog.item_by_name("attack potion (3)").is_some());
        assert!(catalog.page_by_name("ATTACK POTION").is_some());
        assert!(catalog.page_by_name("unknown").is_none());
        assert!(catalog.item(ItemId::new(999_999)).is_none());
    }

    #[test]
    fn test_page_predicates() {
        let catalog = sample_catalog();

        let vial = catalog.page(PageId::VIAL_OF_WATER).expect("vial page");
        assert!(!vial.is_potion());
        assert!(!vial.is_craftable());

        let attack = catalog.page(ids::ATTACK_PAGE).expect("attack page");
        assert!(attack.is_potion());
        assert!(!attack.is_combination_potion());
        assert!(!attack.is_ambiguous());

        let combat = catalog.page(ids::COMBAT_PAGE).expect("combat page");
        assert!(combat.is_combination_potion());

        let super_attack = catalog.page(ids::SUPER_ATTACK_PAGE).expect("super attack page");
        assert!(super_attack.is_ambiguous());
        assert!(super_attack.recipe("Regular").is_some());
        assert!(super_attack.recipe("regular").is_none());
    }

    #[test]
    fn test_page_items_and_representative() {
        let catalog = sample_catalog();

        let members: Vec<ItemId> = catalog
            .page_items(ids::ATTACK_PAGE)
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(
            members,
            vec![ids::ATTACK_1, ids::ATTACK_2, ids::ATTACK_3, ids::ATTACK_4, ids::ATTACK_FLASK]
        );

        // Output of the first recipe wins over the first member
        let rep = catalog.representative_item(ids::ATTACK_PAGE).expect("rep");
        assert_eq!(rep.id, ids::ATTACK_3);

        // Pages without recipes fall back to their first member
        let rep = catalog.representative_item(ids::GUAM_PAGE).expect("rep");
        assert_eq!(rep.id, ids::GUAM);
    }

    #[test]
    fn test_related_items_skip_unknown() {
        let catalog = sample_catalog();
        let flask = catalog.item(ids::ATTACK_FLASK).expect("flask");
        assert!(flask.is_flask());

        let related = catalog.related_items(flask);
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].id, ids::ATTACK_3);
    }

    #[test]
    fn test_convert_dose_variant() {
        let catalog = sample_catalog();

        let qty = catalog
            .convert_dose_variant(ids::ATTACK_4, 3.0, ids::ATTACK_3)
            .expect("same page");
        assert!((qty - 4.0).abs() < 1e-9);

        let err = catalog
            .convert_dose_variant(ids::ATTACK_4, 1.0, ids::GUAM)
            .expect_err("different pages");
        assert!(matches!(err, PlannerError::PotionTypeMismatch { .. }));
    }

    #[test]
    fn test_slots_used_counts_stackables_once() {
        let catalog = sample_catalog();
        let page = catalog.page(ids::SUPER_ATTACK_PAGE).expect("page");
        let recipe = page.recipe("Regular").expect("recipe");

        // unf potion (1) + stackable eye of newt x5 (1 slot)
        assert_eq!(recipe.slots_used(&catalog), 2);
        assert_eq!(recipe.secondaries().count(), 1);
    }

    #[test]
    fn test_tick_cost_from_slice() {
        assert_eq!(TickCost::from_slice(&[]), TickCost::new(0, None));
        assert_eq!(TickCost::from_slice(&[2]).repeat_or_first(), 2);
        assert_eq!(TickCost::from_slice(&[2, 1]).repeat_or_first(), 1);
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let result = Catalog::builder()
            .page(Page::new(PageId::new(1), "Herb"))
            .page(Page::new(PageId::new(1), "Herb again"))
            .build();
        assert!(matches!(result, Err(CatalogError::DuplicatePage(_))));

        let result = Catalog::builder()
            .page(Page::new(PageId::new(1), "Herb"))
            .item(Item::new(ItemId::new(1), "Herb", PageId::new(1)))
            .item(Item::new(ItemId::new(1), "Herb", PageId::new(1)))
            .build();
        assert!(matches!(result, Err(CatalogError::DuplicateItem(_))));
    }

    #[test]
    fn test_build_rejects_zero_doses() {
        let herb_page = PageId::new(1);
        let unf_page = PageId::new(2);
        let result = Catalog::builder()
            .page(Page::new(herb_page, "Herb"))
            .page(
                Page::new(unf_page, "Potion (unf)").with_recipe(
                    Recipe::builder("Regular", ItemId::new(20), 1)
                        .input(ItemId::new(10), 1)
                        .build(),
                ),
            )
            .item(Item::new(ItemId::new(10), "Herb", herb_page))
            .item(Item::new(ItemId::new(20), "Potion (unf)", unf_page).with_doses(0))
            .build();
        assert!(matches!(result, Err(CatalogError::ZeroDoses(id)) if id == ItemId::new(20)));
    }

    #[test]
    fn test_build_rejects_foreign_output() {
        let herb_page = PageId::new(1);
        let potion_page = PageId::new(2);
        let result = Catalog::builder()
            .page(Page::new(herb_page, "Herb"))
            .page(
                Page::new(potion_page, "Potion")
                    .with_recipe(Recipe::builder("Regular", ItemId::new(1), 1).build()),
            )
            .item(Item::new(ItemId::new(1), "Herb", herb_page))
            .build();
        assert!(matches!(result, Err(CatalogError::ForeignOutput { .. })));
    }

    #[test]
    fn test_build_rejects_missing_references() {
        let page = PageId::new(1);
        let result = Catalog::builder()
            .page(Page::new(page, "Potion"))
            .item(Item::new(ItemId::new(1), "Potion", PageId::new(42)))
            .build();
        assert!(matches!(result, Err(CatalogError::MissingPage { .. })));

        let result = Catalog::builder()
            .page(
                Page::new(page, "Potion").with_recipe(
                    Recipe::builder("Regular", ItemId::new(1), 1)
                        .input(ItemId::new(77), 1)
                        .build(),
                ),
            )
            .item(Item::new(ItemId::new(1), "Potion", page))
            .build();
        assert!(matches!(
            result,
            Err(CatalogError::MissingItem { item, .. }) if item == ItemId::new(77)
        ));
    }

    #[test]
    fn test_build_rejects_invalid_recipes() {
        let page = PageId::new(1);
        let base = || Catalog::builder().item(Item::new(ItemId::new(1), "Potion", page));

        let result = base()
            .page(
                Page::new(page, "Potion")
                    .with_recipe(Recipe::builder("Regular", ItemId::new(1), 0).build()),
            )
            .build();
        assert!(matches!(result, Err(CatalogError::InvalidRecipe { .. })));

        let result = base()
            .page(
                Page::new(page, "Potion")
                    .with_recipe(Recipe::builder("Regular", ItemId::new(1), 1).build())
                    .with_recipe(Recipe::builder("Regular", ItemId::new(1), 1).build()),
            )
            .build();
        assert!(matches!(result, Err(CatalogError::InvalidRecipe { .. })));
    }

    #[test]
    fn test_search_pages() {
        let catalog = sample_catalog();
        let found = catalog.search_pages("attack");
        assert_eq!(found.len(), 2);
        assert!(found[0].id < found[1].id);
    }
}
