//! Recursive resolution of a production target into base materials,
//! experience and ticks.
//!
//! Quantities stay fractional through the recursion. They are rounded up only
//! when recorded as materials or when counting discrete operations.

use herblore_common::{ItemId, PageId, PlannerError, PlannerResult};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::{debug, trace};

use crate::catalog::{Catalog, Item, Page, Recipe};
use crate::inventory::{Counter, InventoryOffset};
use crate::modifiers::{Modifiers, PlanOptions, RecipePaths};
use crate::yields::{YieldCalculator, SCROLL_OF_CLEANSING_SAVE_CHANCE};

/// Milliseconds per game tick.
pub const TICK_MILLIS: u64 = 600;

/// Totals for one plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    /// Item the plan produces
    pub target: Option<ItemId>,
    /// Quantity of the target still to produce after owned stock
    pub target_quantity: u64,
    /// Intermediates and base materials still needed, by item
    pub materials: BTreeMap<ItemId, u64>,
    /// Total experience
    pub exp: f64,
    /// Total ticks
    pub ticks: f64,
    /// Inventory loads across every step
    pub inventories: u64,
    /// Craft operations across every step
    pub operations: u64,
}

impl Resolution {
    /// Returns true if nothing has to be produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations == 0 && self.materials.is_empty()
    }

    /// Wall-clock time for all operations.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.ticks.max(0.0) * TICK_MILLIS as f64 / 1000.0)
    }

    /// Experience per hour, rounded to two decimals.
    #[must_use]
    pub fn exp_per_hour(&self) -> f64 {
        let hours = self.duration().as_secs_f64() / 3600.0;
        if hours <= 0.0 {
            return 0.0;
        }
        (self.exp / hours * 100.0).round() / 100.0
    }

    /// Materials that no recipe can produce, i.e. the items to gather or buy.
    #[must_use]
    pub fn base_materials(&self, catalog: &Catalog) -> BTreeMap<ItemId, u64> {
        self.materials
            .iter()
            .filter(|(id, _)| {
                catalog
                    .item(**id)
                    .is_some_and(|item| catalog.recipes_for(item).is_empty())
            })
            .map(|(id, qty)| (*id, *qty))
            .collect()
    }
}

/// Picks the recipe to use for a page. Pages with one recipe use it; pages
/// with several need an exact selection in `recipe_paths`.
pub fn select_recipe<'a>(page: &'a Page, recipe_paths: &RecipePaths) -> PlannerResult<&'a Recipe> {
    match page.recipes.as_slice() {
        [] => Err(PlannerError::NotCraftable { page: page.id }),
        [only] => Ok(only),
        recipes => {
            let name = recipe_paths
                .get(&page.id)
                .ok_or_else(|| PlannerError::UnresolvedRecipePath {
                    page: page.id,
                    page_name: page.name.clone(),
                })?;
            recipes
                .iter()
                .find(|r| r.name == *name)
                .ok_or_else(|| PlannerError::RecipeNotFound {
                    page: page.id,
                    recipe: name.clone(),
                })
        },
    }
}

/// Plans `quantity` of a page's default output.
///
/// Owned stock of the page itself is ignored: the request is on top of what is
/// already banked.
pub fn calculate_inputs(
    catalog: &Catalog,
    page: PageId,
    quantity: f64,
    options: &PlanOptions,
) -> PlannerResult<Resolution> {
    let page = catalog.require_page(page)?;
    let recipe = select_recipe(page, &options.recipe_paths)?;
    let item = catalog.require_item(recipe.output.item)?;

    run(catalog, page, recipe, item, quantity, options)
}

/// Plans `quantity` of one specific dose variant of a page.
pub fn calculate_item_inputs(
    catalog: &Catalog,
    page: PageId,
    item: ItemId,
    quantity: f64,
    options: &PlanOptions,
) -> PlannerResult<Resolution> {
    let page = catalog.require_page(page)?;
    let item = catalog.require_item(item)?;
    if item.page != page.id {
        return Err(PlannerError::PotionTypeMismatch {
            item: item.id,
            page: page.id,
        });
    }
    let recipe = select_recipe(page, &options.recipe_paths)?;

    run(catalog, page, recipe, item, quantity, options)
}

fn run<'a>(
    catalog: &'a Catalog,
    page: &'a Page,
    recipe: &'a Recipe,
    item: &'a Item,
    quantity: f64,
    options: &'a PlanOptions,
) -> PlannerResult<Resolution> {
    if !quantity.is_finite() {
        return Err(PlannerError::InvalidQuantity(quantity));
    }

    debug!(
        "Planning {quantity} x {:?} via {:?} on {}",
        item.name, recipe.name, page.id
    );

    let mut inventory = InventoryOffset::new(catalog, &options.owned_inventory);
    inventory.set_bucket(page.id, 0.0);

    let mut resolver = Resolver {
        catalog,
        modifiers: options.modifiers.normalized(),
        recipe_paths: &options.recipe_paths,
        inventory,
        root: item.id,
        path: Vec::new(),
        resolution: Resolution {
            target: Some(item.id),
            ..Resolution::default()
        },
        materials: Counter::new(),
    };
    resolver.resolve(page, recipe, item, quantity)?;

    let mut resolution = resolver.resolution;
    resolution.materials = resolver.materials.into_inner();
    debug!(
        "Plan needs {} materials, {} operations, {:.1} exp, {:.1} ticks",
        resolution.materials.len(),
        resolution.operations,
        resolution.exp,
        resolution.ticks
    );

    Ok(resolution)
}

/// Per-call traversal state.
struct Resolver<'a> {
    catalog: &'a Catalog,
    modifiers: Modifiers,
    recipe_paths: &'a RecipePaths,
    inventory: InventoryOffset,
    root: ItemId,
    /// Pages on the current recursion path
    path: Vec<PageId>,
    resolution: Resolution,
    materials: Counter<ItemId, u64>,
}

impl<'a> Resolver<'a> {
    fn resolve(
        &mut self,
        page: &'a Page,
        recipe: &'a Recipe,
        item_needed: &'a Item,
        quantity: f64,
    ) -> PlannerResult<()> {
        if self.path.contains(&page.id) {
            let mut path = self.path.clone();
            path.push(page.id);
            return Err(PlannerError::CyclicRecipe { path });
        }

        let needed = self.inventory.take_item(item_needed, quantity);
        if needed <= 0.0 {
            trace!("{:?} covered by owned stock", item_needed.name);
            return Ok(());
        }

        let calc = YieldCalculator::new(self.catalog, recipe)?;
        let output_doses =
            calc.calculate_quantity(&self.modifiers) * f64::from(calc.output_item().dose_count());
        let doses_needed = needed * f64::from(item_needed.dose_count());
        let operations = count(doses_needed / output_doses, page.id)?;

        if self.path.is_empty() && item_needed.id == self.root {
            self.resolution.target_quantity = count(needed, page.id)?;
        } else {
            self.record(item_needed.id, needed, page.id)?;
        }
        let overflow = || PlannerError::QuantityOverflow { page: page.id };
        self.resolution.exp += calc.calculate_exp(&self.modifiers) * operations as f64;
        self.resolution.ticks += calc.calculate_ticks_for_operations(operations, &self.modifiers);
        self.resolution.inventories = self
            .resolution
            .inventories
            .checked_add(calc.inventories_for_operations(operations))
            .ok_or_else(overflow)?;
        self.resolution.operations = self
            .resolution
            .operations
            .checked_add(operations)
            .ok_or_else(overflow)?;

        debug!(
            "{:?}: {needed:.3} needed, {operations} operations of {:?}",
            item_needed.name, recipe.name
        );

        self.path.push(page.id);
        let secondaries = recipe.secondaries().count();
        for input in &recipe.inputs {
            let mut input_needed = operations as f64 * f64::from(input.quantity);

            if input.secondary && self.modifiers.scroll_of_cleansing && input.savable {
                let saved = SCROLL_OF_CLEANSING_SAVE_CHANCE / secondaries as f64;
                input_needed = (input_needed * (1.0 - saved)).ceil();
            }

            let input_item = self.catalog.require_item(input.item)?;
            let input_page = self.catalog.require_page(input_item.page)?;

            if !input_page.is_craftable() {
                let short = self.inventory.take_item(input_item, input_needed);
                if short > 0.0 {
                    self.record(input_item.id, short, input_page.id)?;
                }
                continue;
            }

            let input_recipe = select_recipe(input_page, self.recipe_paths)?;
            self.resolve(input_page, input_recipe, input_item, input_needed)?;
        }
        self.path.pop();

        Ok(())
    }

    fn record(&mut self, item: ItemId, quantity: f64, page: PageId) -> PlannerResult<()> {
        let total = self
            .materials
            .get(&item)
            .checked_add(count(quantity, page)?)
            .ok_or(PlannerError::QuantityOverflow { page })?;
        self.materials.set(item, total);
        Ok(())
    }
}

/// Rounds a fractional quantity up to a whole count.
fn count(value: f64, page: PageId) -> PlannerResult<u64> {
    let rounded = value.ceil();
    if rounded.is_nan() || rounded >= u64::MAX as f64 {
        return Err(PlannerError::QuantityOverflow { page });
    }
    Ok(rounded.max(0.0) as u64)
}

/// Lists every page with several recipes reachable from `page`, including
/// `page` itself, in discovery order. All recipes are walked, not only the
/// selected ones, so callers can collect every selection up front.
pub fn discover_ambiguous_recipes(catalog: &Catalog, page: PageId) -> PlannerResult<Vec<&Page>> {
    let root = catalog.require_page(page)?;
    let mut visited = HashSet::new();
    let mut found = Vec::new();
    discover(catalog, root, &mut visited, &mut found);
    Ok(found)
}

fn discover<'a>(
    catalog: &'a Catalog,
    page: &'a Page,
    visited: &mut HashSet<PageId>,
    found: &mut Vec<&'a Page>,
) {
    if !visited.insert(page.id) {
        return;
    }
    if page.is_ambiguous() {
        found.push(page);
    }

    for input in page.recipes.iter().flat_map(|r| r.inputs.iter()) {
        let Some(input_page) = catalog.item(input.item).and_then(|i| catalog.page_of(i)) else {
            continue;
        };
        if input_page.is_craftable() {
            discover(catalog, input_page, visited, found);
        }
    }
}

/// Ambiguous pages reachable from `page` whose selection is missing or names
/// no recipe.
pub fn unresolved_recipe_paths<'a>(
    catalog: &'a Catalog,
    page: PageId,
    recipe_paths: &RecipePaths,
) -> PlannerResult<Vec<&'a Page>> {
    Ok(discover_ambiguous_recipes(catalog, page)?
        .into_iter()
        .filter(|p| {
            recipe_paths
                .get(&p.id)
                .and_then(|name| p.recipe(name))
                .is_none()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ids, sample_catalog};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn materials(entries: &[(ItemId, u64)]) -> BTreeMap<ItemId, u64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_single_step_recipe() {
        let catalog = sample_catalog();
        let resolution =
            calculate_inputs(&catalog, ids::UNF_PAGE, 10.0, &PlanOptions::default()).expect("plan");

        assert_eq!(resolution.target, Some(ids::UNF));
        assert_eq!(resolution.target_quantity, 10);
        assert_eq!(resolution.materials, materials(&[(ids::GUAM, 10), (ids::VIAL, 10)]));
        assert!(approx(resolution.exp, 10.0));
        // 14 operations per inventory: first + 9 repeats
        assert!(approx(resolution.ticks, 2.0 + 9.0));
        assert_eq!(resolution.operations, 10);
        assert_eq!(resolution.inventories, 1);
    }

    #[test]
    fn test_ticks_split_across_inventories() {
        let catalog = sample_catalog();
        let resolution =
            calculate_inputs(&catalog, ids::UNF_PAGE, 20.0, &PlanOptions::default()).expect("plan");

        assert!(approx(resolution.ticks, 2.0 * 2.0 + 18.0));
        assert_eq!(resolution.inventories, 2);
    }

    #[test]
    fn test_owned_stock_reduces_production() {
        let catalog = sample_catalog();
        let options = PlanOptions::default().with_owned(ids::UNF, 4);

        // The target's own stock is ignored at the root
        let resolution = calculate_inputs(&catalog, ids::UNF_PAGE, 10.0, &options).expect("plan");
        assert_eq!(resolution.target_quantity, 10);

        // But covers the same item when it is an intermediate
        let resolution = calculate_inputs(&catalog, ids::ATTACK_PAGE, 10.0, &options).expect("plan");
        assert_eq!(
            resolution.materials,
            materials(&[(ids::UNF, 6), (ids::GUAM, 6), (ids::VIAL, 6), (ids::EYE, 10)])
        );
    }

    #[test]
    fn test_multi_level_resolution() {
        let catalog = sample_catalog();
        let resolution =
            calculate_inputs(&catalog, ids::ATTACK_PAGE, 5.0, &PlanOptions::default()).expect("plan");

        assert_eq!(
            resolution.materials,
            materials(&[(ids::UNF, 5), (ids::GUAM, 5), (ids::VIAL, 5), (ids::EYE, 5)])
        );
        assert!(approx(resolution.exp, 5.0 * 25.0 + 5.0 * 1.0));
        assert_eq!(resolution.operations, 10);
        assert_eq!(
            resolution.base_materials(&catalog),
            materials(&[(ids::GUAM, 5), (ids::VIAL, 5), (ids::EYE, 5)])
        );
    }

    #[test]
    fn test_dose_variants_offset_each_other() {
        let catalog = sample_catalog();
        // 2 four-dose potions = 8 doses cover 2 of the 3 three-dose potions,
        // leaving 1/3 potion that still needs one operation.
        let options = PlanOptions::default()
            .with_owned(ids::ATTACK_4, 2)
            .with_recipe_path(ids::SUPER_ATTACK_PAGE, "Regular");
        let resolution = calculate_inputs(&catalog, ids::COMBAT_PAGE, 3.0, &options).expect("plan");

        assert_eq!(resolution.materials.get(&ids::ATTACK_3), Some(&1));
    }

    #[test]
    fn test_non_positive_quantity_is_empty() {
        let catalog = sample_catalog();
        for quantity in [0.0, -3.0] {
            let resolution =
                calculate_inputs(&catalog, ids::ATTACK_PAGE, quantity, &PlanOptions::default())
                    .expect("plan");
            assert!(resolution.is_empty());
            assert_eq!(resolution.exp, 0.0);
            assert_eq!(resolution.ticks, 0.0);
            assert_eq!(resolution.target_quantity, 0);
        }
    }

    #[test]
    fn test_unbounded_quantities_are_rejected() {
        let catalog = sample_catalog();
        let options = PlanOptions::default();

        for quantity in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = calculate_inputs(&catalog, ids::ATTACK_PAGE, quantity, &options)
                .expect_err("non-finite");
            assert!(matches!(err, PlannerError::InvalidQuantity(_)));
        }

        // Attack and its unfinished potion each need 1e19 operations, which
        // together exceed the operation counter.
        let err = calculate_inputs(&catalog, ids::ATTACK_PAGE, 1e19, &options)
            .expect_err("overflow");
        assert!(matches!(err, PlannerError::QuantityOverflow { .. }));

        let err = calculate_inputs(&catalog, ids::UNF_PAGE, 1e20, &options)
            .expect_err("overflow");
        assert!(matches!(err, PlannerError::QuantityOverflow { page } if page == ids::UNF_PAGE));
    }

    #[test]
    fn test_ambiguous_page_needs_selection() {
        let catalog = sample_catalog();

        let err = calculate_inputs(&catalog, ids::SUPER_ATTACK_PAGE, 1.0, &PlanOptions::default())
            .expect_err("ambiguous");
        assert!(matches!(
            err,
            PlannerError::UnresolvedRecipePath { page, .. } if page == ids::SUPER_ATTACK_PAGE
        ));

        let options = PlanOptions::default().with_recipe_path(ids::SUPER_ATTACK_PAGE, "Missing");
        let err = calculate_inputs(&catalog, ids::SUPER_ATTACK_PAGE, 1.0, &options)
            .expect_err("unknown recipe");
        assert!(matches!(err, PlannerError::RecipeNotFound { .. }));

        // Nested pages follow the same rule
        let err = calculate_inputs(&catalog, ids::COMBAT_PAGE, 1.0, &PlanOptions::default())
            .expect_err("nested ambiguous");
        assert!(matches!(err, PlannerError::UnresolvedRecipePath { .. }));
    }

    #[test]
    fn test_selection_picks_recipe_profile() {
        let catalog = sample_catalog();

        let regular = PlanOptions::default().with_recipe_path(ids::SUPER_ATTACK_PAGE, "Regular");
        let resolution =
            calculate_inputs(&catalog, ids::SUPER_ATTACK_PAGE, 2.0, &regular).expect("plan");
        assert_eq!(resolution.materials.get(&ids::EYE), Some(&10));
        assert!(approx(resolution.exp, 2.0 * 100.0 + 2.0 * 1.0));

        let from_attack =
            PlanOptions::default().with_recipe_path(ids::SUPER_ATTACK_PAGE, "From attack");
        let resolution =
            calculate_inputs(&catalog, ids::SUPER_ATTACK_PAGE, 2.0, &from_attack).expect("plan");
        assert_eq!(resolution.materials.get(&ids::ATTACK_3), Some(&2));
        assert_eq!(resolution.materials.get(&ids::GUAM), Some(&4));
    }

    #[test]
    fn test_not_craftable_root() {
        let catalog = sample_catalog();
        let err = calculate_inputs(&catalog, ids::GUAM_PAGE, 1.0, &PlanOptions::default())
            .expect_err("base material");
        assert_eq!(err, PlannerError::NotCraftable { page: ids::GUAM_PAGE });

        let err = calculate_inputs(&catalog, PageId::new(12_345), 1.0, &PlanOptions::default())
            .expect_err("missing page");
        assert_eq!(err, PlannerError::UnknownPage(PageId::new(12_345)));
    }

    #[test]
    fn test_item_inputs_for_other_dose_variant() {
        let catalog = sample_catalog();
        // 3 four-dose potions = 12 doses = 4 operations of the 3-dose recipe
        let resolution = calculate_item_inputs(
            &catalog,
            ids::ATTACK_PAGE,
            ids::ATTACK_4,
            3.0,
            &PlanOptions::default(),
        )
        .expect("plan");
        assert_eq!(resolution.target, Some(ids::ATTACK_4));
        assert_eq!(resolution.target_quantity, 3);
        assert_eq!(resolution.materials.get(&ids::EYE), Some(&4));

        let err = calculate_item_inputs(
            &catalog,
            ids::ATTACK_PAGE,
            ids::SUPER_ATTACK_4,
            3.0,
            &PlanOptions::default(),
        )
        .expect_err("mismatch");
        assert!(matches!(err, PlannerError::PotionTypeMismatch { .. }));
    }

    #[test]
    fn test_scroll_of_cleansing_saves_secondaries() {
        let catalog = sample_catalog();
        let options = PlanOptions::new(Modifiers {
            scroll_of_cleansing: true,
            ..Modifiers::default()
        });

        let resolution = calculate_inputs(&catalog, ids::ATTACK_PAGE, 100.0, &options).expect("plan");
        // One secondary: 100 x (1 - 0.1) eyes; primaries untouched
        assert_eq!(resolution.materials.get(&ids::EYE), Some(&90));
        assert_eq!(resolution.materials.get(&ids::UNF), Some(&100));
        // Vial of water is the unf potion's secondary
        assert_eq!(resolution.materials.get(&ids::VIAL), Some(&90));
    }

    #[test]
    fn test_extra_doses_reduce_operations() {
        let catalog = sample_catalog();
        let options = PlanOptions::new(Modifiers {
            well: true,
            brooch_of_the_gods: true,
            ..Modifiers::default()
        });

        let resolution = calculate_inputs(&catalog, ids::ATTACK_PAGE, 110.0, &options).expect("plan");
        // 1.1 potions per operation
        assert_eq!(resolution.materials.get(&ids::EYE), Some(&100));
    }

    #[test]
    fn test_shared_ingredients_are_not_cycles() {
        let catalog = sample_catalog();
        let options = PlanOptions::default().with_recipe_path(ids::SUPER_ATTACK_PAGE, "From attack");

        let resolution = calculate_inputs(&catalog, ids::COMBAT_PAGE, 1.0, &options).expect("plan");
        // Attack potion is needed directly and through the super attack
        assert_eq!(resolution.materials.get(&ids::ATTACK_3), Some(&2));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let a_page = PageId::new(1);
        let b_page = PageId::new(2);
        let a = ItemId::new(10);
        let b = ItemId::new(20);
        let catalog = Catalog::builder()
            .page(
                Page::new(a_page, "A")
                    .with_recipe(Recipe::builder("Regular", a, 1).input(b, 1).build()),
            )
            .page(
                Page::new(b_page, "B")
                    .with_recipe(Recipe::builder("Regular", b, 1).input(a, 1).build()),
            )
            .item(Item::new(a, "A", a_page))
            .item(Item::new(b, "B", b_page))
            .build()
            .expect("catalog");

        let err = calculate_inputs(&catalog, a_page, 1.0, &PlanOptions::default()).expect_err("cycle");
        assert_eq!(
            err,
            PlannerError::CyclicRecipe {
                path: vec![a_page, b_page, a_page]
            }
        );
    }

    #[test]
    fn test_discover_ambiguous_recipes() {
        let catalog = sample_catalog();

        let found = discover_ambiguous_recipes(&catalog, ids::COMBAT_PAGE).expect("discover");
        let pages: Vec<PageId> = found.iter().map(|p| p.id).collect();
        assert_eq!(pages, vec![ids::SUPER_ATTACK_PAGE]);

        let found = discover_ambiguous_recipes(&catalog, ids::ATTACK_PAGE).expect("discover");
        assert!(found.is_empty());
    }

    #[test]
    fn test_unresolved_recipe_paths() {
        let catalog = sample_catalog();
        let mut paths = RecipePaths::new();

        assert_eq!(
            unresolved_recipe_paths(&catalog, ids::COMBAT_PAGE, &paths).expect("walk").len(),
            1
        );

        paths.insert(ids::SUPER_ATTACK_PAGE, "Nope".to_string());
        assert_eq!(
            unresolved_recipe_paths(&catalog, ids::COMBAT_PAGE, &paths).expect("walk").len(),
            1
        );

        paths.insert(ids::SUPER_ATTACK_PAGE, "Regular".to_string());
        assert!(unresolved_recipe_paths(&catalog, ids::COMBAT_PAGE, &paths)
            .expect("walk")
            .is_empty());
    }

    #[test]
    fn test_duration_and_exp_rate() {
        let resolution = Resolution {
            exp: 1000.0,
            ticks: 100.0,
            ..Resolution::default()
        };
        assert_eq!(resolution.duration(), Duration::from_secs(60));
        assert!(approx(resolution.exp_per_hour(), 60_000.0));
        assert_eq!(Resolution::default().exp_per_hour(), 0.0);
    }
}
