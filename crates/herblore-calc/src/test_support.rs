//! Small catalog shared by the unit tests.

use herblore_common::{ItemId, PageId};

use crate::catalog::{Catalog, Item, Page, Recipe, COMBINATION_POTIONS_CATEGORY, POTIONS_CATEGORY};

pub mod ids {
    use super::{ItemId, PageId};

    pub const GUAM_PAGE: PageId = PageId::new(1);
    pub const EYE_PAGE: PageId = PageId::new(3);
    pub const UNF_PAGE: PageId = PageId::new(4);
    pub const ATTACK_PAGE: PageId = PageId::new(5);
    pub const SUPER_ATTACK_PAGE: PageId = PageId::new(6);
    pub const COMBAT_PAGE: PageId = PageId::new(7);

    pub const GUAM: ItemId = ItemId::new(101);
    pub const VIAL: ItemId = ItemId::new(102);
    pub const EYE: ItemId = ItemId::new(103);
    pub const UNF: ItemId = ItemId::new(104);
    pub const ATTACK_1: ItemId = ItemId::new(151);
    pub const ATTACK_2: ItemId = ItemId::new(152);
    pub const ATTACK_3: ItemId = ItemId::new(153);
    pub const ATTACK_4: ItemId = ItemId::new(154);
    pub const ATTACK_FLASK: ItemId = ItemId::new(156);
    pub const SUPER_ATTACK_3: ItemId = ItemId::new(163);
    pub const SUPER_ATTACK_4: ItemId = ItemId::new(164);
    pub const COMBAT_3: ItemId = ItemId::new(173);
}

/// Guam/vial base materials, an unfinished potion, a single-recipe potion,
/// a two-recipe potion and a combination potion depending on both.
pub fn sample_catalog() -> Catalog {
    use ids::*;

    Catalog::builder()
        .page(Page::new(GUAM_PAGE, "Clean guam"))
        .page(Page::new(PageId::VIAL_OF_WATER, "Vial of water").with_category(POTIONS_CATEGORY))
        .page(Page::new(EYE_PAGE, "Eye of newt"))
        .page(
            Page::new(UNF_PAGE, "Guam potion (unf)").with_recipe(
                Recipe::builder("Regular", UNF, 1)
                    .input(GUAM, 1)
                    .input(VIAL, 1)
                    .exp(1.0)
                    .ticks(2, Some(1))
                    .build(),
            ),
        )
        .page(
            Page::new(ATTACK_PAGE, "Attack potion")
                .with_category(POTIONS_CATEGORY)
                .with_recipe(
                    Recipe::builder("Regular", ATTACK_3, 1)
                        .input(UNF, 1)
                        .input(EYE, 1)
                        .exp(25.0)
                        .ticks(2, Some(1))
                        .skill_level(3)
                        .build(),
                ),
        )
        .page(
            Page::new(SUPER_ATTACK_PAGE, "Super attack")
                .with_category(POTIONS_CATEGORY)
                .with_recipe(
                    Recipe::builder("Regular", SUPER_ATTACK_3, 1)
                        .input(UNF, 1)
                        .input(EYE, 5)
                        .exp(100.0)
                        .ticks(2, Some(1))
                        .skill_level(45)
                        .build(),
                )
                .with_recipe(
                    Recipe::builder("From attack", SUPER_ATTACK_3, 1)
                        .input(ATTACK_3, 1)
                        .input(GUAM, 1)
                        .exp(50.0)
                        .ticks(2, Some(1))
                        .skill_level(45)
                        .build(),
                ),
        )
        .page(
            Page::new(COMBAT_PAGE, "Combat potion")
                .with_category(POTIONS_CATEGORY)
                .with_category(COMBINATION_POTIONS_CATEGORY)
                .with_recipe(
                    Recipe::builder("Regular", COMBAT_3, 1)
                        .input(SUPER_ATTACK_3, 1)
                        .input(ATTACK_3, 1)
                        .exp(150.0)
                        .ticks(2, Some(1))
                        .skill_level(88)
                        .build(),
                ),
        )
        .item(Item::new(GUAM, "Clean guam", GUAM_PAGE))
        .item(Item::new(VIAL, "Vial of water", PageId::VIAL_OF_WATER))
        .item(Item::new(EYE, "Eye of newt", EYE_PAGE).stackable())
        .item(Item::new(UNF, "Guam potion (unf)", UNF_PAGE))
        .item(Item::new(ATTACK_1, "Attack potion (1)", ATTACK_PAGE).with_doses(1))
        .item(Item::new(ATTACK_2, "Attack potion (2)", ATTACK_PAGE).with_doses(2))
        .item(Item::new(ATTACK_3, "Attack potion (3)", ATTACK_PAGE).with_doses(3))
        .item(Item::new(ATTACK_4, "Attack potion (4)", ATTACK_PAGE).with_doses(4))
        .item(
            Item::new(ATTACK_FLASK, "Attack flask (6)", ATTACK_PAGE)
                .with_doses(6)
                .flask()
                .with_related(vec![ATTACK_3, ItemId::new(9999)]),
        )
        .item(Item::new(SUPER_ATTACK_3, "Super attack (3)", SUPER_ATTACK_PAGE).with_doses(3))
        .item(Item::new(SUPER_ATTACK_4, "Super attack (4)", SUPER_ATTACK_PAGE).with_doses(4))
        .item(Item::new(COMBAT_3, "Combat potion (3)", COMBAT_PAGE).with_doses(3))
        .build()
        .expect("sample catalog is valid")
}
