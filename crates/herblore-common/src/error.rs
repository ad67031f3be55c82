//! Error types for the herblore planner.

use thiserror::Error;

use crate::ids::{ItemId, PageId};

/// Errors raised while resolving a production plan.
///
/// Every variant aborts the whole calculation; no partial result is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// The requested quantity is NaN or infinite.
    #[error("Quantity must be a finite number, got {0}")]
    InvalidQuantity(f64),

    /// A count grew past what the plan totals can hold.
    #[error("Plan for {page} is too large to count")]
    QuantityOverflow {
        /// Page being resolved when the count overflowed
        page: PageId,
    },

    /// A page with several recipes has no recipe selected for it.
    #[error("No recipe selected for {page_name} ({page}), which has several recipes")]
    UnresolvedRecipePath {
        /// Page needing a selection
        page: PageId,
        /// Page name for display
        page_name: String,
    },

    /// The selected recipe name does not exist on the page.
    #[error("Recipe {recipe:?} not found on {page}")]
    RecipeNotFound {
        /// Page the selection was made for
        page: PageId,
        /// Recipe name that was supplied
        recipe: String,
    },

    /// The recipe graph loops back onto a page already being resolved.
    #[error("Cyclic recipe chain: {path:?}")]
    CyclicRecipe {
        /// Pages on the recursion path, ending with the repeated page
        path: Vec<PageId>,
    },

    /// A dose variant was requested against a page it does not belong to.
    #[error("Item {item} is not a variant of {page}")]
    PotionTypeMismatch {
        /// Requested item
        item: ItemId,
        /// Page it was requested against
        page: PageId,
    },

    /// The page has no recipes and cannot be planned.
    #[error("{page} has no recipes")]
    NotCraftable {
        /// Page without recipes
        page: PageId,
    },

    /// Item ID missing from the catalog
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// Page ID missing from the catalog
    #[error("Unknown page: {0}")]
    UnknownPage(PageId),
}

/// Catalog validation errors, raised once while the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two items share an ID
    #[error("Duplicate item ID: {0}")]
    DuplicateItem(ItemId),

    /// A potion variant declares zero doses
    #[error("Item {0} has zero doses")]
    ZeroDoses(ItemId),

    /// Two pages share an ID
    #[error("Duplicate page ID: {0}")]
    DuplicatePage(PageId),

    /// An item belongs to a page that does not exist
    #[error("Item {item} references missing page {page}")]
    MissingPage {
        /// Offending item
        item: ItemId,
        /// Page it points at
        page: PageId,
    },

    /// A recipe input or output points at an item that does not exist
    #[error("Recipe {recipe:?} on {page} references missing item {item}")]
    MissingItem {
        /// Page owning the recipe
        page: PageId,
        /// Recipe name
        recipe: String,
        /// Item it points at
        item: ItemId,
    },

    /// A recipe produces an item from another page
    #[error("Recipe {recipe:?} on {page} produces {item}, which belongs to another page")]
    ForeignOutput {
        /// Page owning the recipe
        page: PageId,
        /// Recipe name
        recipe: String,
        /// Output item
        item: ItemId,
    },

    /// Structural problem with a single recipe
    #[error("Invalid recipe {recipe:?} on {page}: {reason}")]
    InvalidRecipe {
        /// Page owning the recipe
        page: PageId,
        /// Recipe name
        recipe: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type alias for plan resolution.
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Result type alias for catalog construction.
pub type CatalogResult<T> = Result<T, CatalogError>;
