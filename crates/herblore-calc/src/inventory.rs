//! Owned-stock offsetting.
//!
//! Owned items are normalised to dose-equivalents per page so that, for
//! example, banked 4-dose potions can cover a request for 3-dose potions.
//! Stock is only ever consumed during one resolution.

use herblore_common::{ItemId, PageId};
use std::collections::BTreeMap;
use std::ops::AddAssign;
use tracing::{trace, warn};

use crate::catalog::{Catalog, Item};

/// Caller-supplied snapshot of owned items.
pub type OwnedInventory = BTreeMap<ItemId, u64>;

/// Ordered map whose missing entries read as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Counter<K, V = f64> {
    entries: BTreeMap<K, V>,
}

impl<K, V> Default for Counter<K, V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V: Copy + Default + AddAssign> Counter<K, V> {
    /// Creates an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to `key`, initialising it to zero first. Returns the new
    /// total.
    pub fn add(&mut self, key: K, delta: V) -> V {
        let entry = self.entries.entry(key).or_default();
        *entry += delta;
        *entry
    }

    /// Current value for `key`, zero when absent.
    #[must_use]
    pub fn get(&self, key: &K) -> V {
        self.entries.get(key).copied().unwrap_or_default()
    }

    /// Overwrites the value for `key`.
    pub fn set(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Number of keys with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Consumes the counter, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<K, V> {
        self.entries
    }
}

/// Per-resolution view of owned stock, in dose-equivalents per page.
#[derive(Debug, Clone, Default)]
pub struct InventoryOffset {
    buckets: Counter<PageId>,
}

impl InventoryOffset {
    /// Creates a tracker with no stock.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the per-page buckets from an owned-items snapshot. Items missing
    /// from the catalog are skipped.
    #[must_use]
    pub fn new(catalog: &Catalog, owned: &OwnedInventory) -> Self {
        let mut buckets = Counter::new();

        for (&id, &quantity) in owned {
            let Some(item) = catalog.item(id) else {
                warn!("Skipping owned {id}: not in catalog");
                continue;
            };
            buckets.add(item.page, f64::from(item.dose_count()) * quantity as f64);
        }

        Self { buckets }
    }

    /// Dose-equivalents left for a page.
    #[must_use]
    pub fn available(&self, page: PageId) -> f64 {
        self.buckets.get(&page)
    }

    /// Takes up to `needed` dose-equivalents of `page` and returns the part
    /// that stock could not cover. Non-positive requests are returned as-is.
    pub fn take(&mut self, page: PageId, needed: f64) -> f64 {
        if needed <= 0.0 {
            return needed;
        }

        let available = self.buckets.get(&page);
        let taken = needed.min(available).max(0.0);
        if taken > 0.0 {
            self.buckets.set(page, available - taken);
            trace!("Offset {taken} of {needed} doses on {page}");
        }

        needed - taken
    }

    /// Takes `needed` of an item, converting through doses. The shortfall is
    /// returned in item quantity and may be fractional: 2 three-dose potions
    /// against 5 owned doses leaves 1/3 of a potion.
    pub fn take_item(&mut self, item: &Item, needed: f64) -> f64 {
        let doses = f64::from(item.dose_count());
        self.take(item.page, doses * needed) / doses
    }

    /// Overrides a page's bucket.
    pub fn set_bucket(&mut self, page: PageId, value: f64) {
        self.buckets.set(page, value);
    }
}
