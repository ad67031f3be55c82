//! Human-readable and JSON views of a plan.

use herblore_calc::catalog::Catalog;
use herblore_calc::resolver::Resolution;
use herblore_common::ItemId;
use serde::Serialize;
use std::fmt::Write;

/// One material line of a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialLine {
    /// Item identifier
    pub item_id: u32,
    /// Item name, or the ID when the catalog does not know it
    pub name: String,
    /// Quantity still needed
    pub quantity: u64,
    /// Whether no recipe produces the item
    pub base: bool,
}

/// A resolved plan with names filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    /// Target item name
    pub target: String,
    /// Target quantity to produce
    pub quantity: u64,
    /// Materials, base materials first, then by name
    pub materials: Vec<MaterialLine>,
    /// Total experience
    pub exp: f64,
    /// Total ticks
    pub ticks: f64,
    /// Total time in seconds
    pub seconds: f64,
    /// Experience per hour
    pub exp_per_hour: f64,
    /// Inventory loads
    pub inventories: u64,
    /// Craft operations
    pub operations: u64,
}

fn item_name(catalog: &Catalog, id: ItemId) -> String {
    catalog
        .item(id)
        .map_or_else(|| id.to_string(), |item| item.name.clone())
}

impl PlanReport {
    /// Builds the report for a resolution.
    #[must_use]
    pub fn new(catalog: &Catalog, resolution: &Resolution) -> Self {
        let mut materials: Vec<MaterialLine> = resolution
            .materials
            .iter()
            .map(|(&id, &quantity)| MaterialLine {
                item_id: id.raw(),
                name: item_name(catalog, id),
                quantity,
                base: catalog
                    .item(id)
                    .is_some_and(|item| catalog.recipes_for(item).is_empty()),
            })
            .collect();
        materials.sort_by(|a, b| b.base.cmp(&a.base).then_with(|| a.name.cmp(&b.name)));

        Self {
            target: resolution
                .target
                .map_or_else(String::new, |id| item_name(catalog, id)),
            quantity: resolution.target_quantity,
            materials,
            exp: resolution.exp,
            ticks: resolution.ticks,
            seconds: resolution.duration().as_secs_f64(),
            exp_per_hour: resolution.exp_per_hour(),
            inventories: resolution.inventories,
            operations: resolution.operations,
        }
    }

    /// Renders the plan as plain text.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} x {}", self.quantity, self.target);

        if self.materials.is_empty() {
            let _ = writeln!(out, "  nothing to gather");
        }
        for line in &self.materials {
            let kind = if line.base { "buy " } else { "make" };
            let _ = writeln!(out, "  {kind} {:>8} {}", line.quantity, line.name);
        }

        let _ = writeln!(
            out,
            "exp: {:.1}  ticks: {:.1}  time: {}  exp/h: {:.2}",
            self.exp,
            self.ticks,
            format_duration(self.seconds),
            self.exp_per_hour
        );
        let _ = writeln!(
            out,
            "operations: {}  inventories: {}",
            self.operations, self.inventories
        );
        out
    }
}

/// Formats seconds as `1h 02m 03s`, dropping leading zero units.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, total / 60 % 60, total % 60);

    if hours > 0 {
        format!("{hours}h {minutes:02}m {secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs:02}s")
    } else {
        format!("{secs}s")
    }
}
