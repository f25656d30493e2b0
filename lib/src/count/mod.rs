//! Piece counter - inventory, category totals, and cost estimates.
//!
//! Aggregates placed bricks (plus the mandatory baseplate) into
//! per-(part, color) quantities, category and color totals, and an
//! estimated cost. Unknown part identifiers fall back to a generic
//! descriptor and a default unit price rather than failing.

use crate::catalog::{BaseplateSpec, BrickCatalog, ColorPalette, PartCategory};
use crate::pack::Manifest;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Unit price assumed for parts missing from the catalog.
pub const DEFAULT_UNIT_PRICE: f64 = 0.05;

/// One line of the piece breakdown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub part_id: String,
    pub color: String,
    pub quantity: usize,
    pub display_name: String,
    pub color_name: String,
    /// Price contribution: unit price x quantity.
    pub price: f64,
}

/// Summary of all pieces in a build.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieceCount {
    /// Placed bricks plus the baseplate.
    pub total_pieces: usize,

    /// Unique (part, color) combinations, including the baseplate.
    pub total_unique: usize,

    /// Breakdown sorted by descending quantity, baseplate pinned first.
    pub breakdown: Vec<BreakdownEntry>,

    /// Piece totals per structural category.
    pub by_category: BTreeMap<String, usize>,

    /// Piece totals per color name.
    pub by_color: BTreeMap<String, usize>,

    /// Total estimated cost, rounded to cents.
    pub estimated_cost: f64,
}

/// Count all pieces in a manifest.
///
/// The baseplate is always the first breakdown entry regardless of the
/// quantity sort applied to the rest. Returns the part identifiers that
/// were missing from the catalog (deduplicated, sorted) so the caller can
/// surface them as warnings.
pub fn count_pieces(
    manifest: &Manifest,
    baseplate: &BaseplateSpec,
    catalog: &BrickCatalog,
    palette: &ColorPalette,
) -> (PieceCount, Vec<String>) {
    let mut quantities: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_color: BTreeMap<String, usize> = BTreeMap::new();
    let mut unknown_parts: BTreeSet<String> = BTreeSet::new();

    for brick in &manifest.bricks {
        *quantities
            .entry((brick.part_id.clone(), brick.color.clone()))
            .or_default() += 1;

        let category = match catalog.part(&brick.part_id) {
            Some(spec) => spec.category.to_string(),
            None => {
                unknown_parts.insert(brick.part_id.clone());
                "Other".to_string()
            }
        };
        *by_category.entry(category).or_default() += 1;
        *by_color.entry(palette.display_name(&brick.color)).or_default() += 1;
    }

    *by_category
        .entry(PartCategory::Baseplate.to_string())
        .or_default() += 1;
    *by_color
        .entry(palette.display_name(&baseplate.color))
        .or_default() += 1;

    let mut breakdown = vec![BreakdownEntry {
        part_id: baseplate.part_id.clone(),
        color: baseplate.color.clone(),
        quantity: 1,
        display_name: baseplate.display_name.clone(),
        color_name: palette.display_name(&baseplate.color),
        price: baseplate.unit_price,
    }];

    let mut brick_entries: Vec<BreakdownEntry> = quantities
        .iter()
        .map(|((part_id, color), &quantity)| {
            let (display_name, unit_price) = match catalog.part(part_id) {
                Some(spec) => (spec.display_name.clone(), spec.unit_price),
                None => (format!("Part {part_id}"), DEFAULT_UNIT_PRICE),
            };
            BreakdownEntry {
                part_id: part_id.clone(),
                color: color.clone(),
                quantity,
                display_name,
                color_name: palette.display_name(color),
                price: unit_price * quantity as f64,
            }
        })
        .collect();

    // Descending quantity; the BTreeMap source already orders ties by
    // (part id, color), and the sort is stable.
    brick_entries.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    breakdown.extend(brick_entries);

    let total_cost: f64 = breakdown.iter().map(|entry| entry.price).sum();

    let count = PieceCount {
        total_pieces: manifest.total_bricks + 1,
        total_unique: quantities.len() + 1,
        breakdown,
        by_category,
        by_color,
        estimated_cost: (total_cost * 100.0).round() / 100.0,
    };
    (count, unknown_parts.into_iter().collect())
}

/// Render a human-readable shopping list.
pub fn shopping_list(count: &PieceCount) -> String {
    let mut lines = Vec::new();
    lines.push("=".repeat(60));
    lines.push("SHOPPING LIST".to_string());
    lines.push("=".repeat(60));
    lines.push(format!("Total pieces:        {}", count.total_pieces));
    lines.push(format!("Unique piece types:  {}", count.total_unique));
    lines.push(format!("Estimated cost:      ${:.2}", count.estimated_cost));
    lines.push(String::new());

    lines.push("By category:".to_string());
    for (category, total) in &count.by_category {
        lines.push(format!("  {category}: {total}"));
    }
    lines.push(String::new());

    lines.push(format!(
        "{:<10} {:<24} {:<16} {:>5} {:>8}",
        "Part", "Name", "Color", "Qty", "Price"
    ));
    lines.push("-".repeat(60));
    for entry in &count.breakdown {
        lines.push(format!(
            "{:<10} {:<24} {:<16} {:>5} {:>8}",
            entry.part_id,
            entry.display_name,
            entry.color_name,
            entry.quantity,
            format!("${:.2}", entry.price)
        ));
    }
    lines.push("-".repeat(60));
    lines.push(format!("TOTAL: ${:.2}", count.estimated_cost));

    lines.join("\n")
}

/// Render the breakdown as CSV for spreadsheet import.
pub fn inventory_csv(count: &PieceCount) -> String {
    let mut lines = vec!["part_id,display_name,color,color_name,quantity,price".to_string()];
    for entry in &count.breakdown {
        lines.push(format!(
            "{},\"{}\",{},\"{}\",{},{:.2}",
            entry.part_id,
            entry.display_name,
            entry.color,
            entry.color_name,
            entry.quantity,
            entry.price
        ));
    }
    lines.join("\n")
}
