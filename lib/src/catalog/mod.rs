//! Brick catalog configuration.
//!
//! The catalog is immutable configuration data supplied by an external
//! catalog collaborator: a priority-ordered table of brick shapes plus an
//! ascending table of baseplate sizes. The engine never embeds catalog
//! values itself; tests and callers construct catalogs explicitly or load
//! them from JSON.
//!
//! Catalog ordering *is* the placement priority: bricks are kept sorted by
//! descending footprint area, with ties broken by declaration order.

mod palette;

pub use palette::{ColorEntry, ColorPalette};

use crate::{Coord, Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Structural category of a catalog part.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartCategory {
    Brick,
    Plate,
    Tile,
    Baseplate,
}

impl fmt::Display for PartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartCategory::Brick => "Brick",
            PartCategory::Plate => "Plate",
            PartCategory::Tile => "Tile",
            PartCategory::Baseplate => "Baseplate",
        };
        write!(f, "{name}")
    }
}

/// A catalog entry for one brick shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BrickSpec {
    /// Stable part identifier (e.g. "3001").
    pub part_id: String,

    /// Footprint width in studs.
    pub width: Coord,

    /// Footprint depth in studs.
    pub depth: Coord,

    /// Structural category.
    pub category: PartCategory,

    /// Unit price estimate.
    pub unit_price: f64,

    /// Human-readable name (e.g. "Brick 2x4").
    pub display_name: String,
}

impl BrickSpec {
    /// Footprint area in studs.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width as i64 * self.depth as i64
    }

    /// Whether this is the 1x1 terminal shape the packer needs to
    /// guarantee termination.
    #[inline]
    pub fn is_unit(&self) -> bool {
        self.width == 1 && self.depth == 1
    }
}

/// A catalog entry for one square baseplate size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseplateSpec {
    /// Stable part identifier (e.g. "3811").
    pub part_id: String,

    /// Side length in studs (baseplates are square).
    pub size: Coord,

    /// Color token of the baseplate as stocked.
    pub color: String,

    /// Unit price estimate.
    pub unit_price: f64,

    /// Human-readable name (e.g. "Baseplate 32x32").
    pub display_name: String,
}

/// On-disk catalog representation.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    bricks: Vec<BrickSpec>,
    baseplates: Vec<BaseplateSpec>,
}

/// The priority-ordered brick catalog.
///
/// Construction sorts bricks by descending footprint area (stable, so
/// declaration order breaks ties) and baseplates by ascending size. The
/// catalog is immutable after construction so that identical catalogs
/// always drive identical placements.
#[derive(Clone, Debug)]
pub struct BrickCatalog {
    bricks: Vec<BrickSpec>,
    baseplates: Vec<BaseplateSpec>,
    by_part: FxHashMap<String, usize>,
}

impl BrickCatalog {
    /// Create a catalog from brick and baseplate tables.
    pub fn new(mut bricks: Vec<BrickSpec>, mut baseplates: Vec<BaseplateSpec>) -> Self {
        bricks.sort_by(|a, b| b.area().cmp(&a.area()));
        baseplates.sort_by(|a, b| a.size.cmp(&b.size));
        let by_part = bricks
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.part_id.clone(), i))
            .collect();
        Self {
            bricks,
            baseplates,
            by_part,
        }
    }

    /// Load a catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.bricks, file.baseplates))
    }

    /// Load a catalog from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Validate the shape table alone: the packer's preconditions.
    ///
    /// Returns a configuration fault if any brick has a non-positive
    /// footprint (a degenerate rectangle covers no cells, so placing it
    /// would never shrink the unplaced set) or if the catalog lacks the
    /// 1x1 terminal shape.
    pub fn validate_shapes(&self) -> Result<()> {
        if let Some(spec) = self.bricks.iter().find(|s| s.width < 1 || s.depth < 1) {
            return Err(Error::Catalog(format!(
                "brick {} has a non-positive footprint ({}x{})",
                spec.part_id, spec.width, spec.depth
            )));
        }
        if !self.has_unit_brick() {
            return Err(Error::Catalog(
                "catalog has no 1x1 shape; the packer cannot guarantee termination".into(),
            ));
        }
        Ok(())
    }

    /// Validate that the catalog can support a build.
    ///
    /// Checks the shape preconditions plus the presence of at least one
    /// baseplate size.
    pub fn validate(&self) -> Result<()> {
        self.validate_shapes()?;
        if self.baseplates.is_empty() {
            return Err(Error::Catalog("catalog has no baseplate sizes".into()));
        }
        Ok(())
    }

    /// Bricks in placement priority order (descending footprint area).
    #[inline]
    pub fn bricks(&self) -> &[BrickSpec] {
        &self.bricks
    }

    /// Baseplates in ascending size order.
    #[inline]
    pub fn baseplates(&self) -> &[BaseplateSpec] {
        &self.baseplates
    }

    /// Look up a brick spec by part identifier.
    pub fn part(&self, part_id: &str) -> Option<&BrickSpec> {
        self.by_part.get(part_id).map(|&i| &self.bricks[i])
    }

    /// Whether the catalog contains a 1x1 shape.
    pub fn has_unit_brick(&self) -> bool {
        self.bricks.iter().any(BrickSpec::is_unit)
    }

    /// The smallest configured baseplate, if any.
    pub fn smallest_baseplate(&self) -> Option<&BaseplateSpec> {
        self.baseplates.first()
    }

    /// The largest configured baseplate, if any.
    pub fn largest_baseplate(&self) -> Option<&BaseplateSpec> {
        self.baseplates.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick(part_id: &str, width: Coord, depth: Coord) -> BrickSpec {
        BrickSpec {
            part_id: part_id.into(),
            width,
            depth,
            category: PartCategory::Brick,
            unit_price: 0.05,
            display_name: format!("Brick {depth}x{width}"),
        }
    }

    fn baseplate(part_id: &str, size: Coord) -> BaseplateSpec {
        BaseplateSpec {
            part_id: part_id.into(),
            size,
            color: "#9BA19D".into(),
            unit_price: 5.0,
            display_name: format!("Baseplate {size}x{size}"),
        }
    }

    #[test]
    fn test_bricks_sorted_by_descending_area() {
        let catalog = BrickCatalog::new(
            vec![brick("3005", 1, 1), brick("3001", 4, 2), brick("3004", 2, 1)],
            vec![baseplate("3811", 32)],
        );
        let areas: Vec<i64> = catalog.bricks().iter().map(BrickSpec::area).collect();
        assert_eq!(areas, vec![8, 2, 1]);
    }

    #[test]
    fn test_area_ties_keep_declaration_order() {
        // 2x4 and 4x2 have equal area; 1x8 too. Declaration order must win.
        let catalog = BrickCatalog::new(
            vec![
                brick("a", 4, 2),
                brick("b", 2, 4),
                brick("c", 8, 1),
                brick("unit", 1, 1),
            ],
            vec![baseplate("3811", 32)],
        );
        let ids: Vec<&str> = catalog
            .bricks()
            .iter()
            .map(|s| s.part_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c", "unit"]);
    }

    #[test]
    fn test_baseplates_sorted_ascending() {
        let catalog = BrickCatalog::new(
            vec![brick("3005", 1, 1)],
            vec![baseplate("4186", 48), baseplate("3867", 16), baseplate("3811", 32)],
        );
        let sizes: Vec<Coord> = catalog.baseplates().iter().map(|b| b.size).collect();
        assert_eq!(sizes, vec![16, 32, 48]);
        assert_eq!(catalog.smallest_baseplate().unwrap().size, 16);
        assert_eq!(catalog.largest_baseplate().unwrap().size, 48);
    }

    #[test]
    fn test_validate_requires_unit_brick() {
        let catalog = BrickCatalog::new(vec![brick("3001", 4, 2)], vec![baseplate("3811", 32)]);
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("1x1"));
    }

    #[test]
    fn test_validate_rejects_non_positive_footprints() {
        // A negative pair still has positive area and would sort ahead of
        // the 1x1, yet its rectangle covers no cells.
        let catalog = BrickCatalog::new(
            vec![brick("bad", -2, -3), brick("3005", 1, 1)],
            vec![baseplate("3811", 32)],
        );
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("non-positive footprint"));

        let catalog = BrickCatalog::new(
            vec![brick("flat", 0, 2), brick("3005", 1, 1)],
            vec![baseplate("3811", 32)],
        );
        assert!(catalog.validate_shapes().is_err());
    }

    #[test]
    fn test_validate_requires_baseplates() {
        let catalog = BrickCatalog::new(vec![brick("3005", 1, 1)], vec![]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_part_lookup() {
        let catalog = BrickCatalog::new(
            vec![brick("3005", 1, 1), brick("3001", 4, 2)],
            vec![baseplate("3811", 32)],
        );
        assert_eq!(catalog.part("3001").unwrap().width, 4);
        assert!(catalog.part("9999").is_none());
    }

    #[test]
    fn test_from_json_str() {
        let json = r##"{
            "bricks": [
                {"part_id": "3005", "width": 1, "depth": 1, "category": "brick",
                 "unit_price": 0.03, "display_name": "Brick 1x1"},
                {"part_id": "3001", "width": 4, "depth": 2, "category": "brick",
                 "unit_price": 0.10, "display_name": "Brick 2x4"}
            ],
            "baseplates": [
                {"part_id": "3811", "size": 32, "color": "#9BA19D",
                 "unit_price": 7.99, "display_name": "Baseplate 32x32"}
            ]
        }"##;
        let catalog = BrickCatalog::from_json_str(json).unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.bricks()[0].part_id, "3001");
    }
}
