//! Greedy packer - covers occupancy layers with brick placements.
//!
//! Each layer is covered independently by scanning the catalog in
//! descending footprint-area order and placing the first shape that fits a
//! uniform-color rectangle of unplaced cells, largest shapes first. The
//! cover is approximate and non-backtracking: it guarantees a correct,
//! deterministic, terminating cover, not a minimum brick count.
//!
//! Determinism follows from the fixed catalog order and the fixed
//! row-major anchor scan (ascending y, then ascending x); identical input
//! always yields an identical placement sequence.

use crate::catalog::{BrickCatalog, BrickSpec};
use crate::voxel::{OccupancyLayer, VoxelGrid};
use crate::{Coord, Result};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Brick rotation. Only 0 and 90 degrees are used: a rectangle rotated by
/// 180 or 270 degrees covers the same cells as one of these two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    R0,
    R90,
}

impl Rotation {
    /// The rotation angle in degrees.
    #[inline]
    pub fn degrees(&self) -> u32 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
        }
    }
}

impl Serialize for Rotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.degrees())
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// One voxel cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl Cell {
    pub fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A brick placed in the final manifest.
///
/// The covered-cell set is always a contiguous rectangle of one uniform
/// color; no two placed bricks share a cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedBrick {
    /// Part identifier from the catalog.
    pub part_id: String,

    /// Anchor position: the minimum-x, minimum-y cell of the footprint.
    pub position: Cell,

    /// Applied rotation.
    pub rotation: Rotation,

    /// Color token shared by every covered cell.
    pub color: String,

    /// Exact set of cells this brick covers, in row-major order.
    pub covered_cells: Vec<Cell>,
}

impl PlacedBrick {
    /// Footprint area in cells.
    pub fn area(&self) -> usize {
        self.covered_cells.len()
    }
}

/// The full ordered list of placed bricks for a build.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Manifest {
    pub bricks: Vec<PlacedBrick>,
    pub total_bricks: usize,
}

impl Manifest {
    /// Sum of all brick footprint areas; equals the normalized voxel count.
    pub fn covered_cell_count(&self) -> usize {
        self.bricks.iter().map(PlacedBrick::area).sum()
    }
}

/// Candidate placement found during an anchor scan.
struct Placement {
    x: Coord,
    y: Coord,
    width: Coord,
    depth: Coord,
    rotation: Rotation,
    color: String,
}

/// The greedy packing engine.
///
/// Holds a reference to the immutable catalog; all per-build state is
/// local to [`GreedyPacker::pack`], so one packer can serve any number of
/// concurrent builds.
pub struct GreedyPacker<'a> {
    catalog: &'a BrickCatalog,
}

impl<'a> GreedyPacker<'a> {
    /// Create a packer over the given catalog.
    pub fn new(catalog: &'a BrickCatalog) -> Self {
        Self { catalog }
    }

    /// Cover every layer of the grid with brick placements.
    ///
    /// Refuses to run if the catalog fails the shape preconditions (a
    /// 1x1 terminal shape and strictly positive footprints), since
    /// termination with full coverage could not be guaranteed. Layers are
    /// packed in ascending z order so the manifest ordering is stable.
    pub fn pack(&self, grid: &VoxelGrid) -> Result<Manifest> {
        self.catalog.validate_shapes()?;

        let mut bricks = Vec::new();
        for layer in grid.layers() {
            let placed = self.pack_layer(layer);
            debug!(z = layer.z(), cells = layer.len(), bricks = placed.len(), "packed layer");
            bricks.extend(placed);
        }

        let total_bricks = bricks.len();
        Ok(Manifest {
            bricks,
            total_bricks,
        })
    }

    /// Cover a single layer.
    ///
    /// The unplaced set is keyed (y, x) so its iteration order is the
    /// row-major anchor scan order. After every successful placement the
    /// scan restarts from the beginning of the set.
    fn pack_layer(&self, layer: &OccupancyLayer) -> Vec<PlacedBrick> {
        let mut unplaced: BTreeSet<(Coord, Coord)> =
            layer.cells().map(|((x, y), _)| (y, x)).collect();
        let mut placed = Vec::new();

        for spec in self.catalog.bricks() {
            while let Some(p) = find_placement(layer, &unplaced, spec) {
                for cell in rect_cells(p.x, p.y, p.width, p.depth) {
                    unplaced.remove(&cell);
                }
                placed.push(PlacedBrick {
                    part_id: spec.part_id.clone(),
                    position: Cell::new(p.x, p.y, layer.z()),
                    rotation: p.rotation,
                    color: p.color,
                    covered_cells: rect_cells(p.x, p.y, p.width, p.depth)
                        .map(|(y, x)| Cell::new(x, y, layer.z()))
                        .collect(),
                });
            }
            if unplaced.is_empty() {
                break;
            }
        }

        placed
    }
}

/// Find the first anchor (row-major) where the shape fits, trying the
/// unrotated w x d rectangle before the rotated d x w one.
fn find_placement(
    layer: &OccupancyLayer,
    unplaced: &BTreeSet<(Coord, Coord)>,
    spec: &BrickSpec,
) -> Option<Placement> {
    for &(y, x) in unplaced {
        let Some(color) = layer.color_at(x, y) else {
            continue;
        };

        let orientations: [(Coord, Coord, Rotation); 2] = [
            (spec.width, spec.depth, Rotation::R0),
            (spec.depth, spec.width, Rotation::R90),
        ];
        let tries = if spec.width == spec.depth { 1 } else { 2 };

        for &(width, depth, rotation) in &orientations[..tries] {
            if rect_fits(layer, unplaced, x, y, width, depth, color) {
                return Some(Placement {
                    x,
                    y,
                    width,
                    depth,
                    rotation,
                    color: color.to_string(),
                });
            }
        }
    }
    None
}

/// Whether the width x depth rectangle anchored at (x, y) lies entirely
/// within unplaced cells of the anchor's color.
fn rect_fits(
    layer: &OccupancyLayer,
    unplaced: &BTreeSet<(Coord, Coord)>,
    x: Coord,
    y: Coord,
    width: Coord,
    depth: Coord,
    color: &str,
) -> bool {
    rect_cells(x, y, width, depth)
        .all(|(cy, cx)| unplaced.contains(&(cy, cx)) && layer.color_at(cx, cy) == Some(color))
}

/// The (y, x) keys of a width x depth rectangle anchored at (x, y), in
/// row-major order.
fn rect_cells(
    x: Coord,
    y: Coord,
    width: Coord,
    depth: Coord,
) -> impl Iterator<Item = (Coord, Coord)> {
    (0..depth).flat_map(move |dy| (0..width).map(move |dx| (y + dy, x + dx)))
}
