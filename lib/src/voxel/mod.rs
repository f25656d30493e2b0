//! Voxel input and grid normalization.
//!
//! Ingests raw voxel cells from an upstream voxelization collaborator,
//! deduplicates them by coordinate, and organizes them into per-height
//! layers of 2D occupancy+color maps. Malformed cells are dropped and
//! recorded as validation faults; normalization never fails.

use crate::catalog::ColorPalette;
use crate::Coord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A raw voxel cell as received from upstream.
///
/// Coordinates arrive as JSON numbers and may be non-integral; the
/// normalizer rejects those as validation faults rather than rounding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: String,
}

impl RawCell {
    pub fn new(x: f64, y: f64, z: f64, color: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            color: color.into(),
        }
    }
}

/// A normalized voxel cell at an integer grid coordinate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelCell {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
    pub color: String,
}

/// A cell dropped during normalization, with the reason.
///
/// Faults are non-fatal: the build continues without the offending cell
/// and the fault is reported alongside the result.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationFault {
    #[error("cell {index}: coordinate {axis}={value} is not an integer")]
    NonIntegerCoordinate { index: usize, axis: char, value: f64 },

    #[error("cell {index}: coordinate {axis}={value} is out of grid range")]
    CoordinateOutOfRange { index: usize, axis: char, value: f64 },

    #[error("cell {index}: unrecognized color token {token:?}")]
    UnknownColor { index: usize, token: String },
}

/// All occupied cells at one height, keyed for row-major scanning.
///
/// The map key is (y, x) so that iteration order is ascending y, then
/// ascending x: exactly the packer's anchor scan order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupancyLayer {
    z: Coord,
    cells: BTreeMap<(Coord, Coord), String>,
}

impl OccupancyLayer {
    /// Create an empty layer at the given height.
    pub fn new(z: Coord) -> Self {
        Self {
            z,
            cells: BTreeMap::new(),
        }
    }

    /// The height of this layer.
    #[inline]
    pub fn z(&self) -> Coord {
        self.z
    }

    /// Number of occupied cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the layer has no occupied cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Set the color at (x, y), overwriting any previous occupant.
    pub fn insert(&mut self, x: Coord, y: Coord, color: String) {
        self.cells.insert((y, x), color);
    }

    /// The color at (x, y), if occupied.
    pub fn color_at(&self, x: Coord, y: Coord) -> Option<&str> {
        self.cells.get(&(y, x)).map(String::as_str)
    }

    /// Occupied cells in row-major scan order (ascending y, then x),
    /// yielded as ((x, y), color).
    pub fn cells(&self) -> impl Iterator<Item = ((Coord, Coord), &str)> {
        self.cells
            .iter()
            .map(|(&(y, x), color)| ((x, y), color.as_str()))
    }
}

/// The normalized voxel field: layers sorted ascending by height.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VoxelGrid {
    layers: Vec<OccupancyLayer>,
}

impl VoxelGrid {
    /// Layers in ascending z order.
    #[inline]
    pub fn layers(&self) -> &[OccupancyLayer] {
        &self.layers
    }

    /// Number of occupied layers.
    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Total occupied cell count across all layers.
    pub fn cell_count(&self) -> usize {
        self.layers.iter().map(OccupancyLayer::len).sum()
    }

    /// Whether the grid contains no cells.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Every normalized cell, ascending by layer and then in row-major
    /// scan order within each layer.
    pub fn cells(&self) -> impl Iterator<Item = VoxelCell> + '_ {
        self.layers.iter().flat_map(|layer| {
            let z = layer.z();
            layer.cells().map(move |((x, y), color)| VoxelCell {
                x,
                y,
                z,
                color: color.to_string(),
            })
        })
    }
}

/// Normalize raw cells into per-height layers.
///
/// Lenient: cells with non-integral or out-of-range coordinates, or with
/// color tokens absent from the palette, are dropped and recorded as
/// faults. Duplicate coordinates resolve to the last occurrence in input
/// order. An empty input yields zero layers.
pub fn normalize(cells: &[RawCell], palette: &ColorPalette) -> (VoxelGrid, Vec<ValidationFault>) {
    let mut faults = Vec::new();
    let mut by_z: BTreeMap<Coord, OccupancyLayer> = BTreeMap::new();

    'cells: for (index, cell) in cells.iter().enumerate() {
        let mut coords = [0 as Coord; 3];
        for (slot, (axis, value)) in
            coords
                .iter_mut()
                .zip([('x', cell.x), ('y', cell.y), ('z', cell.z)])
        {
            match check_coordinate(index, axis, value) {
                Ok(v) => *slot = v,
                Err(fault) => {
                    faults.push(fault);
                    continue 'cells;
                }
            }
        }
        let [x, y, z] = coords;

        if !palette.contains(&cell.color) {
            faults.push(ValidationFault::UnknownColor {
                index,
                token: cell.color.clone(),
            });
            continue;
        }
        let color = ColorPalette::normalize_token(&cell.color);

        by_z
            .entry(z)
            .or_insert_with(|| OccupancyLayer::new(z))
            .insert(x, y, color);
    }

    let grid = VoxelGrid {
        layers: by_z.into_values().collect(),
    };
    (grid, faults)
}

fn check_coordinate(index: usize, axis: char, value: f64) -> Result<Coord, ValidationFault> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(ValidationFault::NonIntegerCoordinate { index, axis, value });
    }
    if value < Coord::MIN as f64 || value > Coord::MAX as f64 {
        return Err(ValidationFault::CoordinateOutOfRange { index, axis, value });
    }
    Ok(value as Coord)
}
