//! 2D footprint geometry over stud coordinates.
//!
//! Provides the axis-aligned bounding rectangle used by the baseplate
//! selector to measure the x/y extent of a build.

use crate::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned bounding rectangle over occupied stud cells.
///
/// Unlike a continuous bounding box, the extents are inclusive cell
/// coordinates: a footprint covering a single cell has width and depth 1.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub min_x: Coord,
    pub min_y: Coord,
    pub max_x: Coord,
    pub max_y: Coord,
    defined: bool,
}

impl Footprint {
    /// Create a new empty (undefined) footprint.
    #[inline]
    pub fn new() -> Self {
        Self {
            min_x: Coord::MAX,
            min_y: Coord::MAX,
            max_x: Coord::MIN,
            max_y: Coord::MIN,
            defined: false,
        }
    }

    /// Create a footprint from an iterator of (x, y) cell coordinates.
    pub fn from_cells(cells: impl IntoIterator<Item = (Coord, Coord)>) -> Self {
        let mut fp = Self::new();
        for (x, y) in cells {
            fp.merge_cell(x, y);
        }
        fp
    }

    /// Check if the footprint has been merged with at least one cell.
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    /// Merge a cell into the footprint.
    pub fn merge_cell(&mut self, x: Coord, y: Coord) {
        if self.defined {
            self.min_x = self.min_x.min(x);
            self.min_y = self.min_y.min(y);
            self.max_x = self.max_x.max(x);
            self.max_y = self.max_y.max(y);
        } else {
            self.min_x = x;
            self.min_y = y;
            self.max_x = x;
            self.max_y = y;
            self.defined = true;
        }
    }

    /// Width in cells (x extent), or 0 if undefined.
    #[inline]
    pub fn width(&self) -> Coord {
        if self.defined {
            self.max_x - self.min_x + 1
        } else {
            0
        }
    }

    /// Depth in cells (y extent), or 0 if undefined.
    #[inline]
    pub fn depth(&self) -> Coord {
        if self.defined {
            self.max_y - self.min_y + 1
        } else {
            0
        }
    }

    /// Area in cells, or 0 if undefined.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.depth() as i64
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.defined {
            write!(
                f,
                "Footprint({}..{}, {}..{}, {}x{})",
                self.min_x,
                self.max_x,
                self.min_y,
                self.max_y,
                self.width(),
                self.depth()
            )
        } else {
            write!(f, "Footprint(undefined)")
        }
    }
}
