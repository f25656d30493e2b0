//! brickplan - Voxel-to-brick build planning engine.
//!
//! Converts an unordered set of unit-colored voxel cells into a
//! non-overlapping covering of rectangular bricks, then sequences that
//! covering into an ordered, human-followable build plan with inventory
//! and difficulty/time estimates.
//!
//! The pipeline flows strictly forward:
//!
//! ```text
//! raw cells -> normalized layers -> placements -> {baseplate, counts} -> ordered plan
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use brickplan::{BuildEngine, BuildRequest};
//! use brickplan::catalog::{BrickCatalog, ColorPalette};
//!
//! let catalog = BrickCatalog::from_file("data/catalog.json")?;
//! let palette = ColorPalette::from_file("data/palette.json")?;
//!
//! let engine = BuildEngine::new(catalog, palette)?;
//! let result = engine.build(&BuildRequest::new("My Castle", cells))?;
//!
//! println!("{}", result.manual.total_steps);
//! ```

pub mod baseplate;
pub mod build;
pub mod catalog;
pub mod count;
pub mod geometry;
pub mod pack;
pub mod plan;
pub mod voxel;

/// Integer grid coordinate, in stud units.
pub type Coord = i32;

/// Error type for build engine operations.
///
/// Only configuration faults are fatal; malformed input cells and unknown
/// part identifiers are recovered locally and surfaced as warnings on the
/// build result instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The supplied catalog cannot support a build (e.g. no 1x1 terminal
    /// shape, or no baseplate sizes configured).
    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use build::{BuildEngine, BuildRequest, BuildResult, BuildWarning};
pub use catalog::{BrickCatalog, BrickSpec, ColorPalette};
pub use pack::{Manifest, PlacedBrick};
pub use plan::InstructionManual;
pub use voxel::RawCell;
