//! Baseplate selector.
//!
//! Computes the x/y bounding footprint of all placed bricks and chooses
//! the smallest catalog baseplate that contains it plus a fixed margin.

use crate::catalog::{BaseplateSpec, BrickCatalog};
use crate::geometry::Footprint;
use crate::pack::Manifest;
use crate::{Coord, Error, Result};

/// Padding added to each footprint dimension before sizing, in studs.
pub const BASEPLATE_MARGIN: Coord = 2;

/// Select the baseplate for a build.
///
/// Chooses the smallest catalog size that is at least the padded footprint
/// maximum; if no configured size is large enough, over-provisions with the
/// largest available size rather than failing. An empty build returns the
/// smallest catalog baseplate.
pub fn select_baseplate<'a>(
    manifest: &Manifest,
    catalog: &'a BrickCatalog,
) -> Result<&'a BaseplateSpec> {
    let no_baseplates = || Error::Catalog("catalog has no baseplate sizes".into());

    let footprint = build_footprint(manifest);
    if !footprint.is_defined() {
        return catalog.smallest_baseplate().ok_or_else(no_baseplates);
    }

    let required = (footprint.width() + BASEPLATE_MARGIN).max(footprint.depth() + BASEPLATE_MARGIN);
    catalog
        .baseplates()
        .iter()
        .find(|plate| plate.size >= required)
        .or_else(|| catalog.largest_baseplate())
        .ok_or_else(no_baseplates)
}

/// The x/y bounding footprint of every placed brick, across all layers.
pub fn build_footprint(manifest: &Manifest) -> Footprint {
    Footprint::from_cells(
        manifest
            .bricks
            .iter()
            .flat_map(|brick| brick.covered_cells.iter().map(|cell| (cell.x, cell.y))),
    )
}
