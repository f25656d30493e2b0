//! Build orchestration.
//!
//! `BuildEngine` wires the pipeline together: normalize the raw voxel
//! cells, pack each layer, select a baseplate, count pieces, and plan
//! the instruction sequence. Non-fatal conditions surface as warnings
//! on the result; only configuration faults abort a build.

use crate::baseplate::select_baseplate;
use crate::catalog::{BaseplateSpec, BrickCatalog, ColorPalette};
use crate::count::{count_pieces, PieceCount};
use crate::pack::{GreedyPacker, Manifest};
use crate::plan::{generate_manual, InstructionManual};
use crate::voxel::{normalize, RawCell, ValidationFault};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A build request as received from the caller.
///
/// `project_name` and `category` are pass-through metadata; the engine
/// never interprets them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub project_name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub cells: Vec<RawCell>,
}

impl BuildRequest {
    pub fn new(project_name: impl Into<String>, cells: Vec<RawCell>) -> Self {
        Self {
            project_name: project_name.into(),
            category: None,
            cells,
        }
    }
}

/// A non-fatal condition encountered during a build.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BuildWarning {
    #[error("dropped cell: {0}")]
    InvalidCell(#[from] ValidationFault),

    #[error("part {part_id} is not in the catalog; priced at the default rate")]
    UnknownPart { part_id: String },
}

/// Everything a completed build produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildResult {
    pub project_name: String,
    pub category: Option<String>,
    pub manifest: Manifest,
    pub baseplate: BaseplateSpec,
    pub piece_count: PieceCount,
    pub manual: InstructionManual,
    #[serde(skip)]
    pub warnings: Vec<BuildWarning>,
}

/// External history store boundary.
///
/// The engine itself is stateless; callers that want a build history
/// inject an implementation and use [`BuildEngine::build_and_record`].
pub trait BuildRegistry {
    fn record(&mut self, result: &BuildResult) -> Result<()>;
}

/// A registry that keeps results in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    results: Vec<BuildResult>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[BuildResult] {
        &self.results
    }
}

impl BuildRegistry for InMemoryRegistry {
    fn record(&mut self, result: &BuildResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }
}

/// The full voxel-to-instructions pipeline.
pub struct BuildEngine {
    catalog: BrickCatalog,
    palette: ColorPalette,
}

impl BuildEngine {
    /// Create an engine over a catalog and color palette.
    ///
    /// Fails if the catalog cannot terminate packing (no 1x1 brick) or
    /// offers no baseplate sizes.
    pub fn new(catalog: BrickCatalog, palette: ColorPalette) -> Result<Self> {
        catalog.validate()?;
        Ok(Self { catalog, palette })
    }

    pub fn catalog(&self) -> &BrickCatalog {
        &self.catalog
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Run a build end to end.
    pub fn build(&self, request: &BuildRequest) -> Result<BuildResult> {
        info!(
            project = %request.project_name,
            cells = request.cells.len(),
            "starting build"
        );

        let (grid, faults) = normalize(&request.cells, &self.palette);
        let mut warnings: Vec<BuildWarning> = Vec::new();
        for fault in faults {
            warn!(%fault, "dropping invalid cell");
            warnings.push(fault.into());
        }

        let manifest = GreedyPacker::new(&self.catalog).pack(&grid)?;
        let baseplate = select_baseplate(&manifest, &self.catalog)?.clone();

        let (piece_count, unknown_parts) =
            count_pieces(&manifest, &baseplate, &self.catalog, &self.palette);
        for part_id in unknown_parts {
            warn!(%part_id, "part missing from catalog");
            warnings.push(BuildWarning::UnknownPart { part_id });
        }

        let manual = generate_manual(&manifest, &baseplate, &request.project_name);

        info!(
            project = %request.project_name,
            bricks = manifest.total_bricks,
            steps = manual.total_steps,
            baseplate = %baseplate.part_id,
            warnings = warnings.len(),
            "build complete"
        );

        Ok(BuildResult {
            project_name: request.project_name.clone(),
            category: request.category.clone(),
            manifest,
            baseplate,
            piece_count,
            manual,
            warnings,
        })
    }

    /// Run a build and record the result in the given registry.
    pub fn build_and_record(
        &self,
        request: &BuildRequest,
        registry: &mut dyn BuildRegistry,
    ) -> Result<BuildResult> {
        let result = self.build(request)?;
        registry.record(&result)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Difficulty;

    const CATALOG_JSON: &str = r##"{
        "bricks": [
            {"part_id": "3003", "width": 2, "depth": 2, "category": "brick",
             "unit_price": 0.06, "display_name": "Brick 2x2"},
            {"part_id": "3004", "width": 2, "depth": 1, "category": "brick",
             "unit_price": 0.04, "display_name": "Brick 2x1"},
            {"part_id": "3005", "width": 1, "depth": 1, "category": "brick",
             "unit_price": 0.03, "display_name": "Brick 1x1"}
        ],
        "baseplates": [
            {"part_id": "3867", "size": 16, "color": "#9BA19D",
             "unit_price": 4.99, "display_name": "Baseplate 16x16"},
            {"part_id": "3811", "size": 32, "color": "#9BA19D",
             "unit_price": 7.99, "display_name": "Baseplate 32x32"}
        ]
    }"##;

    const PALETTE_JSON: &str = r##"{
        "#FF0000": {"name": "Red", "hex": "#FF0000"},
        "#0055BF": {"name": "Blue", "hex": "#0055BF"}
    }"##;

    fn engine() -> BuildEngine {
        let catalog = BrickCatalog::from_json_str(CATALOG_JSON).unwrap();
        let palette = ColorPalette::from_json_str(PALETTE_JSON).unwrap();
        BuildEngine::new(catalog, palette).unwrap()
    }

    #[test]
    fn test_engine_rejects_catalog_without_unit_brick() {
        let catalog = BrickCatalog::from_json_str(
            r##"{
                "bricks": [
                    {"part_id": "3003", "width": 2, "depth": 2, "category": "brick",
                     "unit_price": 0.06, "display_name": "Brick 2x2"}
                ],
                "baseplates": [
                    {"part_id": "3867", "size": 16, "color": "#9BA19D",
                     "unit_price": 4.99, "display_name": "Baseplate 16x16"}
                ]
            }"##,
        )
        .unwrap();
        let palette = ColorPalette::from_json_str(PALETTE_JSON).unwrap();
        assert!(BuildEngine::new(catalog, palette).is_err());
    }

    #[test]
    fn test_square_build_end_to_end() {
        let request = BuildRequest::new(
            "Square",
            vec![
                RawCell::new(0.0, 0.0, 0.0, "#FF0000"),
                RawCell::new(1.0, 0.0, 0.0, "#FF0000"),
                RawCell::new(0.0, 1.0, 0.0, "#FF0000"),
                RawCell::new(1.0, 1.0, 0.0, "#FF0000"),
            ],
        );
        let result = engine().build(&request).unwrap();

        assert_eq!(result.manifest.total_bricks, 1);
        assert_eq!(result.manifest.bricks[0].part_id, "3003");
        assert_eq!(result.baseplate.size, 16);
        assert_eq!(result.manual.total_steps, 2);
        assert_eq!(result.manual.difficulty, Difficulty::Easy);
        assert!(result.warnings.is_empty());
        // Baseplate plus the one brick.
        assert_eq!(result.piece_count.total_pieces, 2);
    }

    #[test]
    fn test_empty_request_builds_baseplate_only() {
        let result = engine()
            .build(&BuildRequest::new("Empty", Vec::new()))
            .unwrap();
        assert_eq!(result.manifest.total_bricks, 0);
        assert_eq!(result.manual.total_steps, 1);
        assert_eq!(result.manual.difficulty, Difficulty::NotApplicable);
        assert_eq!(result.piece_count.total_pieces, 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_cells_become_warnings() {
        let request = BuildRequest::new(
            "Faulty",
            vec![
                RawCell::new(0.5, 0.0, 0.0, "#FF0000"),
                RawCell::new(0.0, 0.0, 0.0, "#BADBAD"),
                RawCell::new(1.0, 0.0, 0.0, "#FF0000"),
            ],
        );
        let result = engine().build(&request).unwrap();

        assert_eq!(result.warnings.len(), 2);
        assert!(matches!(
            result.warnings[0],
            BuildWarning::InvalidCell(ValidationFault::NonIntegerCoordinate { .. })
        ));
        assert!(matches!(
            result.warnings[1],
            BuildWarning::InvalidCell(ValidationFault::UnknownColor { .. })
        ));
        assert_eq!(result.manifest.total_bricks, 1);
    }

    #[test]
    fn test_category_passes_through() {
        let mut request = BuildRequest::new("Tagged", Vec::new());
        request.category = Some("animals".into());
        let result = engine().build(&request).unwrap();
        assert_eq!(result.category.as_deref(), Some("animals"));
    }

    #[test]
    fn test_build_and_record_stores_result() {
        let mut registry = InMemoryRegistry::new();
        let request = BuildRequest::new(
            "Recorded",
            vec![RawCell::new(0.0, 0.0, 0.0, "#0055BF")],
        );
        let result = engine().build_and_record(&request, &mut registry).unwrap();

        assert_eq!(registry.results().len(), 1);
        assert_eq!(registry.results()[0], result);
        assert_eq!(registry.results()[0].project_name, "Recorded");
    }

    #[test]
    fn test_request_deserializes_without_category() {
        let request: BuildRequest = serde_json::from_str(
            r##"{"project_name": "Json", "cells": [
                {"x": 0, "y": 0, "z": 0, "color": "#FF0000"}
            ]}"##,
        )
        .unwrap();
        assert_eq!(request.project_name, "Json");
        assert!(request.category.is_none());
        assert_eq!(request.cells.len(), 1);
    }
}
