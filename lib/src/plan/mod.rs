//! Step planner - orders a covering into a numbered build plan.
//!
//! Step 1 is always the baseplate; each occupied layer then becomes one
//! step in ascending height order, with per-step instruction text and a
//! derived difficulty/time estimate.

use crate::catalog::BaseplateSpec;
use crate::pack::{Manifest, PlacedBrick};
use crate::Coord;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Average handling time per brick, in seconds.
pub const SECONDS_PER_BRICK: u64 = 3;

/// Floor for the estimated assembly time, in minutes.
pub const MINIMUM_MINUTES: u64 = 5;

/// The layer a build step belongs to.
///
/// The baseplate step has no source voxel layer; it serializes as the
/// string `"baseplate"`, while voxel layers serialize as their height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepLayer {
    Baseplate,
    Voxel(Coord),
}

impl Serialize for StepLayer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            StepLayer::Baseplate => serializer.serialize_str("baseplate"),
            StepLayer::Voxel(z) => serializer.serialize_i32(*z),
        }
    }
}

/// Difficulty label derived from the total brick count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Difficulty {
    /// Step function of the brick count, excluding the baseplate.
    pub fn from_brick_count(bricks: usize) -> Self {
        match bricks {
            0 => Difficulty::NotApplicable,
            1..=99 => Difficulty::Easy,
            100..=199 => Difficulty::Medium,
            200..=399 => Difficulty::Hard,
            _ => Difficulty::Expert,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::NotApplicable => "N/A",
        };
        write!(f, "{label}")
    }
}

/// Estimated assembly time in minutes.
///
/// A flat per-brick handling cost plus one minute of baseplate setup
/// overhead, floored for trivial builds.
pub fn estimated_minutes(total_bricks: usize) -> u64 {
    let handling = ((total_bricks as u64 * SECONDS_PER_BRICK) as f64 / 60.0).round() as u64;
    (handling + 1).max(MINIMUM_MINUTES)
}

/// The selected baseplate as presented in the manual.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BaseplateDescriptor {
    pub part_id: String,
    pub size: Coord,
    pub display_name: String,
}

impl From<&BaseplateSpec> for BaseplateDescriptor {
    fn from(spec: &BaseplateSpec) -> Self {
        Self {
            part_id: spec.part_id.clone(),
            size: spec.size,
            display_name: spec.display_name.clone(),
        }
    }
}

/// One numbered unit of the instruction sequence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildStep {
    /// 1-based step number; step 1 is always the baseplate.
    pub step_number: usize,

    /// Source layer of this step.
    pub layer: StepLayer,

    /// Bricks introduced in this step, sorted by x then y for a
    /// left-to-right, front-to-back build order.
    pub bricks: Vec<PlacedBrick>,

    /// Per-part quantities for this step.
    pub piece_counts: BTreeMap<String, usize>,

    /// Templated instruction text.
    pub instructions: String,
}

/// The complete ordered build plan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstructionManual {
    /// Pass-through project name; the engine does not interpret it.
    pub project_name: String,

    pub total_steps: usize,
    pub difficulty: Difficulty,
    pub estimated_time_minutes: u64,
    pub baseplate: BaseplateDescriptor,
    pub steps: Vec<BuildStep>,

    /// One descriptive line per 1-based voxel layer index.
    pub layer_summary: BTreeMap<usize, String>,
}

/// Generate the build plan for a manifest.
pub fn generate_manual(
    manifest: &Manifest,
    baseplate: &BaseplateSpec,
    project_name: &str,
) -> InstructionManual {
    let mut by_layer: BTreeMap<Coord, Vec<PlacedBrick>> = BTreeMap::new();
    for brick in &manifest.bricks {
        by_layer
            .entry(brick.position.z)
            .or_default()
            .push(brick.clone());
    }

    let layer_count = by_layer.len();
    let mut steps = vec![BuildStep {
        step_number: 1,
        layer: StepLayer::Baseplate,
        bricks: Vec::new(),
        piece_counts: BTreeMap::new(),
        instructions: format!(
            "Step 1: Place the {size}x{size} baseplate ({name}) on a flat surface. \
             Every brick in this build anchors to it.",
            size = baseplate.size,
            name = baseplate.display_name,
        ),
    }];
    let mut layer_summary = BTreeMap::new();

    for (layer_index, (z, mut bricks)) in by_layer.into_iter().enumerate() {
        bricks.sort_by_key(|brick| (brick.position.x, brick.position.y));

        let mut piece_counts: BTreeMap<String, usize> = BTreeMap::new();
        for brick in &bricks {
            *piece_counts.entry(brick.part_id.clone()).or_default() += 1;
        }

        let step_number = layer_index + 2;
        let position = LayerPosition::of(layer_index, layer_count);
        let instructions = step_instructions(step_number, layer_index + 1, bricks.len(), position);
        layer_summary.insert(layer_index + 1, summary_line(layer_index + 1, bricks.len(), position));

        steps.push(BuildStep {
            step_number,
            layer: StepLayer::Voxel(z),
            bricks,
            piece_counts,
            instructions,
        });
    }

    InstructionManual {
        project_name: project_name.to_string(),
        total_steps: steps.len(),
        difficulty: Difficulty::from_brick_count(manifest.total_bricks),
        estimated_time_minutes: estimated_minutes(manifest.total_bricks),
        baseplate: baseplate.into(),
        steps,
        layer_summary,
    }
}

/// Position of a layer within the stack, for template selection.
///
/// A single-layer build counts as first: it sits on the baseplate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LayerPosition {
    First,
    Interior,
    Last,
}

impl LayerPosition {
    fn of(layer_index: usize, layer_count: usize) -> Self {
        if layer_index == 0 {
            LayerPosition::First
        } else if layer_index + 1 == layer_count {
            LayerPosition::Last
        } else {
            LayerPosition::Interior
        }
    }
}

fn step_instructions(
    step_number: usize,
    layer_number: usize,
    brick_count: usize,
    position: LayerPosition,
) -> String {
    match position {
        LayerPosition::First => format!(
            "Step {step_number}: Place the first layer of {brick_count} bricks directly on \
             the baseplate. Press each brick firmly onto the studs, working left to right, \
             front to back."
        ),
        LayerPosition::Interior => format!(
            "Step {step_number}: Build layer {layer_number} with {brick_count} bricks on top \
             of the previous layer. Align each brick with the studs below before pressing down."
        ),
        LayerPosition::Last => format!(
            "Step {step_number}: Place the final layer of {brick_count} bricks to finish the \
             build. Double-check alignment before pressing the last bricks into place."
        ),
    }
}

fn summary_line(layer_number: usize, brick_count: usize, position: LayerPosition) -> String {
    match position {
        LayerPosition::First => {
            format!("Layer {layer_number}: {brick_count} bricks placed on the baseplate")
        }
        LayerPosition::Interior => format!("Layer {layer_number}: {brick_count} bricks"),
        LayerPosition::Last => format!("Layer {layer_number}: {brick_count} bricks (top layer)"),
    }
}

/// Render the full manual as printable text.
pub fn manual_to_text(manual: &InstructionManual) -> String {
    let mut lines = Vec::new();
    lines.push("=".repeat(60));
    lines.push(format!("BUILD INSTRUCTIONS: {}", manual.project_name));
    lines.push("=".repeat(60));
    lines.push(format!("Total steps:    {}", manual.total_steps));
    lines.push(format!("Difficulty:     {}", manual.difficulty));
    lines.push(format!(
        "Estimated time: {} minutes",
        manual.estimated_time_minutes
    ));
    lines.push(String::new());

    if !manual.layer_summary.is_empty() {
        lines.push("Layer overview:".to_string());
        for summary in manual.layer_summary.values() {
            lines.push(format!("  {summary}"));
        }
        lines.push(String::new());
    }

    for step in &manual.steps {
        lines.push(step.instructions.clone());
        if !step.piece_counts.is_empty() {
            lines.push("  Parts needed:".to_string());
            for (part_id, quantity) in &step.piece_counts {
                lines.push(format!("    {part_id}: {quantity}"));
            }
        }
        for (i, brick) in step.bricks.iter().enumerate() {
            lines.push(format!(
                "    {}. {} at {}, rotation {}",
                i + 1,
                brick.part_id,
                brick.position,
                brick.rotation
            ));
        }
        lines.push(String::new());
    }

    lines.push("Build complete.".to_string());
    lines.join("\n")
}
