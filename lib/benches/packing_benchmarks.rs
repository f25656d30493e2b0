//! Packing benchmarks
//!
//! Run with: cargo bench

use brickplan::voxel::RawCell;
use brickplan::{BrickCatalog, BuildEngine, BuildRequest, ColorPalette};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const CATALOG_JSON: &str = r##"{
    "bricks": [
        {"part_id": "3001", "width": 4, "depth": 2, "category": "brick",
         "unit_price": 0.10, "display_name": "Brick 2x4"},
        {"part_id": "3003", "width": 2, "depth": 2, "category": "brick",
         "unit_price": 0.06, "display_name": "Brick 2x2"},
        {"part_id": "3004", "width": 2, "depth": 1, "category": "brick",
         "unit_price": 0.04, "display_name": "Brick 1x2"},
        {"part_id": "3005", "width": 1, "depth": 1, "category": "brick",
         "unit_price": 0.03, "display_name": "Brick 1x1"}
    ],
    "baseplates": [
        {"part_id": "3811", "size": 32, "color": "#9BA19D",
         "unit_price": 7.99, "display_name": "Baseplate 32x32"},
        {"part_id": "4186", "size": 48, "color": "#9BA19D",
         "unit_price": 12.99, "display_name": "Baseplate 48x48"}
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

/// A solid 32x32x4 block, worst case for the rectangle scan.
fn solid_block() -> Vec<RawCell> {
    let mut cells = Vec::new();
    for z in 0..4 {
        for y in 0..32 {
            for x in 0..32 {
                cells.push(RawCell::new(x as f64, y as f64, z as f64, "#FF0000"));
            }
        }
    }
    cells
}

/// A two-color checkerboard of 2x2 patches, which defeats the larger
/// shapes and forces many small placements.
fn checkerboard() -> Vec<RawCell> {
    let mut cells = Vec::new();
    for y in 0..32 {
        for x in 0..32 {
            let color = if (x / 2 + y / 2) % 2 == 0 {
                "#FF0000"
            } else {
                "#0055BF"
            };
            cells.push(RawCell::new(x as f64, y as f64, 0.0, color));
        }
    }
    cells
}

fn bench_solid_block(c: &mut Criterion) {
    let engine = engine();
    let request = BuildRequest::new("bench", solid_block());
    c.bench_function("build_solid_32x32x4", |b| {
        b.iter(|| black_box(engine.build(black_box(&request)).unwrap()))
    });
}

fn bench_checkerboard(c: &mut Criterion) {
    let engine = engine();
    let request = BuildRequest::new("bench", checkerboard());
    c.bench_function("build_checkerboard_32x32", |b| {
        b.iter(|| black_box(engine.build(black_box(&request)).unwrap()))
    });
}

criterion_group!(benches, bench_solid_block, bench_checkerboard);
criterion_main!(benches);
