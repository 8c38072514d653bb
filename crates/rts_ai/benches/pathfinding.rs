//! Planner and controller benchmarks for rts_ai.
//!
//! Run with: `cargo bench -p rts_ai`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rts_ai::config::EconomyConfig;
use rts_ai::controller::{Controller, EconomyController};
use rts_ai::events::EventLog;
use rts_ai::pathfinding::{plan, ObstacleSet};
use rts_ai::world::{GridExtent, GridPos};
use rts_test_utils::fixtures::{economy_opening, HOME};

/// Vertical walls every fourth column, alternating gaps top and bottom.
fn serpentine(side: i32) -> ObstacleSet {
    let mut obstacles = ObstacleSet::new();
    for x in (2..side - 1).step_by(4) {
        let gap = if (x / 4) % 2 == 0 { side - 1 } else { 0 };
        for y in 0..side {
            if y != gap {
                obstacles.insert(GridPos::new(x, y));
            }
        }
    }
    obstacles
}

pub fn planner_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    for side in [16, 64, 128] {
        let extent = GridExtent::new(side, side);
        let open = ObstacleSet::new();
        let walls = serpentine(side);
        let start = GridPos::new(0, 0);
        let goal = GridPos::new(side - 1, side - 1);

        group.bench_with_input(BenchmarkId::new("open", side), &side, |b, _| {
            b.iter(|| plan(black_box(start), black_box(goal), &open, extent));
        });
        group.bench_with_input(BenchmarkId::new("serpentine", side), &side, |b, _| {
            b.iter(|| plan(black_box(start), black_box(goal), &walls, extent));
        });
    }
    group.finish();
}

pub fn economy_benchmark(c: &mut Criterion) {
    let state = economy_opening().bank(HOME, 2_000, 2_000).build();
    let log = EventLog::new();
    c.bench_function("economy_on_start", |b| {
        b.iter(|| {
            let mut controller = EconomyController::new(HOME, EconomyConfig::default());
            black_box(controller.on_start(black_box(&state), &log))
        });
    });
}

criterion_group!(benches, planner_benchmark, economy_benchmark);
criterion_main!(benches);
