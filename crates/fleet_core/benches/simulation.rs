//! Simulation benchmarks for fleet_core.
//!
//! Run with: `cargo bench -p fleet_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fleet_core::score::estimate_fleet_score;
use fleet_test_utils::fixtures::{battle_fleet, gun_line, runtime, test_config, test_registry};

/// Full bounded battles and single steps.
pub fn battle_benchmark(c: &mut Criterion) {
    c.bench_function("battle_fleet_vs_gun_line", |b| {
        b.iter(|| {
            let mut rt = runtime(&battle_fleet(), &gun_line(4));
            black_box(rt.run_battle(4_000))
        });
    });

    let mut group = c.benchmark_group("battle_step");
    for guns in [2u16, 8, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(guns), &guns, |b, &guns| {
            let mut rt = runtime(&gun_line(guns), &gun_line(guns));
            b.iter(|| {
                rt.battle_step();
                black_box(rt.projectiles(fleet_core::grid::Side::Left).len())
            });
        });
    }
    group.finish();
}

/// Production steps on the mixed fleet.
pub fn production_benchmark(c: &mut Criterion) {
    c.bench_function("production_step", |b| {
        let mut rt = runtime(&battle_fleet(), &battle_fleet());
        b.iter(|| {
            rt.production_step();
            black_box(rt.elapsed())
        });
    });
}

/// The fleet score estimate run by the UI after every layout change.
pub fn score_benchmark(c: &mut Criterion) {
    let registry = test_registry();
    let config = test_config();
    let fleet = battle_fleet();
    c.bench_function("estimate_fleet_score", |b| {
        b.iter(|| black_box(estimate_fleet_score(&fleet, registry.clone(), &config)));
    });
}

criterion_group!(benches, battle_benchmark, production_benchmark, score_benchmark);
criterion_main!(benches);
