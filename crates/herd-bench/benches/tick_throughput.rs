//! Criterion benchmarks for the full tick pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use herd_arena::partition_ranges;
use herd_bench::{reference_profile, serial_profile, stress_profile};
use herd_engine::Simulation;

fn bench_tick_1k(c: &mut Criterion) {
    let mut sim = Simulation::new(reference_profile(42)).unwrap();

    // Warm up: first tick spawns the leader travel targets
    sim.run_tick().unwrap();

    c.bench_function("tick_1k", |b| {
        b.iter(|| {
            let report = sim.run_tick().unwrap();
            black_box(&report);
        });
    });
}

fn bench_tick_1k_serial(c: &mut Criterion) {
    let mut sim = Simulation::new(serial_profile(42)).unwrap();
    sim.run_tick().unwrap();

    c.bench_function("tick_1k_serial", |b| {
        b.iter(|| {
            let report = sim.run_tick().unwrap();
            black_box(&report);
        });
    });
}

fn bench_tick_20k(c: &mut Criterion) {
    let mut sim = Simulation::new(stress_profile(42)).unwrap();
    sim.run_tick().unwrap();

    c.bench_function("tick_20k", |b| {
        b.iter(|| {
            let report = sim.run_tick().unwrap();
            black_box(&report);
        });
    });
}

fn bench_snapshot_1k(c: &mut Criterion) {
    let mut sim = Simulation::new(reference_profile(42)).unwrap();
    for _ in 0..10 {
        sim.run_tick().unwrap();
    }

    c.bench_function("snapshot_1k", |b| {
        b.iter(|| {
            let agents = sim.snapshot_agents();
            black_box(&agents);
        });
    });
}

fn bench_partition(c: &mut Criterion) {
    c.bench_function("partition_20k_16", |b| {
        b.iter(|| {
            let ranges = partition_ranges(black_box(20_000), black_box(16));
            black_box(&ranges);
        });
    });
}

criterion_group!(
    benches,
    bench_tick_1k,
    bench_tick_1k_serial,
    bench_tick_20k,
    bench_snapshot_1k,
    bench_partition
);
criterion_main!(benches);
