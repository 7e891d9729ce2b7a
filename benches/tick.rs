//! Benchmarks for spawning, ticking and rasterizing.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pgen::{CanvasConfig, Rasterizer, SimParams, Simulation};

fn params(count: u32) -> SimParams {
    SimParams {
        num_particles: count,
        life: 500,
        ..Default::default()
    }
}

fn bench_start(c: &mut Criterion) {
    let mut group = c.benchmark_group("start");

    for count in [100u32, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut sim = Simulation::new().with_seed(1);
            b.iter(|| {
                sim.start(params(count));
                black_box(sim.particles().len())
            })
        });
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for count in [100u32, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut sim = Simulation::new().with_seed(1);
            sim.start(params(count));
            b.iter(|| {
                if !sim.is_running() {
                    sim.start(params(count));
                }
                black_box(sim.tick())
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let rasterizer = Rasterizer::new(CanvasConfig::default());

    for count in [100u32, 1_000] {
        let mut sim = Simulation::new().with_seed(1);
        sim.start(params(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &sim, |b, sim| {
            b.iter(|| black_box(rasterizer.render(sim.particles())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_start, bench_tick, bench_render);
criterion_main!(benches);
