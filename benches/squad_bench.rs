//! Criterion benchmarks for squad optimization.
//!
//! Uses seeded synthetic player pools so runs are comparable.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fpl_squad::squad::{
    OptimizerConfig, PlayerId, PlayerPool, PlayerRecord, Position, Price, SquadModel,
    SquadOptimizer, TeamId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ===========================================================================
// Synthetic pools
// ===========================================================================

/// Pool of `n` players spread over 20 clubs with a 1:3:3:2 position mix.
fn synthetic_pool(n: usize, seed: u64) -> Vec<PlayerRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let position = match i % 9 {
                0 => Position::Goalkeeper,
                1..=3 => Position::Defender,
                4..=6 => Position::Midfielder,
                _ => Position::Forward,
            };
            let id = i as u32 + 1;
            PlayerRecord::new(
                PlayerId(id),
                format!("player {id}"),
                TeamId(rng.random_range(0..20)),
                position,
                Price::from_tenths(rng.random_range(40..=140)),
                Some(rng.random_range(0.0..12.0)),
            )
        })
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_build_model(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_model");
    let config = OptimizerConfig::default();

    for &n in &[100usize, 300, 600] {
        let pool = PlayerPool::from_records(synthetic_pool(n, 42)).expect("valid pool");
        group.bench_with_input(BenchmarkId::from_parameter(n), &pool, |b, pool| {
            b.iter(|| SquadModel::build(black_box(pool), &config));
        });
    }
    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    group.sample_size(10);
    let optimizer = SquadOptimizer::new();
    let config = OptimizerConfig::default();

    for &n in &[60usize, 120, 180] {
        let records = synthetic_pool(n, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| {
                optimizer
                    .optimize(black_box(records.clone()), &config)
                    .expect("optimize")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_model, bench_optimize);
criterion_main!(benches);
