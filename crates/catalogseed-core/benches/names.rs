//! Benchmarks for product name generation and INSERT statement building.
//!
//! Measures the CPU side of a populate run in isolation from the database.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use catalogseed_core::schema::{build_batched_insert, DatabaseType};
use catalogseed_core::seeder::INSERT_BATCH_SIZE;
use catalogseed_core::words::{FakerWords, NameGenerator};

fn bench_generate_names(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_names");

    for count in [1_000usize, 10_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut names = NameGenerator::new(
                    FakerWords::new(StdRng::seed_from_u64(42)),
                    StdRng::seed_from_u64(43),
                );
                names.take_names(count)
            });
        });
    }

    group.finish();
}

fn bench_build_insert(c: &mut Criterion) {
    let mut names = NameGenerator::new(
        FakerWords::new(StdRng::seed_from_u64(1)),
        StdRng::seed_from_u64(2),
    );
    let batch = names.take_names(INSERT_BATCH_SIZE);

    let mut group = c.benchmark_group("build_batched_insert");
    group.throughput(Throughput::Elements(INSERT_BATCH_SIZE as u64));
    for db_type in [DatabaseType::PostgreSQL, DatabaseType::MySQL] {
        group.bench_with_input(
            BenchmarkId::from_parameter(db_type),
            &db_type,
            |b, &db_type| b.iter(|| build_batched_insert(&batch, db_type)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_generate_names, bench_build_insert);
criterion_main!(benches);
