//! Benchmarks for MADDNESS training and query operations.
//!
//! Run with: cargo bench --bench train_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use maddness::prelude::*;

const DIM: usize = 64;
const NUM_SUBSPACES: usize = 8;

/// Generate random vectors for benchmarking.
fn generate_vectors(count: usize, dim: usize) -> Vec<Vec<f32>> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| (0..dim).map(|_| rng.gen::<f32>() * 100.0).collect())
        .collect()
}

/// Benchmark the full training pipeline.
fn bench_train(c: &mut Criterion) {
    let mut group = c.benchmark_group("train");
    let queries = generate_vectors(4, DIM);

    for size in [128, 512, 2048] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let examples = generate_vectors(size, DIM);
            b.iter(|| {
                Maddness::train(black_box(&examples), black_box(&queries), NUM_SUBSPACES).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark encoding a single vector against a trained model.
fn bench_quantize(c: &mut Criterion) {
    let examples = generate_vectors(1024, DIM);
    let queries = generate_vectors(4, DIM);
    let m = Maddness::train(&examples, &queries, NUM_SUBSPACES).unwrap();

    c.bench_function("quantize", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % examples.len();
            m.quantize(black_box(&examples[i]))
        });
    });
}

/// Benchmark the approximate dot product against precomputed indices.
fn bench_dot_product(c: &mut Criterion) {
    let examples = generate_vectors(1024, DIM);
    let queries = generate_vectors(4, DIM);
    let m = Maddness::train(&examples, &queries, NUM_SUBSPACES).unwrap();

    let lut_indices: Vec<Vec<u16>> = examples
        .iter()
        .map(|v| m.lookup_table_indices(&m.quantize(v)))
        .collect();

    c.bench_function("dot_product", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % lut_indices.len();
            m.dot_product(black_box(&lut_indices[i]), i % queries.len())
        });
    });
}

criterion_group!(benches, bench_train, bench_quantize, bench_dot_product);
criterion_main!(benches);
