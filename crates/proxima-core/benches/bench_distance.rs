//! Distance kernel benchmarks: dispatched (SIMD) path vs. scalar
//! reference across common dimensions.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use proxima_core::distance::{self, scalar};

fn generate_vectors(dim: usize) -> (Vec<f32>, Vec<f32>) {
    let a: Vec<f32> = (0..dim).map(|i| ((i % 200) as f32) * 0.01 - 1.0).collect();
    let b: Vec<f32> = (0..dim).map(|i| 1.0 - ((i % 200) as f32) * 0.01).collect();
    (a, b)
}

fn bench_dot(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot");

    for dim in [4, 32, 64, 128, 256, 512, 1024] {
        let (a, b) = generate_vectors(dim);
        group.throughput(Throughput::Elements(dim as u64));

        group.bench_with_input(BenchmarkId::new("simd", dim), &dim, |bench, _| {
            bench.iter(|| distance::dot(black_box(&a), black_box(&b)));
        });
        group.bench_with_input(BenchmarkId::new("scalar", dim), &dim, |bench, _| {
            bench.iter(|| scalar::dot(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

fn bench_squared_euclidean(c: &mut Criterion) {
    let mut group = c.benchmark_group("squared_euclidean");

    for dim in [4, 32, 64, 128, 256, 512, 1024] {
        let (a, b) = generate_vectors(dim);
        group.throughput(Throughput::Elements(dim as u64));

        group.bench_with_input(BenchmarkId::new("simd", dim), &dim, |bench, _| {
            bench.iter(|| distance::squared_euclidean(black_box(&a), black_box(&b)));
        });
        group.bench_with_input(BenchmarkId::new("scalar", dim), &dim, |bench, _| {
            bench.iter(|| scalar::squared_euclidean(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

fn bench_non_aligned_lengths(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot_non_aligned");

    // Lengths straddling the 16-lane bulk and 4-lane tail boundaries
    for dim in [15, 17, 63, 65, 127, 129] {
        let (a, b) = generate_vectors(dim);
        group.bench_with_input(BenchmarkId::new("simd", dim), &dim, |bench, _| {
            bench.iter(|| distance::dot(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

fn bench_cosine(c: &mut Criterion) {
    let mut group = c.benchmark_group("cosine_distance");

    for dim in [64, 128, 256, 512] {
        let (a, b) = generate_vectors(dim);
        group.throughput(Throughput::Elements(dim as u64));
        group.bench_with_input(BenchmarkId::new("simd", dim), &dim, |bench, _| {
            bench.iter(|| distance::cosine_distance(black_box(&a), black_box(&b)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_dot,
    bench_squared_euclidean,
    bench_non_aligned_lengths,
    bench_cosine,
);
criterion_main!(benches);
