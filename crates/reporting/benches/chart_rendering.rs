use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use northwind_reporting::charts::{Histogram, bar_chart};

fn generate_values(count: usize) -> Vec<i64> {
    // Deterministic spread with a long upper tail, like order values.
    (0..count as i64).map(|i| (i * 7919 % 1000) + (i % 13) * (i % 17)).collect()
}

fn generate_labels(count: usize) -> Vec<(String, u64)> {
    (0..count)
        .map(|i| (format!("Customer {i:04}"), (i as u64 * 31) % 97))
        .collect()
}

fn bench_bar_chart(c: &mut Criterion) {
    let mut group = c.benchmark_group("charts/bar_chart");

    for entries in [10usize, 100, 1_000].iter() {
        let data = generate_labels(*entries);
        group.bench_with_input(BenchmarkId::from_parameter(entries), entries, |b, _| {
            b.iter(|| bar_chart(black_box(&data), 40));
        });
    }

    group.finish();
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("charts/histogram");

    for count in [100usize, 10_000, 100_000].iter() {
        let values = generate_values(*count);
        group.bench_with_input(BenchmarkId::new("bin", count), count, |b, _| {
            b.iter(|| Histogram::from_values(black_box(&values), 10));
        });
        group.bench_with_input(BenchmarkId::new("bin_and_render", count), count, |b, _| {
            b.iter(|| {
                Histogram::from_values(black_box(&values), 10).map(|h| h.render(40))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bar_chart, bench_histogram);
criterion_main!(benches);
