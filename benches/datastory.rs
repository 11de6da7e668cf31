use criterion::{black_box, criterion_group, criterion_main, Criterion};
use datastory::stats::{describe, rolling_mean};

fn synthetic_rates(n: usize) -> Vec<f64> {
    (0..n).map(|i| 1.1 + (i as f64 / 50.0).sin() * 0.1).collect()
}

fn bench_stats(c: &mut Criterion) {
    // Roughly the length of the daily euro series since 1999
    let rates = synthetic_rates(5_700);
    // Roughly the number of hourly traffic records
    let volumes: Vec<f64> = (0..48_204).map(|i| ((i * 7_919) % 7_280) as f64).collect();

    c.bench_function("rolling_mean_30", |b| {
        b.iter(|| rolling_mean(black_box(&rates), black_box(30)))
    });
    c.bench_function("describe_volumes", |b| b.iter(|| describe(black_box(&volumes))));
}

criterion_group!(benches, bench_stats);
criterion_main!(benches);
