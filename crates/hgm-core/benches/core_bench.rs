//! Criterion benchmarks for hgm-core signal operations
//!
//! Run with: cargo bench -p hgm-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hgm_core::{NonlinearFunction, Signal};

const SAMPLE_RATE: f64 = 48000.0;
const LENGTHS: &[usize] = &[4096, 65536, 262144];

fn generate_test_signal(len: usize) -> Signal {
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect();
    Signal::mono(samples, SAMPLE_RATE).unwrap()
}

fn bench_nonlinear_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("NonlinearApply");

    for &len in LENGTHS {
        let input = generate_test_signal(len);
        for function in [NonlinearFunction::power(5), NonlinearFunction::chebyshev(5)] {
            group.bench_with_input(
                BenchmarkId::new(function.family().to_string(), len),
                &len,
                |b, _| b.iter(|| black_box(function.apply(black_box(&input)))),
            );
        }
    }

    group.finish();
}

fn bench_merge_fill_zeros(c: &mut Criterion) {
    let mut group = c.benchmark_group("MergeFillZeros");

    for &len in LENGTHS {
        let parts: Vec<Signal> = (1..=5).map(|k| generate_test_signal(len / k)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| black_box(Signal::merge_fill_zeros(black_box(&parts)).unwrap()))
        });
    }

    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let input = generate_test_signal(65536);
    c.bench_function("Resize_65536_to_4096", |b| {
        b.iter(|| black_box(input.resize(black_box(4096))))
    });
}

criterion_group!(benches, bench_nonlinear_apply, bench_merge_fill_zeros, bench_resize);
criterion_main!(benches);
