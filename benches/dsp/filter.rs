//! Benchmarks for the stereo biquad.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use resonator_dsp::dsp::filter::{BiQuadFilter, FilterType};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<[f32; 2]> = (0..size)
            .map(|i| {
                let s = (i as f32 / size as f32) * 2.0 - 1.0;
                [s, -s]
            })
            .collect();

        for (name, filter_type) in [
            ("lp12", FilterType::Lp12),
            ("bp6", FilterType::Bp6),
            ("ap1", FilterType::Ap1),
        ] {
            let mut filter = BiQuadFilter::new();
            filter.init(filter_type, 1000.0, 2.0);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut acc = [0.0f32; 2];
                    for &frame in &input {
                        let y = filter.process(black_box(frame));
                        acc[0] += y[0];
                        acc[1] += y[1];
                    }
                    acc
                })
            });
        }

        // Re-deriving coefficients happens once per stage per block.
        let mut filter = BiQuadFilter::new();
        group.bench_with_input(BenchmarkId::new("init_ap1", size), &size, |b, _| {
            b.iter(|| filter.init(FilterType::Ap1, black_box(2289.0), 0.0))
        });
    }

    group.finish();
}
