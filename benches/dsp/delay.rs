//! Benchmarks for the stereo delay line.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use resonator_dsp::dsp::delay::StereoDelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Loop lengths for a high, middle and low note.
    let lengths: &[usize] = &[
        45,   // ~1 kHz
        183,  // middle C
        5870, // ~8 Hz
    ];

    for &size in BLOCK_SIZES {
        for &length in lengths {
            let mut delay = StereoDelayLine::new();
            delay.set_length(length);
            group.bench_with_input(
                BenchmarkId::new(format!("feedback_{length}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for _ in 0..size {
                            let [l, r] = delay.read();
                            delay.write(black_box([l * 0.99 + 0.01, r * 0.99 - 0.01]));
                            delay.advance();
                        }
                    })
                },
            );
        }

        let mut delay = StereoDelayLine::new();
        group.bench_with_input(BenchmarkId::new("clear", size), &size, |b, _| {
            b.iter(|| delay.clear())
        });
    }

    group.finish();
}
