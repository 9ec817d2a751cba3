//! Benchmarks for the full voice pool.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use resonator_dsp::{ParamId, Resonator, RuntimeDesc, SampleBanks, NUM_VOICES};

use crate::BLOCK_SIZES;

pub fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pool");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        for dispersion in [0, 4] {
            let Ok(mut resonator) = Resonator::new(RuntimeDesc::new(SampleBanks::factory())) else {
                panic!("default runtime description is valid");
            };
            resonator.set_parameter(ParamId::Dispersion.index(), dispersion);

            // A chord spread over the keyboard keeps every voice busy.
            for i in 0..NUM_VOICES as u8 {
                resonator.note_on(36 + i * 7, 100);
                resonator.render(&mut buffer, size);
            }

            group.bench_with_input(
                BenchmarkId::new(format!("eight_voices_dispersion_{dispersion}"), size),
                &size,
                |b, _| b.iter(|| resonator.render(black_box(&mut buffer), size)),
            );
        }
    }

    group.finish();
}
