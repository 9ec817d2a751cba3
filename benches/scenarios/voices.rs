//! Benchmarks for a single resonator voice.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use resonator_dsp::{
    dsp::filter::FilterType,
    synth::voice::{ResonanceSettings, TriggerSettings, Voice, PITCH_BEND_CENTER},
    SampleWrapper, DISPERSION_STAGES,
};

use crate::BLOCK_SIZES;

static NOISE: [f32; 480] = {
    let mut data = [0.0; 480];
    let mut state: u32 = 0x1234_5678;
    let mut i = 0;
    while i < data.len() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        data[i] = (state >> 8) as f32 / (1 << 23) as f32 - 1.0;
        i += 1;
    }
    data
};

fn settings(dispersion: u8, filter_type: FilterType) -> TriggerSettings {
    TriggerSettings {
        pitch_bend: PITCH_BEND_CENTER,
        pitch_bend_range: 2,
        level_velocity_sensitivity: 50,
        filter_velocity_sensitivity: 50,
        sample: SampleWrapper::from_interleaved(1, &NOISE),
        sample_start: 0,
        sample_end: 1000,
        excitation_level: 0,
        filter_type,
        filter_cutoff: 40,
        filter_resonance: 10,
        resonance: ResonanceSettings {
            feedback: 990,
            damping: 20,
            dispersion,
            keytrack: 100,
        },
    }
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * 2];

        // Plain Karplus-Strong loop
        let mut voice = Voice::new();
        voice.trigger(60, 100, &settings(0, FilterType::None));
        group.bench_with_input(BenchmarkId::new("plain", size), &size, |b, _| {
            b.iter(|| voice.render(black_box(&mut buffer), size))
        });

        // Every dispersion stage plus an excitation filter: the worst case
        let mut voice = Voice::new();
        voice.trigger(
            60,
            100,
            &settings(DISPERSION_STAGES as u8, FilterType::Lp12),
        );
        group.bench_with_input(BenchmarkId::new("dispersed", size), &size, |b, _| {
            b.iter(|| voice.render(black_box(&mut buffer), size))
        });
    }

    group.finish();
}
