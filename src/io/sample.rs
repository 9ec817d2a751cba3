//! Excitation sample access.
//!
//! Voices copy a [`SampleWrapper`] out of the provider at trigger time and
//! keep reading from it for as long as the note plays, so sample data has to
//! outlive every voice. Banks are loaded once at startup and live for the
//! process lifetime, which is exactly what a `'static` slice expresses.

use std::f32::consts::TAU;

use tracing::debug;

use crate::synth::params::SAMPLE_BANK_NAMES;

/// Interleaved sample data plus its geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleWrapper {
    channels: u8,
    frames: usize,
    data: &'static [f32],
}

impl SampleWrapper {
    /// `None` unless there is at least one channel and `data` holds
    /// `frames * channels` values.
    pub fn new(channels: u8, frames: usize, data: &'static [f32]) -> Option<Self> {
        let needed = frames.checked_mul(usize::from(channels))?;
        if channels == 0 || data.len() < needed {
            return None;
        }
        Some(Self {
            channels,
            frames,
            data,
        })
    }

    /// Wrap interleaved data, deriving the frame count from its length.
    pub fn from_interleaved(channels: u8, data: &'static [f32]) -> Option<Self> {
        if channels == 0 {
            return None;
        }
        Self::new(channels, data.len() / usize::from(channels), data)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn data(&self) -> &'static [f32] {
        self.data
    }
}

/// Where voices get their excitation from.
///
/// Callers bounds-check `bank` and `index` against the counts before asking
/// for a sample; a provider may still answer `None`.
pub trait SampleProvider: Send {
    fn num_banks(&self) -> u8;

    fn num_samples(&self, bank: u8) -> u8;

    fn sample(&self, bank: u8, index: u8) -> Option<SampleWrapper>;
}

impl<T: SampleProvider + ?Sized> SampleProvider for Box<T> {
    fn num_banks(&self) -> u8 {
        (**self).num_banks()
    }

    fn num_samples(&self, bank: u8) -> u8 {
        (**self).num_samples(bank)
    }

    fn sample(&self, bank: u8, index: u8) -> Option<SampleWrapper> {
        (**self).sample(bank, index)
    }
}

/// In-memory provider with one bank per published bank name.
#[derive(Debug, Clone)]
pub struct SampleBanks {
    banks: Vec<Vec<SampleWrapper>>,
}

impl Default for SampleBanks {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleBanks {
    pub fn new() -> Self {
        Self {
            banks: vec![Vec::new(); SAMPLE_BANK_NAMES.len()],
        }
    }

    /// Append a sample to `bank`; returns its 0-based index, or `None` if
    /// the bank does not exist or is full.
    pub fn push(&mut self, bank: u8, sample: SampleWrapper) -> Option<u8> {
        let samples = self.banks.get_mut(usize::from(bank))?;
        let index = u8::try_from(samples.len()).ok()?;
        samples.push(sample);
        Some(index)
    }

    /// Move interleaved data into the bank, keeping it alive for the rest of
    /// the process.
    pub fn push_owned(&mut self, bank: u8, channels: u8, data: Vec<f32>) -> Option<u8> {
        let data: &'static [f32] = Box::leak(data.into_boxed_slice());
        let sample = SampleWrapper::from_interleaved(channels, data)?;
        self.push(bank, sample)
    }

    /// A small synthesised set so the engine makes sound without any data.
    ///
    /// | bank | 1                | 2              | 3            |
    /// | ---- | ---------------- | -------------- | ------------ |
    /// | CH   | 5 ms noise burst | single click   | 20 ms noise  |
    /// | OH   | 80 ms noise      |                |              |
    /// | RS   | mallet (sine)    | 2-sample pulse |              |
    /// | CP   | stereo noise     |                |              |
    pub fn factory() -> Self {
        let mut banks = Self::new();
        let mut noise = XorShift::new(0x2545_f491);

        let ms = |millis: usize| crate::SAMPLE_RATE as usize * millis / 1000;

        banks.push_owned(0, 1, noise_burst(&mut noise, ms(5)));
        banks.push_owned(0, 1, vec![1.0, 0.0, 0.0, 0.0]);
        banks.push_owned(0, 1, noise_burst(&mut noise, ms(20)));
        banks.push_owned(1, 1, noise_burst(&mut noise, ms(80)));
        banks.push_owned(2, 1, mallet(ms(30), 220.0));
        banks.push_owned(2, 1, vec![1.0, -1.0]);

        let stereo: Vec<f32> = (0..ms(10))
            .flat_map(|i| {
                let env = decay_envelope(i, ms(10));
                [noise.next_f32() * env, noise.next_f32() * env]
            })
            .collect();
        banks.push_owned(3, 2, stereo);

        debug!(
            samples = banks.banks.iter().map(Vec::len).sum::<usize>(),
            "factory sample banks loaded"
        );
        banks
    }
}

impl SampleProvider for SampleBanks {
    fn num_banks(&self) -> u8 {
        u8::try_from(self.banks.len()).unwrap_or(u8::MAX)
    }

    fn num_samples(&self, bank: u8) -> u8 {
        self.banks
            .get(usize::from(bank))
            .map_or(0, |samples| u8::try_from(samples.len()).unwrap_or(u8::MAX))
    }

    fn sample(&self, bank: u8, index: u8) -> Option<SampleWrapper> {
        self.banks
            .get(usize::from(bank))?
            .get(usize::from(index))
            .copied()
    }
}

fn decay_envelope(i: usize, len: usize) -> f32 {
    let t = i as f32 / len as f32;
    (1.0 - t) * (1.0 - t)
}

fn noise_burst(noise: &mut XorShift, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| noise.next_f32() * decay_envelope(i, len))
        .collect()
}

fn mallet(len: usize, freq: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = TAU * freq * i as f32 / crate::SAMPLE_RATE as f32;
            phase.sin() * decay_envelope(i, len)
        })
        .collect()
}

/// Deterministic white noise for the factory set.
struct XorShift(u32);

impl XorShift {
    fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    fn next_f32(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}
