use std::f32::consts::PI;

use crate::SAMPLE_RATE_F32;

/*
Stereo Biquad
=============

One coefficient set, two channels of state. Voices use it in three places:
shaping the excitation, dispersing the feedback loop, and interpolating the
fractional part of the loop delay.

| type | order | passes              | used for                      |
| ---- | ----- | ------------------- | ----------------------------- |
| None | -     | everything          | bypass                        |
| LP12 | 2     | below cutoff        | excitation                    |
| HP12 | 2     | above cutoff        | excitation                    |
| BP6  | 2     | around cutoff       | excitation                    |
| LP6  | 1     | below cutoff        | excitation                    |
| HP6  | 1     | above cutoff        | excitation                    |
| AP1  | 1     | everything, phase   | dispersion, fractional delay  |

The order of the first six matches the published filter-type parameter; AP1
is internal and never offered to the user.

Difference equation (transposed direct form II):

    y[n] = b0 x[n] + b1 x[n-1] + b2 x[n-2] - a1 y[n-1] - a2 y[n-2]

First-order sections come from the bilinear transform with
t = tan(pi fc / fs). The all-pass is

    H(z) = (a + z^-1) / (1 + a z^-1),   a = (t - 1) / (t + 1)

so `b0` alone is the all-pass coefficient, which is what group-delay
compensation reads back. Second-order sections are the usual cookbook forms
with Q = resonance.

init() only rewrites coefficients. State survives so a filter can be
retuned every block without clicks; reset() clears it explicitly.
*/

/// Highest cutoff accepted, as a fraction of the sample rate.
const MAX_CUTOFF_RATIO: f32 = 0.4999;
const MIN_CUTOFF_HZ: f32 = 1.0;
const MIN_Q: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FilterType {
    #[default]
    None = 0,
    Lp12 = 1,
    Hp12 = 2,
    Bp6 = 3,
    Lp6 = 4,
    Hp6 = 5,
    Ap1 = 6,
}

impl FilterType {
    /// Display names for the user-selectable types, indexed by discriminant.
    pub const NAMES: [&'static str; 6] = ["None", "LP12", "HP12", "BP6", "LP6", "HP6"];

    pub fn from_index(index: i32) -> Option<Self> {
        Some(match index {
            0 => FilterType::None,
            1 => FilterType::Lp12,
            2 => FilterType::Hp12,
            3 => FilterType::Bp6,
            4 => FilterType::Lp6,
            5 => FilterType::Hp6,
            6 => FilterType::Ap1,
            _ => return None,
        })
    }

    pub fn index(self) -> i32 {
        self as i32
    }

    /// Name shown for this type, `None` for internal-only types.
    pub fn name(self) -> Option<&'static str> {
        Self::NAMES.get(self as usize).copied()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BiQuadFilter {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: [f32; 2],
    z2: [f32; 2],
}

impl Default for BiQuadFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl BiQuadFilter {
    /// A bypass filter with cleared state.
    pub const fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: [0.0; 2],
            z2: [0.0; 2],
        }
    }

    /// Configure coefficients for `filter_type` at `cutoff_hz`.
    ///
    /// `resonance` is the Q of second-order types and ignored otherwise.
    /// Cutoff is clamped just below Nyquist.
    pub fn init(&mut self, filter_type: FilterType, cutoff_hz: f32, resonance: f32) {
        let cutoff = cutoff_hz.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_RATIO * SAMPLE_RATE_F32);

        match filter_type {
            FilterType::None => self.set_coefficients(1.0, 0.0, 0.0, 0.0, 0.0),
            FilterType::Lp6 => {
                let t = (PI * cutoff / SAMPLE_RATE_F32).tan();
                let b0 = t / (1.0 + t);
                self.set_coefficients(b0, b0, 0.0, (t - 1.0) / (t + 1.0), 0.0);
            }
            FilterType::Hp6 => {
                let t = (PI * cutoff / SAMPLE_RATE_F32).tan();
                let b0 = 1.0 / (1.0 + t);
                self.set_coefficients(b0, -b0, 0.0, (t - 1.0) / (t + 1.0), 0.0);
            }
            FilterType::Ap1 => {
                let t = (PI * cutoff / SAMPLE_RATE_F32).tan();
                let a = (t - 1.0) / (t + 1.0);
                self.set_coefficients(a, 1.0, 0.0, a, 0.0);
            }
            FilterType::Lp12 | FilterType::Hp12 | FilterType::Bp6 => {
                let w0 = 2.0 * PI * cutoff / SAMPLE_RATE_F32;
                let (sin_w0, cos_w0) = w0.sin_cos();
                let alpha = sin_w0 / (2.0 * resonance.max(MIN_Q));
                let a0 = 1.0 + alpha;
                let a1 = -2.0 * cos_w0 / a0;
                let a2 = (1.0 - alpha) / a0;

                match filter_type {
                    FilterType::Lp12 => {
                        let b1 = (1.0 - cos_w0) / a0;
                        self.set_coefficients(0.5 * b1, b1, 0.5 * b1, a1, a2);
                    }
                    FilterType::Hp12 => {
                        let b1 = -(1.0 + cos_w0) / a0;
                        self.set_coefficients(-0.5 * b1, b1, -0.5 * b1, a1, a2);
                    }
                    _ => {
                        // Constant 0 dB peak gain.
                        let b0 = alpha / a0;
                        self.set_coefficients(b0, 0.0, -b0, a1, a2);
                    }
                }
            }
        }
    }

    /// Set raw coefficients, `a0` normalised to 1.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) {
        self.b0 = b0;
        self.b1 = b1;
        self.b2 = b2;
        self.a1 = a1;
        self.a2 = a2;
    }

    /// Feed-forward gain; the all-pass coefficient for [`FilterType::Ap1`].
    pub fn b0(&self) -> f32 {
        self.b0
    }

    #[inline]
    pub fn process(&mut self, input: [f32; 2]) -> [f32; 2] {
        let mut output = [0.0; 2];
        for ch in 0..2 {
            let x = input[ch];
            let y = self.b0 * x + self.z1[ch];
            self.z1[ch] = self.b1 * x - self.a1 * y + self.z2[ch];
            self.z2[ch] = self.b2 * x - self.a2 * y;
            output[ch] = y;
        }
        output
    }

    pub fn reset(&mut self) {
        self.z1 = [0.0; 2];
        self.z2 = [0.0; 2];
    }
}
