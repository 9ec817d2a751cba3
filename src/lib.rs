//! Polyphonic delay-line resonator driven by sampled excitation.
//!
//! A fixed pool of [`Voice`]s, each a stereo waveguide loop with all-pass
//! dispersion, all-pass fractional delay and a two-tap damping filter, is
//! owned by a [`Resonator`]. Everything the render path touches is sized at
//! construction, so [`Resonator::render`] never allocates, locks or fails.

pub mod dsp; // Filter primitive and delay line
pub mod error;
pub mod io; // Sample provider and host runtime description
pub mod synth; // Voices, voice pool, parameters, control messages

pub use error::{InitError, Result};
pub use io::{RuntimeDesc, SampleBanks, SampleProvider, SampleWrapper};
pub use synth::{
    message::{ControlMessage, MessageReceiver, NoteTarget},
    params::{ParamId, Params},
    pool::Resonator,
    voice::Voice,
};

/// The only sample rate the engine runs at.
pub const SAMPLE_RATE: u32 = 48_000;
/// Polyphony.
pub const NUM_VOICES: usize = 8;
/// Stereo frames per voice delay line; bounds the lowest playable pitch.
pub const DELAY_LINE_FRAMES: usize = 8192;
/// Upper bound on all-pass dispersion stages per voice.
pub const DISPERSION_STAGES: usize = 4;
/// Largest block hosts in this crate render at once.
pub const MAX_BLOCK_SIZE: usize = 2048;

pub(crate) const SAMPLE_RATE_F32: f32 = SAMPLE_RATE as f32;
