//! Voice state shared from the audio thread
//!
//! Snapshots are `Copy` so the audio callback can push them through the
//! ring buffer without allocating.

use resonator_dsp::{Voice, NUM_VOICES};

/// What the UI shows for one voice.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoiceSnapshot {
    pub note: u8,
    pub gate: bool,
    /// False for voices never triggered or triggered without a sample
    pub initialized: bool,
    pub frames_since_note_on: usize,
}

impl VoiceSnapshot {
    pub fn capture(voices: &[Voice; NUM_VOICES]) -> [Self; NUM_VOICES] {
        std::array::from_fn(|i| {
            let voice = &voices[i];
            Self {
                note: voice.note(),
                gate: voice.is_gated(),
                initialized: voice.is_initialized(),
                frames_since_note_on: voice.frames_since_note_on(),
            }
        })
    }
}
