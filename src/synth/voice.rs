use std::f32::consts::TAU;

use crate::{
    dsp::{
        delay::StereoDelayLine,
        filter::{BiQuadFilter, FilterType},
    },
    io::sample::SampleWrapper,
    synth::message::NoteTarget,
    DELAY_LINE_FRAMES, DISPERSION_STAGES, SAMPLE_RATE_F32,
};

/*
Resonator Voice
===============

One voice is a stereo feedback loop around a delay line, excited by a
played-back sample. It is an extended Karplus-Strong string: whatever enters
the loop recirculates once per period and is filtered a little on each pass.

Signal Flow
-----------

    sample ──gain──> excitation filter ──> (+) ──clip──┬──> output (summed)
                                            ↑          │
                                            │          ↓
                   dispersion ←── damping ←── fractional ←── delay line
                   (all-pass x N)  (1-pole)   delay (AP1)

Vocabulary
----------

  period        sample_rate / frequency, in frames. The loop must delay by
                exactly this much for the note to sound at pitch.

  dispersion    Up to four first-order all-passes in the loop. They delay
                low partials more than high ones, stretching the overtone
                series like a stiff string or bar. Their delay at the
                fundamental is subtracted from the loop length so pitch holds.

  fractional    The integer part of the period comes from the delay line, the
  delay         rest from a first-order all-pass interpolator. Its fraction
                is kept in 0.2 .. 1.2 where the interpolator is well behaved.

  damping       A two-tap lowpass, x + (x[n-1] - x) * (1 - d). d = 1 leaves
                the loop bright, d = 0.5 averages neighbours.

  feedback      Loop gain. Negative values invert each pass, which drops
                the pitch an octave and leaves only odd harmonics. Key tracking
                raises |feedback| to a note-dependent power. At 100% an
                octave above middle C takes the square root, an octave below
                squares it.

Lifecycle
---------

A voice never goes back to idle. Once triggered it keeps rendering its
decaying loop until it is triggered again; the pool's stealing heuristic
(oldest trigger wins) is what eventually recycles it.
*/

/// Reference pitch: MIDI note 69 (A4) at 440 Hz.
const REFERENCE_FREQUENCY: f32 = 440.0;
const REFERENCE_NOTE: f32 = 69.0;
/// Key tracking pivots around middle C.
const KEY_TRACKING_NOTE: f32 = 60.0;
pub const PITCH_BEND_CENTER: u16 = 0x2000;

/// Cutoff of dispersion stage `i` relative to the fundamental. High ratios
/// disperse little, low ratios a lot.
pub const DISPERSION_RATIOS: [f32; DISPERSION_STAGES] = [10.4, 4.9, 2.2, 0.8];

/// Longest loop the delay line can hold, strictly below capacity - 2.
pub const MAX_DELAY_LENGTH: f32 = (DELAY_LINE_FRAMES - 3) as f32;
/// Shortest loop after dispersion compensation; keeps the integer delay >= 1.
const MIN_DELAY_LENGTH: f32 = 1.2;
const MIN_FRACTIONAL_DELAY: f32 = 0.2;

/// Loop samples are limited to this magnitude. Some clipping is fine.
const CLIP_LEVEL: f32 = 2.0;

/// Resonance settings, copied in at trigger and overwritten at release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResonanceSettings {
    /// Loop gain in 0.1 % (-1000 ..= 1000).
    pub feedback: i16,
    /// 0 (bright) ..= 100 (dark).
    pub damping: u16,
    /// Active dispersion stages, capped at [`DISPERSION_STAGES`].
    pub dispersion: u8,
    /// 0 ..= 100 %.
    pub keytrack: u16,
}

/// Everything a voice copies in when triggered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSettings {
    pub pitch_bend: u16,
    pub pitch_bend_range: i8,
    pub level_velocity_sensitivity: i8,
    pub filter_velocity_sensitivity: i8,
    /// `None` leaves the voice silent.
    pub sample: Option<SampleWrapper>,
    /// Per mille of the sample length.
    pub sample_start: u16,
    /// Per mille of the sample length.
    pub sample_end: u16,
    /// Tenths of a dB.
    pub excitation_level: i16,
    pub filter_type: FilterType,
    /// Hundreds of Hz.
    pub filter_cutoff: i16,
    /// Tenths of Q.
    pub filter_resonance: i16,
    pub resonance: ResonanceSettings,
}

/// A single resonator voice.
pub struct Voice {
    initialized: bool,
    gate: bool,
    note: u8,
    pitch_bend: u16,
    pitch_bend_range: i8,
    frames_since_note_on: usize,

    // Copied out of the sample wrapper at trigger time.
    sample_channels: u8,
    sample_data: &'static [f32],
    /// Read cursor in values, stride = channel count.
    sample_index: usize,
    sample_end: usize,

    excitation_level: f32,
    excitation_filter: BiQuadFilter,

    resonance: ResonanceSettings,

    damping_state: [f32; 2], // z^-1 of the damping filter
    dispersion_filters: [BiQuadFilter; DISPERSION_STAGES],
    fractional_delay_filter: BiQuadFilter,
    delay_line: StereoDelayLine,
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

impl Voice {
    pub fn new() -> Self {
        Self {
            initialized: false,
            gate: false,
            note: 0,
            pitch_bend: PITCH_BEND_CENTER,
            pitch_bend_range: 0,
            frames_since_note_on: usize::MAX,
            sample_channels: 1,
            sample_data: &[],
            sample_index: 0,
            sample_end: 0,
            excitation_level: 0.0,
            excitation_filter: BiQuadFilter::new(),
            resonance: ResonanceSettings {
                feedback: 0,
                damping: 0,
                dispersion: 0,
                keytrack: 0,
            },
            damping_state: [0.0; 2],
            dispersion_filters: [BiQuadFilter::new(); DISPERSION_STAGES],
            fractional_delay_filter: BiQuadFilter::new(),
            delay_line: StereoDelayLine::new(),
        }
    }

    /// Start a note, restarting the sample and marking this voice freshest.
    pub fn trigger(&mut self, note: u8, velocity: u8, settings: &TriggerSettings) {
        if self.gate {
            // Re-exciting a loop that is still ringing clicks; start clean.
            self.delay_line.clear();
        }

        self.note = note;
        self.pitch_bend = settings.pitch_bend;
        self.pitch_bend_range = settings.pitch_bend_range;

        if let Some(sample) = settings.sample {
            let channels = usize::from(sample.channels());
            let frames = sample.frames();
            let limit = frames * channels;

            self.sample_channels = sample.channels();
            self.sample_data = sample.data();
            self.sample_index = per_mille(frames, settings.sample_start) * channels;
            self.sample_end = (per_mille(frames, settings.sample_end) * channels).min(limit);
        }

        self.excitation_level = velocity_level(
            settings.excitation_level,
            velocity,
            settings.level_velocity_sensitivity,
        );
        let (cutoff, resonance) = velocity_filter(
            settings.filter_type,
            settings.filter_cutoff,
            settings.filter_resonance,
            velocity,
            settings.filter_velocity_sensitivity,
        );
        self.excitation_filter
            .init(settings.filter_type, cutoff, resonance);
        self.excitation_filter.reset();

        self.resonance = settings.resonance;

        self.initialized = settings.sample.is_some();
        self.gate = true;
        self.frames_since_note_on = 0;
        self.damping_state = [0.0; 2];
    }

    /// Switch to release feedback/damping if `target` addresses this voice.
    ///
    /// A specific note only matches while the voice is gated on that note.
    pub fn release(&mut self, target: NoteTarget, feedback: i16, damping: u16) {
        let matches = match target {
            NoteTarget::Specific(note) => self.gate && note == self.note,
            NoteTarget::All => true,
        };
        if matches {
            self.gate = false;
            self.resonance.feedback = feedback;
            self.resonance.damping = damping;
        }
    }

    /// Follow the pool's pitch bend while the key is held.
    pub fn pitch_bend(&mut self, bend: u16) {
        if self.gate {
            self.pitch_bend = bend;
        }
    }

    /// Add `frames` stereo frames of this voice into `out`.
    pub fn render(&mut self, out: &mut [f32], frames: usize) {
        let frames = frames.min(out.len() / 2);
        if !self.initialized || frames == 0 {
            return;
        }

        // Pitch
        let frequency = note_frequency(self.note, self.pitch_bend, self.pitch_bend_range);
        let mut delay_length = nominal_delay_length(frequency);

        // Dispersion, compensated so the fundamental stays in tune.
        let stages = usize::from(self.resonance.dispersion).min(DISPERSION_STAGES);
        let wt = TAU * frequency / SAMPLE_RATE_F32;
        for (filter, ratio) in self.dispersion_filters[..stages]
            .iter_mut()
            .zip(DISPERSION_RATIOS)
        {
            let cutoff = (frequency * ratio).min(SAMPLE_RATE_F32 / 2.01);
            filter.init(FilterType::Ap1, cutoff, 0.0);
            delay_length -= allpass_phase_delay(filter.b0(), wt);
        }

        // Fractional delay
        let (integer_length, fraction) = split_delay(delay_length.max(MIN_DELAY_LENGTH));
        let coefficient = (1.0 - fraction) / (1.0 + fraction);
        self.fractional_delay_filter
            .set_coefficients(coefficient, 1.0, 0.0, coefficient, 0.0);
        self.delay_line.set_length(integer_length);

        let gain = sample_gain(self.excitation_level);
        let damping = damping_coefficient(self.resonance.damping);
        let feedback =
            key_tracked_feedback(self.resonance.feedback, self.resonance.keytrack, self.note);

        let mut damping_state = self.damping_state;

        for frame in out[..frames * 2].chunks_exact_mut(2) {
            let excitation = self.next_excitation(gain);
            let excitation = self.excitation_filter.process(excitation);

            let delayed = self
                .fractional_delay_filter
                .process(self.delay_line.read());

            let mut feedback_value = [
                damping_state[0] + (delayed[0] - damping_state[0]) * damping,
                damping_state[1] + (delayed[1] - damping_state[1]) * damping,
            ];
            damping_state = delayed;

            for filter in &mut self.dispersion_filters[..stages] {
                feedback_value = filter.process(feedback_value);
            }

            // max/min rather than clamp: a NaN never reaches the loop.
            let result = [
                (excitation[0] + feedback_value[0] * feedback)
                    .max(-CLIP_LEVEL)
                    .min(CLIP_LEVEL),
                (excitation[1] + feedback_value[1] * feedback)
                    .max(-CLIP_LEVEL)
                    .min(CLIP_LEVEL),
            ];

            self.delay_line.write(result);
            self.delay_line.advance();

            frame[0] += result[0];
            frame[1] += result[1];
        }

        self.damping_state = damping_state;
        self.frames_since_note_on = self.frames_since_note_on.saturating_add(frames);
    }

    #[inline]
    fn next_excitation(&mut self, gain: f32) -> [f32; 2] {
        if self.sample_index >= self.sample_end {
            return [0.0; 2];
        }

        let i = self.sample_index;
        let frame = if self.sample_channels == 2 {
            [self.sample_data[i], self.sample_data[i + 1]]
        } else {
            [self.sample_data[i]; 2]
        };
        self.sample_index += usize::from(self.sample_channels);

        [frame[0] * gain, frame[1] * gain]
    }

    /// Frames rendered since the last trigger; `usize::MAX` for a voice that
    /// has no valid sample, which makes it the first choice for stealing.
    pub fn frames_since_note_on(&self) -> usize {
        if !self.initialized {
            return usize::MAX;
        }
        self.frames_since_note_on
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_gated(&self) -> bool {
        self.gate
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn current_pitch_bend(&self) -> u16 {
        self.pitch_bend
    }

    pub fn resonance(&self) -> ResonanceSettings {
        self.resonance
    }

    /// Excitation level after velocity, in tenths of a dB.
    pub fn excitation_level(&self) -> f32 {
        self.excitation_level
    }

    /// Sample read cursor and end, in values (frames x channels).
    pub fn sample_cursor(&self) -> (usize, usize) {
        (self.sample_index, self.sample_end)
    }

    pub fn delay_line(&self) -> &StereoDelayLine {
        &self.delay_line
    }
}

/// Frequency of `note` with the 14-bit `pitch_bend` applied.
///
/// `pitch_bend_range` scales the full bend swing: the offset in semitones is
/// `range * (bend - 0x2000) / 0x4000`.
pub fn note_frequency(note: u8, pitch_bend: u16, pitch_bend_range: i8) -> f32 {
    let bend = f32::from(pitch_bend_range) * (f32::from(pitch_bend) - f32::from(PITCH_BEND_CENTER))
        / 16384.0;
    REFERENCE_FREQUENCY * 2.0_f32.powf((f32::from(note) + bend - REFERENCE_NOTE) / 12.0)
}

/// Loop length in frames for `frequency`, limited to what the delay line
/// holds.
pub fn nominal_delay_length(frequency: f32) -> f32 {
    (SAMPLE_RATE_F32 / frequency).min(MAX_DELAY_LENGTH)
}

/// Phase delay in frames of a first-order all-pass with coefficient `a`, at
/// normalised angular frequency `wt`.
fn allpass_phase_delay(a: f32, wt: f32) -> f32 {
    let (sin, cos) = wt.sin_cos();
    ((sin / (a + cos)).atan() - (sin / (a.recip() + cos)).atan()) / wt
}

/// Integer and fractional parts of `length`, fraction in `0.2 .. 1.2`.
pub fn split_delay(length: f32) -> (usize, f32) {
    let mut integer = length as usize;
    if length - (integer as f32) < MIN_FRACTIONAL_DELAY {
        integer = integer.saturating_sub(1);
    }
    (integer, length - integer as f32)
}

/// Excitation level in tenths of a dB, offset by up to +-6 dB at full
/// velocity sensitivity.
fn velocity_level(level: i16, velocity: u8, sensitivity: i8) -> f32 {
    f32::from(level) + 60.0 * velocity_offset(velocity) * f32::from(sensitivity) / 100.0
}

/// Excitation filter cutoff (Hz) and Q after velocity.
///
/// Lowpass cutoff rises and highpass cutoff falls by up to an octave either
/// way; bandpass Q scales by 0.25 .. 4.
pub fn velocity_filter(
    filter_type: FilterType,
    cutoff: i16,
    resonance: i16,
    velocity: u8,
    sensitivity: i8,
) -> (f32, f32) {
    let amount = velocity_offset(velocity) * f32::from(sensitivity) / 100.0;
    let mut cutoff = f32::from(cutoff) * 100.0;
    let mut resonance = f32::from(resonance) / 10.0;

    match filter_type {
        FilterType::Lp6 | FilterType::Lp12 => cutoff *= 2.0_f32.powf(amount),
        FilterType::Hp6 | FilterType::Hp12 => cutoff /= 2.0_f32.powf(amount),
        FilterType::Bp6 => resonance *= 4.0_f32.powf(amount),
        FilterType::None | FilterType::Ap1 => {}
    }

    (cutoff.min(SAMPLE_RATE_F32 / 2.0), resonance)
}

/// -1 .. ~1 around the centre velocity of 64.
fn velocity_offset(velocity: u8) -> f32 {
    (f32::from(velocity) - 64.0) / 64.0
}

/// Linear gain for a level in tenths of a dB. Deliberately steeper than dB:
/// every 3 dB doubles the amplitude.
fn sample_gain(level: f32) -> f32 {
    2.0_f32.powf(level / 30.0)
}

/// Map damping 0 ..= 100 to a damping-filter coefficient 1.0 ..= 0.5.
fn damping_coefficient(damping: u16) -> f32 {
    1.0 - f32::from(damping) / 200.0
}

/// Loop gain for `note` with key tracking applied.
///
/// keytrack = 0: the same gain everywhere, so low notes ring longer.
/// keytrack = 100: an octave up takes the square root, an octave down squares.
pub fn key_tracked_feedback(feedback: i16, keytrack: u16, note: u8) -> f32 {
    let octaves = (f32::from(note) - KEY_TRACKING_NOTE) / 12.0;
    let exponent = 0.5_f32.powf(f32::from(keytrack) / 100.0 * octaves);
    let magnitude = (f32::from(feedback) / 1000.0).abs().powf(exponent);
    magnitude.copysign(f32::from(feedback))
}

fn per_mille(frames: usize, fraction: u16) -> usize {
    frames * usize::from(fraction) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    static CLICK: [f32; 4] = [1.0, 0.0, 0.0, 0.0];
    static RAMP: [f32; 1000] = {
        let mut data = [0.0; 1000];
        let mut i = 0;
        while i < 1000 {
            data[i] = 0.001;
            i += 1;
        }
        data
    };
    static STEREO: [f32; 8] = [1.0, -1.0, 0.5, -0.5, 0.0, 0.0, 0.0, 0.0];

    fn settings(sample: Option<SampleWrapper>) -> TriggerSettings {
        TriggerSettings {
            pitch_bend: PITCH_BEND_CENTER,
            pitch_bend_range: 2,
            level_velocity_sensitivity: 0,
            filter_velocity_sensitivity: 0,
            sample,
            sample_start: 0,
            sample_end: 1000,
            excitation_level: 0,
            filter_type: FilterType::None,
            filter_cutoff: 500,
            filter_resonance: 10,
            resonance: ResonanceSettings {
                feedback: 990,
                damping: 20,
                dispersion: 0,
                keytrack: 100,
            },
        }
    }

    fn click() -> Option<SampleWrapper> {
        SampleWrapper::from_interleaved(1, &CLICK)
    }

    fn render(voice: &mut Voice, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * 2];
        voice.render(&mut out, frames);
        out
    }

    #[test]
    fn test_untriggered_voice_is_silent_and_stealable() {
        let mut voice = Voice::new();
        assert!(!voice.is_initialized());
        assert!(!voice.is_gated());
        assert_eq!(voice.frames_since_note_on(), usize::MAX);

        let out = render(&mut voice, 64);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(voice.frames_since_note_on(), usize::MAX);
    }

    #[test]
    fn test_trigger_without_sample_gates_but_stays_silent() {
        let mut voice = Voice::new();
        voice.trigger(60, 100, &settings(None));

        assert!(voice.is_gated());
        assert!(!voice.is_initialized());
        assert_eq!(voice.frames_since_note_on(), usize::MAX);

        for _ in 0..4 {
            assert!(render(&mut voice, 128).iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn test_trigger_marks_voice_freshest() {
        let mut voice = Voice::new();
        voice.trigger(60, 100, &settings(click()));

        assert!(voice.is_initialized());
        assert!(voice.is_gated());
        assert_eq!(voice.frames_since_note_on(), 0);

        render(&mut voice, 64);
        render(&mut voice, 32);
        assert_eq!(voice.frames_since_note_on(), 96);
    }

    #[test]
    fn test_render_accumulates_into_output() {
        let mut voice = Voice::new();
        voice.trigger(60, 64, &settings(click()));

        let mut out = vec![0.5; 8];
        voice.render(&mut out, 4);

        // The click passes straight through on the first frame.
        assert!((out[0] - 1.5).abs() < 1e-6);
        assert!((out[1] - 1.5).abs() < 1e-6);
        assert!((out[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_stereo_sample_keeps_channels_apart() {
        let mut voice = Voice::new();
        let sample = SampleWrapper::from_interleaved(2, &STEREO);
        voice.trigger(60, 64, &settings(sample));

        let out = render(&mut voice, 2);
        assert_eq!(&out[..4], &[1.0, -1.0, 0.5, -0.5]);
    }

    #[test]
    fn test_zero_frame_render_changes_nothing() {
        let mut voice = Voice::new();
        voice.trigger(60, 100, &settings(click()));
        render(&mut voice, 100);

        let before = (
            voice.frames_since_note_on(),
            voice.sample_cursor(),
            voice.delay_line().read_pos(),
            voice.delay_line().write_pos(),
        );
        let mut out: Vec<f32> = Vec::new();
        voice.render(&mut out, 0);
        voice.render(&mut [0.0; 4], 0);

        let after = (
            voice.frames_since_note_on(),
            voice.sample_cursor(),
            voice.delay_line().read_pos(),
            voice.delay_line().write_pos(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_retrigger_while_gated_clears_delay_line() {
        let mut voice = Voice::new();
        voice.trigger(60, 100, &settings(click()));
        render(&mut voice, 512);
        assert!(!voice.delay_line().is_silent());

        voice.trigger(64, 100, &settings(click()));
        assert!(voice.delay_line().is_silent());
    }

    #[test]
    fn test_retrigger_after_release_keeps_ringing_loop() {
        let mut voice = Voice::new();
        voice.trigger(60, 100, &settings(click()));
        render(&mut voice, 512);
        voice.release(NoteTarget::Specific(60), 950, 80);

        voice.trigger(64, 100, &settings(click()));
        assert!(!voice.delay_line().is_silent());
    }

    #[test]
    fn test_release_only_matches_sounding_note() {
        let mut voice = Voice::new();
        voice.trigger(60, 100, &settings(click()));

        voice.release(NoteTarget::Specific(61), 500, 90);
        assert!(voice.is_gated());
        assert_eq!(voice.resonance().feedback, 990);

        voice.release(NoteTarget::Specific(60), 500, 90);
        assert!(!voice.is_gated());
        assert_eq!(voice.resonance().feedback, 500);
        assert_eq!(voice.resonance().damping, 90);

        // Already released: a second note-off is a no-op.
        voice.release(NoteTarget::Specific(60), 100, 10);
        assert_eq!(voice.resonance().feedback, 500);
    }

    #[test]
    fn test_release_all_matches_any_note() {
        let mut voice = Voice::new();
        voice.trigger(42, 100, &settings(click()));
        voice.release(NoteTarget::All, 800, 50);

        assert!(!voice.is_gated());
        assert_eq!(voice.resonance().feedback, 800);
        assert_eq!(voice.resonance().damping, 50);
    }

    #[test]
    fn test_pitch_bend_only_while_gated() {
        let mut voice = Voice::new();
        voice.pitch_bend(0x3000);
        assert_eq!(voice.current_pitch_bend(), PITCH_BEND_CENTER);

        voice.trigger(60, 100, &settings(click()));
        voice.pitch_bend(0x3000);
        assert_eq!(voice.current_pitch_bend(), 0x3000);

        voice.release(NoteTarget::Specific(60), 950, 80);
        voice.pitch_bend(0x1000);
        assert_eq!(voice.current_pitch_bend(), 0x3000);
    }

    #[test]
    fn test_sample_range_is_per_mille() {
        let mut voice = Voice::new();
        let mut s = settings(SampleWrapper::from_interleaved(1, &RAMP));
        s.sample_start = 250;
        s.sample_end = 500;
        voice.trigger(60, 64, &s);
        assert_eq!(voice.sample_cursor(), (250, 500));

        render(&mut voice, 300);
        assert_eq!(voice.sample_cursor(), (500, 500));
    }

    #[test]
    fn test_sample_end_never_passes_data() {
        let mut voice = Voice::new();
        let mut s = settings(SampleWrapper::from_interleaved(1, &RAMP));
        s.sample_end = 5000;
        voice.trigger(60, 64, &s);
        assert_eq!(voice.sample_cursor(), (0, 1000));

        s.sample_start = 2000;
        voice.trigger(60, 64, &s);
        render(&mut voice, 16);
        assert_eq!(voice.sample_cursor(), (2000, 1000));
    }

    #[test]
    fn test_output_is_clipped() {
        let mut voice = Voice::new();
        let mut s = settings(SampleWrapper::from_interleaved(1, &RAMP));
        s.excitation_level = 600; // 2^20
        s.resonance.feedback = 1000;
        s.resonance.damping = 0;
        voice.trigger(60, 64, &s);

        let out = render(&mut voice, 2048);
        assert!(out.iter().all(|s| s.abs() <= CLIP_LEVEL));
        assert!(out.iter().any(|s| s.abs() == CLIP_LEVEL));
    }

    #[test]
    fn test_velocity_offsets_level_by_six_db() {
        assert_eq!(velocity_level(0, 64, 100), 0.0);
        assert_eq!(velocity_level(0, 0, 100), -60.0);
        assert!((velocity_level(0, 127, 100) - 60.0 * 63.0 / 64.0).abs() < 1e-4);
        assert!((velocity_level(30, 0, 50) - 0.0).abs() < 1e-4);
        assert_eq!(velocity_level(-100, 0, 0), -100.0);
        assert_eq!(velocity_level(0, 0, -100), 60.0);
    }

    #[test]
    fn test_velocity_filter_mapping() {
        let full = 2.0_f32.powf(63.0 / 64.0);

        let (cutoff, q) = velocity_filter(FilterType::Lp12, 10, 10, 127, 100);
        assert!((cutoff - 1000.0 * full).abs() < 0.5);
        assert_eq!(q, 1.0);

        let (cutoff, _) = velocity_filter(FilterType::Hp6, 10, 10, 0, 100);
        assert!((cutoff - 2000.0).abs() < 0.5);

        let (cutoff, q) = velocity_filter(FilterType::Bp6, 10, 10, 0, 100);
        assert_eq!(cutoff, 1000.0);
        assert!((q - 0.25).abs() < 1e-6);

        let (cutoff, q) = velocity_filter(FilterType::None, 10, 20, 0, 100);
        assert_eq!((cutoff, q), (1000.0, 2.0));

        // 500 x 100 Hz is well past Nyquist.
        let (cutoff, _) = velocity_filter(FilterType::Lp6, 500, 10, 64, 0);
        assert_eq!(cutoff, SAMPLE_RATE_F32 / 2.0);
    }

    #[test]
    fn test_key_tracking_warps_feedback() {
        assert!((key_tracked_feedback(810, 0, 84) - 0.81).abs() < 1e-6);
        assert!((key_tracked_feedback(810, 100, 60) - 0.81).abs() < 1e-6);
        assert!((key_tracked_feedback(810, 100, 72) - 0.9).abs() < 1e-5);
        assert!((key_tracked_feedback(900, 100, 48) - 0.81).abs() < 1e-5);
        assert!((key_tracked_feedback(-810, 100, 72) + 0.9).abs() < 1e-5);
        assert_eq!(key_tracked_feedback(0, 100, 30), 0.0);
    }

    #[test]
    fn test_damping_range() {
        assert_eq!(damping_coefficient(0), 1.0);
        assert_eq!(damping_coefficient(100), 0.5);
    }

    #[test]
    fn test_sample_gain_doubles_every_three_db() {
        assert_eq!(sample_gain(0.0), 1.0);
        assert!((sample_gain(30.0) - 2.0).abs() < 1e-6);
        assert!((sample_gain(-60.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_note_frequency_reference() {
        assert!((note_frequency(69, PITCH_BEND_CENTER, 2) - 440.0).abs() < 1e-3);
        assert!((note_frequency(81, PITCH_BEND_CENTER, 12) - 880.0).abs() < 1e-2);
        assert!((note_frequency(60, PITCH_BEND_CENTER, 2) - 261.6256).abs() < 1e-2);

        // Full upward bend with range 24 is +12 semitones (range spans both ways).
        assert!((note_frequency(69, 0x4000, 24) - 880.0).abs() < 1e-2);
        assert!((note_frequency(69, 0, 24) - 220.0).abs() < 1e-2);
    }

    #[test]
    fn test_split_keeps_fraction_in_stable_range() {
        for length in [1.2_f32, 1.9, 2.0, 2.1, 183.47, 500.0, 500.19, 8188.5] {
            let (integer, fraction) = split_delay(length);
            assert!(integer >= 1, "{length}");
            assert!((0.2..1.2).contains(&fraction), "{length}: {fraction}");
            assert!((integer as f32 + fraction - length).abs() < 1e-3);
        }
    }

    #[test]
    fn test_delay_length_stays_inside_capacity() {
        for note in 0..=127u8 {
            for bend in [0u16, 0x1000, PITCH_BEND_CENTER, 0x3000, 0x3fff] {
                for range in [0i8, 2, 12, 24, 127] {
                    let length = nominal_delay_length(note_frequency(note, bend, range));
                    assert!(length < (DELAY_LINE_FRAMES - 2) as f32);
                    assert!(length > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_dispersion_compensation_keeps_loop_positive() {
        for note in [0u8, 24, 60, 96, 120, 127] {
            let mut voice = Voice::new();
            let mut s = settings(click());
            s.resonance.dispersion = DISPERSION_STAGES as u8;
            voice.trigger(note, 127, &s);

            let out = render(&mut voice, 1024);
            assert!(out.iter().all(|s| s.is_finite()), "note {note}");
            let (read, write) = (voice.delay_line().read_pos(), voice.delay_line().write_pos());
            assert_ne!(read, write, "note {note}");
        }
    }

    #[test]
    fn test_dispersion_stage_count_is_capped() {
        let mut voice = Voice::new();
        let mut s = settings(click());
        s.resonance.dispersion = 200;
        voice.trigger(60, 100, &s);

        let out = render(&mut voice, 256);
        assert!(out.iter().all(|s| s.is_finite()));
    }
}
