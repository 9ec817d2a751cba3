use tracing::{debug, warn};

use crate::{
    error::Result,
    io::{
        runtime::RuntimeDesc,
        sample::{SampleProvider, SampleWrapper},
    },
    synth::{
        message::{ControlMessage, MessageReceiver, NoteTarget},
        params::{ParamId, Params},
        voice::{ResonanceSettings, TriggerSettings, Voice, PITCH_BEND_CENTER},
    },
    NUM_VOICES,
};

/// The voice pool: a fixed array of [`Voice`]s sharing one parameter set.
///
/// Control methods take `&mut self`. Hosts that drive the pool from another
/// thread send [`ControlMessage`]s instead and call [`Resonator::render_with`],
/// which applies them at the top of the block.
pub struct Resonator<P: SampleProvider> {
    provider: P,
    params: Params,
    pitch_bend: u16,
    voices: [Voice; NUM_VOICES],
}

impl<P: SampleProvider> Resonator<P> {
    /// Validate `desc` and build the pool. All allocation happens here.
    pub fn new(desc: RuntimeDesc<P>) -> Result<Self> {
        if let Err(err) = desc.validate() {
            warn!(
                %err,
                sample_rate = desc.sample_rate,
                output_channels = desc.output_channels,
                "rejecting runtime description"
            );
            return Err(err);
        }

        debug!(
            voices = NUM_VOICES,
            frames_per_buffer = desc.frames_per_buffer,
            banks = desc.provider.num_banks(),
            "resonator initialised"
        );

        Ok(Self {
            provider: desc.provider,
            params: Params::default(),
            pitch_bend: PITCH_BEND_CENTER,
            voices: std::array::from_fn(|_| Voice::new()),
        })
    }

    /// Zero `frames` stereo frames of `out` and mix every voice into them.
    pub fn render(&mut self, out: &mut [f32], frames: usize) {
        let frames = frames.min(out.len() / 2);
        out[..frames * 2].fill(0.0);

        for voice in &mut self.voices {
            voice.render(out, frames);
        }
    }

    /// Apply every pending message, then render.
    pub fn render_with<R: MessageReceiver>(&mut self, rx: &mut R, out: &mut [f32], frames: usize) {
        while let Some(message) = rx.pop() {
            self.handle_message(message);
        }
        self.render(out, frames);
    }

    pub fn handle_message(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            ControlMessage::NoteOff { note } => self.note_off(note),
            ControlMessage::GateOn { velocity } => self.gate_on(velocity),
            ControlMessage::GateOff => self.gate_off(),
            ControlMessage::AllNotesOff => self.all_notes_off(),
            ControlMessage::PitchBend { value } => self.pitch_bend(value),
            ControlMessage::SetParameter { id, value } => self.set_parameter(id, value),
        }
    }

    /// Trigger `note` on the stealing candidate.
    pub fn note_on(&mut self, note: u8, velocity: u8) {
        let settings = self.trigger_settings();
        let index = self.next_voice_index();
        self.voices[index].trigger(note, velocity, &settings);
    }

    pub fn note_off(&mut self, note: u8) {
        self.release(NoteTarget::Specific(note));
    }

    pub fn all_notes_off(&mut self) {
        self.release(NoteTarget::All);
    }

    /// Trigger the base note from the parameter set.
    pub fn gate_on(&mut self, velocity: u8) {
        self.note_on(self.params.note, velocity);
    }

    pub fn gate_off(&mut self) {
        self.note_off(self.params.note);
    }

    pub fn pitch_bend(&mut self, bend: u16) {
        self.pitch_bend = bend;
        for voice in &mut self.voices {
            voice.pitch_bend(bend);
        }
    }

    /// Store into the parameter behind `id`. Unknown ids are ignored.
    pub fn set_parameter(&mut self, id: u8, value: i32) {
        if let Some(id) = ParamId::from_index(id) {
            self.params.set(id, value);
        }
    }

    /// Unknown ids read as 0.
    pub fn get_parameter(&self, id: u8) -> i32 {
        ParamId::from_index(id).map_or(0, |id| self.params.get(id))
    }

    /// Display string for string-valued parameters.
    pub fn parameter_str_value(&self, id: u8, value: i32) -> Option<&'static str> {
        ParamId::from_index(id)?.str_value(value)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn current_pitch_bend(&self) -> u16 {
        self.pitch_bend
    }

    pub fn voices(&self) -> &[Voice; NUM_VOICES] {
        &self.voices
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn release(&mut self, target: NoteTarget) {
        let (feedback, damping) = (self.params.release_feedback, self.params.release_damping);
        for voice in &mut self.voices {
            voice.release(target, feedback, damping);
        }
    }

    /// The voice that has gone longest since its trigger, skipping voice 0.
    ///
    /// Voice 0 is only chosen when no other voice is older than 0 frames.
    /// Ties go to the lowest index.
    fn next_voice_index(&self) -> usize {
        let mut best = 0;
        let mut longest = 0;
        for (index, voice) in self.voices.iter().enumerate().skip(1) {
            let frames = voice.frames_since_note_on();
            if frames > longest {
                longest = frames;
                best = index;
            }
        }
        best
    }

    fn lookup_sample(&self) -> Option<SampleWrapper> {
        let bank = self.params.sample_bank;
        let index = self.params.sample_number.checked_sub(1)?;

        if bank >= self.provider.num_banks() || index >= self.provider.num_samples(bank) {
            return None;
        }
        self.provider.sample(bank, index)
    }

    fn trigger_settings(&self) -> TriggerSettings {
        let params = &self.params;
        TriggerSettings {
            pitch_bend: self.pitch_bend,
            pitch_bend_range: params.pitch_bend_range,
            level_velocity_sensitivity: params.level_velocity_sensitivity,
            filter_velocity_sensitivity: params.filter_velocity_sensitivity,
            sample: self.lookup_sample(),
            sample_start: params.sample_start,
            sample_end: params.sample_end,
            excitation_level: params.excitation_level,
            filter_type: params.excitation_filter_type,
            filter_cutoff: params.excitation_filter_cutoff,
            filter_resonance: params.excitation_filter_resonance,
            resonance: ResonanceSettings {
                feedback: params.decay_feedback,
                damping: params.decay_damping,
                dispersion: params.dispersion,
                keytrack: params.key_tracking,
            },
        }
    }
}
