//! Shared voice parameters and their published table.
//!
//! Numeric ids are stable: id `n` always addresses the same field and the
//! `n`th entry of [`PARAM_DESCRIPTORS`]. The get/set mapping stores values
//! as-is (truncated to the field's width); range limits are the host's
//! business, described by the descriptor table.

use crate::dsp::filter::FilterType;

/// Names for the sample-bank parameter, indexed by bank number.
pub const SAMPLE_BANK_NAMES: [&str; 7] = ["CH", "OH", "RS", "CP", "MISC", "USER", "EXP"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParamId {
    Note = 0,
    PitchBendRange = 1,
    LevelVelocitySensitivity = 2,
    FilterVelocitySensitivity = 3,
    SampleBank = 4,
    SampleNumber = 5,
    SampleStart = 6,
    SampleEnd = 7,
    ExcitationLevel = 8,
    ExcitationFilterType = 9,
    ExcitationFilterCutoff = 10,
    ExcitationFilterResonance = 11,
    DecayFeedback = 12,
    DecayDamping = 13,
    Dispersion = 14,
    KeyTracking = 15,
    ReleaseFeedback = 16,
    ReleaseDamping = 17,
}

impl ParamId {
    pub const COUNT: usize = 18;

    pub const ALL: [ParamId; Self::COUNT] = [
        ParamId::Note,
        ParamId::PitchBendRange,
        ParamId::LevelVelocitySensitivity,
        ParamId::FilterVelocitySensitivity,
        ParamId::SampleBank,
        ParamId::SampleNumber,
        ParamId::SampleStart,
        ParamId::SampleEnd,
        ParamId::ExcitationLevel,
        ParamId::ExcitationFilterType,
        ParamId::ExcitationFilterCutoff,
        ParamId::ExcitationFilterResonance,
        ParamId::DecayFeedback,
        ParamId::DecayDamping,
        ParamId::Dispersion,
        ParamId::KeyTracking,
        ParamId::ReleaseFeedback,
        ParamId::ReleaseDamping,
    ];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn descriptor(self) -> &'static ParamDescriptor {
        &PARAM_DESCRIPTORS[self as usize]
    }

    /// Display string for `value`, for parameters backed by a string table.
    pub fn str_value(self, value: i32) -> Option<&'static str> {
        let index = usize::try_from(value).ok()?;
        match self {
            ParamId::SampleBank => SAMPLE_BANK_NAMES.get(index).copied(),
            ParamId::ExcitationFilterType => FilterType::NAMES.get(index).copied(),
            _ => None,
        }
    }
}

impl TryFrom<u8> for ParamId {
    type Error = u8;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(index)
    }
}

/// How a host should display a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Numeric,
    /// Value indexes a string table, see [`ParamId::str_value`].
    Strings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub min: i16,
    pub max: i16,
    pub default: i16,
    pub kind: ParamKind,
}

const fn numeric(name: &'static str, min: i16, max: i16, default: i16) -> ParamDescriptor {
    ParamDescriptor {
        name,
        min,
        max,
        default,
        kind: ParamKind::Numeric,
    }
}

const fn strings(name: &'static str, max: i16, default: i16) -> ParamDescriptor {
    ParamDescriptor {
        name,
        min: 0,
        max,
        default,
        kind: ParamKind::Strings,
    }
}

/// Published parameter table, indexed by [`ParamId`].
pub const PARAM_DESCRIPTORS: [ParamDescriptor; ParamId::COUNT] = [
    // Pitch and velocity
    numeric("Note", 0, 127, 60),
    numeric("Bend Range", 0, 24, 2),
    numeric("Lvl Vel", -100, 100, 0),
    numeric("Flt Vel", -100, 100, 0),
    // Sample
    strings("Bank", 6, 0),
    numeric("Sample", 1, 128, 1),
    numeric("Start", 0, 1000, 0),
    numeric("End", 0, 1000, 1000),
    // Excitation (level in 0.1 dB, cutoff in 100 Hz, resonance in 0.1 Q)
    numeric("Level", -600, 600, 0),
    strings("Filter", 5, 0),
    numeric("Cutoff", 0, 500, 500),
    numeric("Resonance", 0, 100, 10),
    // Decay (feedback in 0.1 %)
    numeric("Decay Fb", -1000, 1000, 990),
    numeric("Decay Damp", 0, 100, 20),
    numeric("Dispersion", 0, crate::DISPERSION_STAGES as i16, 0),
    numeric("Key Track", 0, 100, 100),
    // Release
    numeric("Release Fb", -1000, 1000, 950),
    numeric("Release Damp", 0, 100, 80),
];

/// Values shared by every voice; copied into a voice when it is triggered
/// or released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub note: u8,
    pub pitch_bend_range: i8,
    pub level_velocity_sensitivity: i8,
    pub filter_velocity_sensitivity: i8,
    pub sample_bank: u8,
    /// 1-based.
    pub sample_number: u8,
    /// Per mille of the sample length.
    pub sample_start: u16,
    /// Per mille of the sample length.
    pub sample_end: u16,
    pub excitation_level: i16,
    pub excitation_filter_type: FilterType,
    pub excitation_filter_cutoff: i16,
    pub excitation_filter_resonance: i16,
    pub decay_feedback: i16,
    pub decay_damping: u16,
    pub dispersion: u8,
    pub key_tracking: u16,
    pub release_feedback: i16,
    pub release_damping: u16,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            note: 60,
            pitch_bend_range: 2,
            level_velocity_sensitivity: 0,
            filter_velocity_sensitivity: 0,
            sample_bank: 0,
            sample_number: 1,
            sample_start: 0,
            sample_end: 1000,
            excitation_level: 0,
            excitation_filter_type: FilterType::None,
            excitation_filter_cutoff: 500,
            excitation_filter_resonance: 10,
            decay_feedback: 990,
            decay_damping: 20,
            dispersion: 0,
            key_tracking: 100,
            release_feedback: 950,
            release_damping: 80,
        }
    }
}

impl Params {
    pub fn get(&self, id: ParamId) -> i32 {
        match id {
            ParamId::Note => self.note.into(),
            ParamId::PitchBendRange => self.pitch_bend_range.into(),
            ParamId::LevelVelocitySensitivity => self.level_velocity_sensitivity.into(),
            ParamId::FilterVelocitySensitivity => self.filter_velocity_sensitivity.into(),
            ParamId::SampleBank => self.sample_bank.into(),
            ParamId::SampleNumber => self.sample_number.into(),
            ParamId::SampleStart => self.sample_start.into(),
            ParamId::SampleEnd => self.sample_end.into(),
            ParamId::ExcitationLevel => self.excitation_level.into(),
            ParamId::ExcitationFilterType => self.excitation_filter_type.index(),
            ParamId::ExcitationFilterCutoff => self.excitation_filter_cutoff.into(),
            ParamId::ExcitationFilterResonance => self.excitation_filter_resonance.into(),
            ParamId::DecayFeedback => self.decay_feedback.into(),
            ParamId::DecayDamping => self.decay_damping.into(),
            ParamId::Dispersion => self.dispersion.into(),
            ParamId::KeyTracking => self.key_tracking.into(),
            ParamId::ReleaseFeedback => self.release_feedback.into(),
            ParamId::ReleaseDamping => self.release_damping.into(),
        }
    }

    /// Store `value` into the field behind `id`.
    ///
    /// No clamping: values are truncated to the field's width. A filter-type
    /// index outside the enum leaves the field untouched.
    pub fn set(&mut self, id: ParamId, value: i32) {
        match id {
            ParamId::Note => self.note = value as u8,
            ParamId::PitchBendRange => self.pitch_bend_range = value as i8,
            ParamId::LevelVelocitySensitivity => self.level_velocity_sensitivity = value as i8,
            ParamId::FilterVelocitySensitivity => self.filter_velocity_sensitivity = value as i8,
            ParamId::SampleBank => self.sample_bank = value as u8,
            ParamId::SampleNumber => self.sample_number = value as u8,
            ParamId::SampleStart => self.sample_start = value as u16,
            ParamId::SampleEnd => self.sample_end = value as u16,
            ParamId::ExcitationLevel => self.excitation_level = value as i16,
            ParamId::ExcitationFilterType => {
                if let Some(filter_type) = FilterType::from_index(value) {
                    self.excitation_filter_type = filter_type;
                }
            }
            ParamId::ExcitationFilterCutoff => self.excitation_filter_cutoff = value as i16,
            ParamId::ExcitationFilterResonance => self.excitation_filter_resonance = value as i16,
            ParamId::DecayFeedback => self.decay_feedback = value as i16,
            ParamId::DecayDamping => self.decay_damping = value as u16,
            ParamId::Dispersion => self.dispersion = value as u8,
            ParamId::KeyTracking => self.key_tracking = value as u16,
            ParamId::ReleaseFeedback => self.release_feedback = value as i16,
            ParamId::ReleaseDamping => self.release_damping = value as u16,
        }
    }
}
