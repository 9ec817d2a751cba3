//! Initialization errors.
//!
//! Only construction can fail. Rendering and the note/parameter control
//! surface are infallible: a bad sample lookup produces a silent voice, not an
//! error.

use thiserror::Error;

/// Result type alias for resonator construction.
pub type Result<T> = std::result::Result<T, InitError>;

/// Reasons the host runtime description can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InitError {
    /// The runtime description is unusable (e.g. a zero-frame block size).
    #[error("invalid runtime descriptor")]
    InvalidDescriptor,

    /// The engine only runs at its compiled sample rate.
    #[error("unsupported sample rate: {0} Hz (expected {expected} Hz)", expected = crate::SAMPLE_RATE)]
    UnsupportedSampleRate(u32),

    /// The engine only renders interleaved stereo.
    #[error("unsupported output geometry: {output_channels} channels (expected 2)")]
    UnsupportedGeometry { output_channels: u8 },

    /// Reserved: construction currently sizes everything up front.
    #[error("out of memory")]
    OutOfMemory,
}

impl InitError {
    /// Numeric status code as reported across the host ABI.
    pub fn code(self) -> i8 {
        match self {
            InitError::InvalidDescriptor => -32,
            InitError::UnsupportedSampleRate(_) => -4,
            InitError::UnsupportedGeometry { .. } => -8,
            InitError::OutOfMemory => -16,
        }
    }
}
