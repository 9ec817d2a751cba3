//! Low-level DSP primitives used by the resonator voices.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so they can be embedded directly inside voice structs. They stay focused on
//! the signal-processing math; voices layer pitch tracking and parameter
//! mapping on top.

/// Fixed-capacity stereo ring buffer with independent read/write cursors.
pub mod delay;
/// Stereo biquad filter covering the closed set of responses voices need.
pub mod filter;

pub use delay::StereoDelayLine;
pub use filter::{BiQuadFilter, FilterType};
