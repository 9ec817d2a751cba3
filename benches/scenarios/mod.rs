//! Real-world scenario benchmarks.
//!
//! A single voice at each dispersion setting, and the full pool with every
//! voice ringing as it would after a fast run of notes.

mod pool;
mod voices;

pub use pool::bench_pool;
pub use voices::bench_voices;
