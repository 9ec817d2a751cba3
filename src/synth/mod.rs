// Purpose: Voice management, polyphony, parameter routing
// This layer sits above the dsp primitives and owns every voice

pub mod message;
pub mod params;
pub mod pool;
pub mod voice;
