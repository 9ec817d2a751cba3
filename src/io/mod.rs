// Purpose - the host-facing seams: sample data in, runtime description in

pub mod runtime;
pub mod sample;

pub use runtime::RuntimeDesc;
pub use sample::{SampleBanks, SampleProvider, SampleWrapper};
