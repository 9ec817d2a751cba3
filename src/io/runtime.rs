use crate::{
    error::{InitError, Result},
    SAMPLE_RATE,
};

/// What the host tells the engine about itself at load time.
///
/// Built fluently from the provider, then handed to
/// [`Resonator::new`](crate::Resonator::new) which validates it.
#[derive(Debug, Clone)]
pub struct RuntimeDesc<P> {
    pub sample_rate: u32,
    pub frames_per_buffer: u16,
    pub input_channels: u8,
    pub output_channels: u8,
    pub provider: P,
}

impl<P> RuntimeDesc<P> {
    /// Stereo out, no input, 64-frame blocks at the engine's sample rate.
    pub fn new(provider: P) -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            frames_per_buffer: 64,
            input_channels: 0,
            output_channels: 2,
            provider,
        }
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn frames_per_buffer(mut self, frames: u16) -> Self {
        self.frames_per_buffer = frames;
        self
    }

    pub fn input_channels(mut self, channels: u8) -> Self {
        self.input_channels = channels;
        self
    }

    pub fn output_channels(mut self, channels: u8) -> Self {
        self.output_channels = channels;
        self
    }

    /// Check the description against what the engine can render.
    pub fn validate(&self) -> Result<()> {
        if self.frames_per_buffer == 0 {
            return Err(InitError::InvalidDescriptor);
        }
        if self.sample_rate != SAMPLE_RATE {
            return Err(InitError::UnsupportedSampleRate(self.sample_rate));
        }
        if self.output_channels != 2 {
            return Err(InitError::UnsupportedGeometry {
                output_channels: self.output_channels,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_description_is_valid() {
        assert_eq!(RuntimeDesc::new(()).validate(), Ok(()));
    }

    #[test]
    fn rejects_other_sample_rates() {
        let desc = RuntimeDesc::new(()).sample_rate(44_100);
        assert_eq!(
            desc.validate(),
            Err(InitError::UnsupportedSampleRate(44_100))
        );
    }

    #[test]
    fn rejects_non_stereo_output() {
        for channels in [0, 1, 4] {
            let desc = RuntimeDesc::new(()).output_channels(channels);
            assert_eq!(
                desc.validate(),
                Err(InitError::UnsupportedGeometry {
                    output_channels: channels
                })
            );
        }
    }

    #[test]
    fn rejects_empty_blocks() {
        let desc = RuntimeDesc::new(()).frames_per_buffer(0);
        assert_eq!(desc.validate(), Err(InitError::InvalidDescriptor));
    }

    #[test]
    fn sample_rate_is_checked_before_geometry() {
        let desc = RuntimeDesc::new(()).sample_rate(96_000).output_channels(1);
        assert_eq!(
            desc.validate(),
            Err(InitError::UnsupportedSampleRate(96_000))
        );
    }
}
