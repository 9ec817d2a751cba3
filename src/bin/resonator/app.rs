//! Player - opens the audio device, owns the engine's audio thread and
//! hands the terminal to the UI

use std::io::stdout;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, SampleFormat, SampleRate, StreamConfig,
};
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::supports_keyboard_enhancement,
};
use rtrb::RingBuffer;
use tracing::{error, info, warn};

use resonator_dsp::{
    ControlMessage, Resonator, RuntimeDesc, SampleBanks, MAX_BLOCK_SIZE, NUM_VOICES, SAMPLE_RATE,
};

use crate::ui::{UiApp, VoiceSnapshot, VIS_BUFFER_SIZE};

/// Room for a burst of key presses and parameter sweeps between two blocks.
const CONTROL_QUEUE_SIZE: usize = 256;
const SNAPSHOT_QUEUE_SIZE: usize = 16;

pub struct Player {
    banks: SampleBanks,
}

impl Player {
    pub fn new(banks: SampleBanks) -> Self {
        Self { banks }
    }

    /// Start audio, run the UI until the user quits, then tear down.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = output_config(&device)?;

        info!(
            host = ?host.id(),
            device = %device.name().unwrap_or_default(),
            ?config,
            "audio device selected"
        );

        let desc = RuntimeDesc::new(self.banks)
            .sample_rate(config.sample_rate.0)
            .frames_per_buffer(MAX_BLOCK_SIZE as u16)
            .output_channels(u8::try_from(config.channels).unwrap_or(u8::MAX));
        let mut resonator =
            Resonator::new(desc).wrap_err("output device does not match the engine")?;

        let (control_tx, mut control_rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE_SIZE);
        let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * 4);
        let (mut snapshot_tx, snapshot_rx) =
            RingBuffer::<[VoiceSnapshot; NUM_VOICES]>::new(SNAPSHOT_QUEUE_SIZE);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _| {
                    for block in data.chunks_mut(MAX_BLOCK_SIZE * 2) {
                        let frames = block.len() / 2;
                        resonator.render_with(&mut control_rx, block, frames);

                        // A full queue means the UI is behind; drop the rest.
                        for frame in block.chunks_exact(2) {
                            if audio_tx.push(0.5 * (frame[0] + frame[1])).is_err() {
                                break;
                            }
                        }
                    }
                    let _ = snapshot_tx.push(VoiceSnapshot::capture(resonator.voices()));
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;
        info!(sample_rate = SAMPLE_RATE, "audio stream started");

        let mut terminal = ratatui::init();
        let key_releases = supports_keyboard_enhancement().unwrap_or(false);
        if key_releases {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            warn!("terminal does not report key releases; notes ring until released with 0");
        }

        let result =
            UiApp::new(control_tx, audio_rx, snapshot_rx, key_releases).run(&mut terminal);

        if key_releases {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        ratatui::restore();
        drop(stream);
        info!("audio stream stopped");

        result
    }
}

/// Stereo f32 at the engine rate if the device offers it, otherwise the
/// device default (which the engine will then reject with a clear error).
fn output_config(device: &Device) -> EyreResult<StreamConfig> {
    let wanted = SampleRate(SAMPLE_RATE);
    let supported = device
        .supported_output_configs()
        .wrap_err("failed to query output configs")?
        .find(|range| {
            range.channels() == 2
                && range.sample_format() == SampleFormat::F32
                && range.min_sample_rate() <= wanted
                && range.max_sample_rate() >= wanted
        });

    match supported {
        Some(range) => Ok(range.with_sample_rate(wanted).config()),
        None => {
            warn!("no stereo 48 kHz f32 output config, trying the device default");
            Ok(device
                .default_output_config()
                .wrap_err("failed to fetch default output config")?
                .config())
        }
    }
}
