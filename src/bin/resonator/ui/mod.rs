//! TUI module for resonator
//!
//! Keyboard playing, parameter editing and a live view of the voice pool.

mod params;
mod spectrum;
mod state;
mod status;
mod voices;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use std::time::Duration;
use tracing::warn;

use resonator_dsp::{ControlMessage, ParamId, Params, NUM_VOICES, SAMPLE_RATE};

pub use state::VoiceSnapshot;

use params::render_params;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats, StatusLine};
use voices::render_voices;
use waveform::render_waveform;

/// Audio visualization buffer size, also the FFT size
pub const VIS_BUFFER_SIZE: usize = 1024;

const VELOCITY: u8 = 100;
/// Pitch bend moves in eighths of the full swing.
const BEND_STEP: u16 = 0x0800;
const BEND_CENTER: u16 = 0x2000;
const BEND_MAX: u16 = 0x3fff;

/// Two rows of a computer keyboard laid out like a piano, C3 and C4 first.
const LOWER_ROW: &str = "zsxdcvgbhnjm,";
const UPPER_ROW: &str = "q2w3er5t6y7ui";
const LOWER_ROW_NOTE: u8 = 48;
const UPPER_ROW_NOTE: u8 = 60;

/// UI application state
pub struct UiApp {
    control_tx: Producer<ControlMessage>,
    audio_rx: Consumer<f32>,
    snapshot_rx: Consumer<[VoiceSnapshot; NUM_VOICES]>,
    /// Latest voice states from the audio thread
    voices: [VoiceSnapshot; NUM_VOICES],
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    /// Mirror of the engine's parameters; every edit is also sent over
    params: Params,
    selected: usize,
    gate: bool,
    pitch_bend: u16,
    /// Whether the terminal reports key releases
    key_releases: bool,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        control_tx: Producer<ControlMessage>,
        audio_rx: Consumer<f32>,
        snapshot_rx: Consumer<[VoiceSnapshot; NUM_VOICES]>,
        key_releases: bool,
    ) -> Self {
        Self {
            control_tx,
            audio_rx,
            snapshot_rx,
            voices: [VoiceSnapshot::default(); NUM_VOICES],
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, SAMPLE_RATE as f32),
            params: Params::default(),
            selected: 0,
            gate: false,
            pitch_bend: BEND_CENTER,
            key_releases,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_voices();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        // Leave nothing ringing at full feedback.
        self.send(ControlMessage::AllNotesOff);
        Ok(())
    }

    /// Keep the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        if self.audio_rx.is_empty() {
            return;
        }
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
        self.spectrum.update(&self.audio_buffer);
    }

    fn poll_voices(&mut self) {
        while let Ok(voices) = self.snapshot_rx.pop() {
            self.voices = voices;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let KeyCode::Char(c) = key.code {
            if let Some(note) = keyboard_note(c) {
                match key.kind {
                    KeyEventKind::Press => self.send(ControlMessage::NoteOn {
                        note,
                        velocity: VELOCITY,
                    }),
                    KeyEventKind::Release => self.send(ControlMessage::NoteOff { note }),
                    KeyEventKind::Repeat => {}
                }
                return;
            }
        }

        if key.kind != KeyEventKind::Press {
            return;
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            10
        } else {
            1
        };

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => {
                self.selected = self.selected.checked_sub(1).unwrap_or(ParamId::COUNT - 1);
            }
            KeyCode::Down => self.selected = (self.selected + 1) % ParamId::COUNT,
            KeyCode::Left => self.adjust_selected(-step),
            KeyCode::Right => self.adjust_selected(step),
            KeyCode::Char(' ') => {
                self.gate = !self.gate;
                self.send(if self.gate {
                    ControlMessage::GateOn { velocity: VELOCITY }
                } else {
                    ControlMessage::GateOff
                });
            }
            KeyCode::Char('0') => {
                self.gate = false;
                self.send(ControlMessage::AllNotesOff);
            }
            KeyCode::Char('[') => self.bend(self.pitch_bend.saturating_sub(BEND_STEP)),
            KeyCode::Char(']') => self.bend((self.pitch_bend + BEND_STEP).min(BEND_MAX)),
            KeyCode::Char('\\') => self.bend(BEND_CENTER),
            _ => {}
        }
    }

    /// Step the selected parameter inside its published range.
    fn adjust_selected(&mut self, delta: i32) {
        let id = ParamId::ALL[self.selected];
        let descriptor = id.descriptor();
        let value = (self.params.get(id) + delta)
            .clamp(i32::from(descriptor.min), i32::from(descriptor.max));
        self.params.set(id, value);
        self.send(ControlMessage::SetParameter {
            id: id.index(),
            value,
        });
    }

    fn bend(&mut self, value: u16) {
        self.pitch_bend = value;
        self.send(ControlMessage::PitchBend { value });
    }

    fn send(&mut self, message: ControlMessage) {
        if self.control_tx.push(message).is_err() {
            warn!(?message, "control queue full, dropping message");
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),                         // Status bar
                Constraint::Length(ParamId::COUNT as u16 + 2), // Params and voices
                Constraint::Min(8),                            // Scopes
                Constraint::Length(1),                         // Help bar
            ])
            .split(area);

        let status = StatusLine {
            gate: self.gate,
            pitch_bend: self.pitch_bend,
            pitch_bend_range: self.params.pitch_bend_range,
            key_releases: self.key_releases,
            stats: AudioStats::from_buffer(&self.audio_buffer),
        };
        render_status(frame, rows[0], &status);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1]);
        render_params(frame, middle[0], &self.params, self.selected);
        render_voices(frame, middle[1], &self.voices);

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        let help = Paragraph::new(
            " [Z..M / Q..I] Play  [↑↓] Select  [←→] Adjust (Shift x10)  [Space] Gate  [0] All off  [ [ ] \\ ] Bend  [Esc] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[3]);
    }
}

fn keyboard_note(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    if let Some(offset) = LOWER_ROW.find(c) {
        return Some(LOWER_ROW_NOTE + offset as u8);
    }
    UPPER_ROW.find(c).map(|offset| UPPER_ROW_NOTE + offset as u8)
}
