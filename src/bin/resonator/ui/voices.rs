//! Voice pool widget - one row per voice

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use resonator_dsp::SAMPLE_RATE;

use super::VoiceSnapshot;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub fn render_voices(frame: &mut Frame, area: Rect, voices: &[VoiceSnapshot]) {
    let block = Block::default().title(" Voices ").borders(Borders::ALL);

    let lines: Vec<Line> = voices
        .iter()
        .enumerate()
        .map(|(i, voice)| {
            if !voice.initialized {
                return Line::from(Span::styled(
                    format!(" {i}  --"),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            let (state, color) = if voice.gate {
                ("gated", Color::Green)
            } else {
                ("releasing", Color::Yellow)
            };
            let seconds = voice.frames_since_note_on as f64 / f64::from(SAMPLE_RATE);

            Line::from(vec![
                Span::raw(format!(" {i}  ")),
                Span::styled(
                    format!("{:<4}", note_name(voice.note)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(format!("{state:<10}"), Style::default().fg(color)),
                Span::styled(
                    format!("{seconds:>7.2}s"),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Scientific pitch notation, MIDI note 60 = C4.
fn note_name(note: u8) -> String {
    let octave = i32::from(note / 12) - 1;
    format!("{}{}", NOTE_NAMES[usize::from(note % 12)], octave)
}
