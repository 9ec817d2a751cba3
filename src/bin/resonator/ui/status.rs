//! Status bar widget - gate, pitch bend and output level

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use resonator_dsp::SAMPLE_RATE;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub struct StatusLine {
    pub gate: bool,
    pub pitch_bend: u16,
    pub pitch_bend_range: i8,
    pub key_releases: bool,
    pub stats: AudioStats,
}

pub fn render_status(frame: &mut Frame, area: Rect, status: &StatusLine) {
    let block = Block::default().title(" resonator ").borders(Borders::ALL);

    // Same mapping the engine uses: range spans the full bend swing.
    let semitones = f32::from(status.pitch_bend_range) * (f32::from(status.pitch_bend) - 8192.0)
        / 16384.0;

    let (gate_symbol, gate_color) = if status.gate {
        ("● Gate", Color::Green)
    } else {
        ("○ Gate", Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!(" {gate_symbol}  "), Style::default().fg(gate_color)),
        Span::styled(
            format!("Bend: {semitones:+.2} st  "),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{:.1}kHz  ", SAMPLE_RATE as f32 / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", status.stats.peak, status.stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if !status.key_releases {
        spans.push(Span::styled(
            "  (no key-up events: notes ring)",
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
