//! Output scope with the voice clip level marked

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Each voice's loop clips at +-2. Several voices can sum past it.
const CLIP_LEVEL: f32 = 2.0;
/// Headroom above the clip guides so summed peaks stay visible.
const SCOPE_RANGE: f64 = 3.0;

/// Horizontal dashed guide across the scope.
fn guide(points: &[(f64, f64)]) -> Dataset<'_> {
    Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::DarkGray))
        .data(points)
}

/// Largest absolute sample in the buffer.
fn peak_level(audio_buffer: &[f32]) -> f32 {
    audio_buffer.iter().fold(0.0, |peak, &s| peak.max(s.abs()))
}

pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let peak = peak_level(audio_buffer);
    let peak_color = if peak >= CLIP_LEVEL {
        Color::Red
    } else {
        Color::Green
    };
    let block = Block::default()
        .title(" Waveform ")
        .title(Span::styled(
            format!(" peak {peak:.2} "),
            Style::default().fg(peak_color),
        ))
        .borders(Borders::ALL);

    let len = audio_buffer.len().max(1) as f64;
    let data: Vec<(f64, f64)> = audio_buffer
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / len, f64::from(sample)))
        .collect();

    let clip = f64::from(CLIP_LEVEL);
    let upper = [(0.0, clip), (1.0, clip)];
    let lower = [(0.0, -clip), (1.0, -clip)];
    let scope = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![guide(&upper), guide(&lower), scope])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-SCOPE_RANGE, SCOPE_RANGE])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
