//! Parameter list widget

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use resonator_dsp::{synth::params::ParamKind, ParamId, Params};

pub fn render_params(frame: &mut Frame, area: Rect, params: &Params, selected: usize) {
    let block = Block::default().title(" Parameters ").borders(Borders::ALL);

    let lines: Vec<Line> = ParamId::ALL
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let descriptor = id.descriptor();
            let value = params.get(id);
            let text = match descriptor.kind {
                ParamKind::Strings => id.str_value(value).unwrap_or("?").to_string(),
                ParamKind::Numeric => value.to_string(),
            };

            let style = if i == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(vec![
                Span::styled(format!(" {:<13}", descriptor.name), style),
                Span::styled(format!("{text:>6} "), style),
                Span::styled(
                    format!(" {}..{}", descriptor.min, descriptor.max),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
