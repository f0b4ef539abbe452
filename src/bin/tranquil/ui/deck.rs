//! Sound list widget - play state and volume per soundscape

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::Deck;

const BAR_WIDTH: usize = 20;

fn volume_bar(volume: f32) -> String {
    let filled = ((volume * BAR_WIDTH as f32).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Render one line per player
pub fn render_deck(frame: &mut Frame, area: Rect, deck: &Deck) {
    let label_width = deck
        .players()
        .iter()
        .map(|player| player.label().len())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = deck
        .players()
        .iter()
        .enumerate()
        .map(|(index, player)| {
            let (symbol, color) = if deck.is_fading(index) {
                ("↘", Color::Yellow)
            } else if player.is_active() {
                ("▶", Color::Green)
            } else {
                ("■", Color::DarkGray)
            };

            let mut label_style = Style::default().fg(Color::White);
            if index == deck.selected() {
                label_style = label_style.add_modifier(Modifier::REVERSED);
            }

            let mut spans = vec![
                Span::styled(format!(" {symbol} "), Style::default().fg(color)),
                Span::styled(format!("{:<label_width$}", player.label()), label_style),
                Span::raw("  "),
                Span::styled(volume_bar(player.volume()), Style::default().fg(Color::Cyan)),
                Span::raw(format!(" {:>3.0}%", player.volume() * 100.0)),
            ];
            if player.is_muted() {
                spans.push(Span::styled("  muted", Style::default().fg(Color::Red)));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}
