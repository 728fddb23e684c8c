//! First-run tutorial overlay.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;

pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let key = Style::default().fg(Color::Yellow);
    let lines = vec![
        Line::styled("How to play", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Line::raw(""),
        Line::raw("Two actors are shown. Pick the one who is older."),
        Line::raw("A right answer adds to your streak. One wrong answer ends the run."),
        Line::raw(""),
        Line::from(vec![Span::styled("  1 / ←   ", key), Span::raw("Pick the left actor")]),
        Line::from(vec![Span::styled("  2 / →   ", key), Span::raw("Pick the right actor")]),
        Line::from(vec![Span::styled("  f / g   ", key), Span::raw("Flip a card to see recent movies")]),
        Line::raw(""),
        Line::styled("Press any key to start", Style::default().fg(Color::DarkGray)),
    ];

    let overlay = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Welcome ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(overlay, area);
}
