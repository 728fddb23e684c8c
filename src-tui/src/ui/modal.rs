//! Game-over modal.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::app::{App, Session};

pub fn render(frame: &mut Frame, app: &App, session: &Session) {
    let area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, area);

    let (heading, color) = if session.is_new_high() {
        ("New High Score!", Color::Yellow)
    } else {
        ("Game Over", Color::Red)
    };

    let mut lines = vec![
        Line::styled(heading, Style::default().fg(color).add_modifier(Modifier::BOLD)).centered(),
        Line::raw(""),
        Line::raw(format!("You got {} correct in a row", session.last_streak())).centered(),
        Line::raw(format!("Best streak: {}", session.best_streak())).centered(),
        Line::raw(""),
    ];

    if let Some(notice) = &app.share {
        lines.push(Line::styled("Copied!", Style::default().fg(Color::Green)).centered());
        for text in notice.text.lines() {
            lines.push(Line::styled(text.to_string(), Style::default().fg(Color::Gray)));
        }
        lines.push(Line::raw(""));
    }

    lines.push(
        Line::from(vec![
            Span::styled("[s] ", Style::default().fg(Color::Yellow)),
            Span::raw("Share   "),
            Span::styled("[Enter] ", Style::default().fg(Color::Yellow)),
            Span::raw("Play Again   "),
            Span::styled("[Esc] ", Style::default().fg(Color::Yellow)),
            Span::raw("Close"),
        ])
        .centered(),
    );

    let modal = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );

    frame.render_widget(modal, area);
}
