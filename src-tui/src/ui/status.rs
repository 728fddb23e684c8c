//! Loading and error screens.

use std::time::Instant;

use ratatui::{
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::app::App;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn spinner_frame(app: &App, now: Instant) -> &'static str {
    let ticks = now.saturating_duration_since(app.loading_started).as_millis() / 100;
    SPINNER[(ticks % SPINNER.len() as u128) as usize]
}

pub fn render_loading(frame: &mut Frame, app: &App, now: Instant) {
    let area = centered_rect(40, 20, frame.area());
    let loading = Paragraph::new(vec![
        Line::raw(""),
        Line::styled(
            format!("{} Loading actors...", spinner_frame(app, now)),
            Style::default().fg(Color::Cyan),
        )
        .centered(),
    ])
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(loading, area);
}

pub fn render_error(frame: &mut Frame, message: &str) {
    let area = centered_rect(60, 30, frame.area());
    let error = Paragraph::new(vec![
        Line::styled("Something went wrong", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .centered(),
        Line::raw(""),
        Line::raw(message.to_string()).centered(),
        Line::raw(""),
        Line::styled("Press r to try again, q to quit", Style::default().fg(Color::DarkGray)).centered(),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );

    frame.render_widget(error, area);
}
