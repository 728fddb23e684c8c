//! Actor card. Front shows the actor, back shows recent movies.

use chrono::{Datelike, NaiveDate};
use game::Actor;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct CardView<'a> {
    pub actor: &'a Actor,
    pub position: usize,
    pub revealed: bool,
    pub flipped: bool,
    pub selected: bool,
    /// `Some(true)` on the older actor once revealed
    pub correct: Option<bool>,
}

impl CardView<'_> {
    fn border_color(&self) -> Color {
        match self.correct {
            Some(true) => Color::Green,
            Some(false) if self.selected => Color::Red,
            _ if self.selected => Color::Cyan,
            _ => Color::Gray,
        }
    }

    fn badge(&self) -> Option<Span<'static>> {
        match (self.selected, self.correct) {
            (true, Some(true)) => Some(Span::styled(" ✓", Style::default().fg(Color::Green))),
            (true, Some(false)) => Some(Span::styled(" ✗", Style::default().fg(Color::Red))),
            _ => None,
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

fn front_lines(view: &CardView) -> Vec<Line<'static>> {
    let actor = view.actor;
    let mut name = vec![Span::styled(
        actor.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(badge) = view.badge() {
        name.push(badge);
    }

    let mut lines = vec![Line::from(name), Line::raw("")];

    if view.revealed {
        lines.push(Line::from(vec![
            Span::raw("Age: "),
            Span::styled(
                actor.age.to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::raw(format!("Born: {}", format_date(actor.birthday))));
        if let Some(deathday) = actor.deathday {
            lines.push(Line::raw(format!("Died: {}", format_date(deathday))));
        }
    } else {
        lines.push(Line::styled("Age: ?", Style::default().fg(Color::DarkGray)));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        actor.profile_url("w185"),
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

fn back_lines(actor: &Actor) -> Vec<Line<'static>> {
    if actor.movies.is_empty() {
        return vec![Line::styled(
            "No movie information available",
            Style::default().fg(Color::DarkGray),
        )];
    }

    let mut lines = vec![
        Line::styled("Recent movies", Style::default().add_modifier(Modifier::BOLD)),
        Line::raw(""),
    ];
    for movie in &actor.movies {
        lines.push(Line::from(vec![
            Span::raw(movie.title.clone()),
            Span::styled(
                format!(" ({})", movie.release_date.year()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::styled(
            format!("  as {}", movie.character),
            Style::default().fg(Color::Gray),
        ));
    }
    lines
}

pub fn render(frame: &mut Frame, view: &CardView, area: Rect) {
    let lines = if view.flipped {
        back_lines(view.actor)
    } else {
        front_lines(view)
    };

    let flip_key = if view.position == 0 { 'f' } else { 'g' };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(view.border_color()))
        .title(format!(" [{}] ", view.position + 1))
        .title_bottom(format!(" [{}] {} ", flip_key, if view.flipped { "Back" } else { "Movies" }));

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(card, area);
}
