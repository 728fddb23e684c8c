//! Game board: header, scoreboard, the two cards and the prompt line.

use game::Phase;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::card;
use crate::app::{App, Session};

pub fn render(frame: &mut Frame, app: &App, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Cards
            Constraint::Length(3), // Prompt
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);
    render_cards(frame, app, session, chunks[1]);
    render_prompt(frame, session, chunks[2]);
    render_footer(frame, session, chunks[3]);
}

fn render_header(frame: &mut Frame, session: &Session, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::raw(" Streak: "),
        Span::styled(
            session.streak().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("    Best: "),
        Span::styled(
            session.best_streak().to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("    [m] Menu", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", game::share::GAME_TITLE.to_uppercase()))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(header, area);
}

fn render_cards(frame: &mut Frame, app: &App, session: &Session, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (position, actor) in session.round().actors.iter().enumerate() {
        let view = card::CardView {
            actor,
            position,
            revealed: session.is_revealed(),
            flipped: app.flipped[position],
            selected: session.selected() == Some(actor.id),
            correct: session.is_correct_card(actor.id),
        };
        card::render(frame, &view, chunks[position]);
    }
}

fn render_prompt(frame: &mut Frame, session: &Session, area: Rect) {
    let (text, color) = match session.phase() {
        Phase::Choosing => ("Who's older? Press 1 or 2".to_string(), Color::White),
        Phase::Revealed { .. } => ("Correct!".to_string(), Color::Green),
        Phase::GameOver { .. } | Phase::GameOverModal => ("Wrong!".to_string(), Color::Red),
        Phase::AwaitingRestart => (
            format!("Game over after {}. Press Enter to play again", session.last_streak()),
            Color::Yellow,
        ),
    };

    let prompt = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .centered()
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(prompt, area);
}

fn render_footer(frame: &mut Frame, session: &Session, area: Rect) {
    let keys = if session.is_game_over() {
        " [Enter] Play again  [s] Share  [m] Menu  [q] Quit"
    } else {
        " [1/←] Left  [2/→] Right  [f/g] Flip cards  [m] Menu  [q] Quit"
    };
    let footer = Paragraph::new(Span::styled(keys, Style::default().fg(Color::DarkGray)));
    frame.render_widget(footer, area);
}
