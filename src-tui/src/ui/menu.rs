//! Menu overlay and its pages.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;
use crate::app::{App, MenuItem, MenuState};

pub fn render(frame: &mut Frame, app: &App, menu: MenuState) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let (title, lines) = match menu.open {
        Some(item) => (item.label(), page_lines(app, item)),
        None => ("Menu", item_lines(menu.selected)),
    };

    let overlay = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(overlay, area);
}

fn item_lines(selected: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == selected {
                Line::styled(
                    format!("> {}", item.label()),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )
            } else {
                Line::raw(format!("  {}", item.label()))
            }
        })
        .collect();

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "↑/↓ move  Enter open  Esc close",
        Style::default().fg(Color::DarkGray),
    ));
    lines
}

fn page_lines(app: &App, item: MenuItem) -> Vec<Line<'static>> {
    let mut lines = match item {
        MenuItem::HowToPlay => vec![
            Line::raw("Two actors appear side by side. Guess which one is older."),
            Line::raw(""),
            Line::raw("Each right answer adds one to your streak and a new pair is dealt."),
            Line::raw("A wrong answer ends the run. Your best streak is kept between games."),
            Line::raw(""),
            Line::raw("Ages of actors who have died are their age at death."),
            Line::raw("Flip a card with f or g to see recent movies before you choose."),
        ],
        MenuItem::Share => {
            let mut lines = vec![Line::raw("Invite a friend:"), Line::raw("")];
            let invite = game::share::invite_message(app.config().share_url.as_deref());
            lines.extend(
                invite
                    .lines()
                    .map(|text| Line::styled(text.to_string(), Style::default().fg(Color::Gray))),
            );
            lines.push(Line::raw(""));
            if app.share.is_some() {
                lines.push(Line::styled("Copied!", Style::default().fg(Color::Green)));
            } else {
                lines.push(Line::from(vec![
                    Span::styled("[Enter] ", Style::default().fg(Color::Yellow)),
                    Span::raw("Share"),
                ]));
            }
            lines
        }
        MenuItem::Privacy => vec![
            Line::raw("Your best streak and whether you have seen the tutorial are"),
            Line::raw("stored in a small file on this computer. Nothing else is kept."),
            Line::raw(""),
            Line::raw("Actor data is requested from The Movie Database (TMDB)."),
        ],
        MenuItem::Credits => vec![
            Line::styled("Data", Style::default().add_modifier(Modifier::BOLD)),
            Line::raw("Actor and movie information provided by TMDB."),
            Line::raw("This product uses the TMDB API but is not endorsed or certified by TMDB."),
        ],
    };

    lines.push(Line::raw(""));
    lines.push(Line::styled("Esc back", Style::default().fg(Color::DarkGray)));
    lines
}
