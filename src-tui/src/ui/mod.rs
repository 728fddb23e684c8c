//! UI module for TUI rendering.

pub mod board;
pub mod card;
pub mod menu;
pub mod modal;
pub mod status;
pub mod tutorial;

use std::time::Instant;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::Frame;

use crate::app::{App, Screen};

/// Render the current screen, then any overlays on top of it.
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    match &app.screen {
        Screen::Loading => status::render_loading(frame, app, now),
        Screen::Failed(message) => status::render_error(frame, message),
        Screen::Playing => {
            if let Some(session) = &app.session {
                board::render(frame, app, session);
                if session.show_game_over_modal() {
                    modal::render(frame, app, session);
                }
            }
        }
    }

    if let Some(menu) = app.menu {
        menu::render(frame, app, menu);
    }
    if app.tutorial_until.is_some() {
        tutorial::render(frame);
    }
}

/// Create a centered rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
