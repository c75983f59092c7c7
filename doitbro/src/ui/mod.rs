//! Terminal UI rendering.

pub mod input_panel;
pub mod session_panel;
pub mod status_bar;
pub mod task_panel;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Vertical stack: session header, task list, input box, status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    session_panel::render(frame, chunks[0], app);
    task_panel::render(frame, chunks[1], app);
    input_panel::render(frame, chunks[2], app);
    status_bar::render(frame, chunks[3], app);
}
