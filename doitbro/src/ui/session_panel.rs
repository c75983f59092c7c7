//! Session panel rendering (welcome line or sign-in prompt).

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::App;
use crate::session::Session;

/// Render the session header.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let line = match &app.session {
        Session::Authenticated(identity) => Line::from(vec![
            Span::styled("Welcome back, ", theme::normal()),
            Span::styled(identity.display_name.clone(), theme::bold()),
            Span::styled("!", theme::normal()),
        ]),
        Session::Anonymous => Line::from(vec![
            Span::styled("Sign in to manage your tasks (Ctrl-G). ", theme::normal()),
            Span::styled(app.tagline, theme::dimmed()),
        ]),
    };

    let block = Block::default()
        .title(Span::styled("doitbro", theme::panel_title(theme::SESSION_TITLE)))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    frame.render_widget(Paragraph::new(line).block(block), area);
}
