//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.focus {
        PanelFocus::Input => "Enter: add | Tab: switch panel | Ctrl-G/O: sign in/out | Esc: quit",
        PanelFocus::List => {
            "↑↓/jk: navigate | Space: done | p: pin | d: delete | ←→/f: filter | Esc: quit"
        }
    };

    let (dot_color, session_text) = match app.session.display_name() {
        Some(name) => (theme::SUCCESS, name.to_string()),
        None => (theme::OFFLINE, "Signed out".to_string()),
    };

    let open = app.tasks.iter().filter(|t| !t.done).count();
    let done = app.tasks.len() - open;

    // A transient message replaces the key help until the next key press.
    let trailing = app.status.as_ref().map_or_else(
        || Span::styled(help_text, theme::dimmed()),
        |message| Span::styled(message.clone(), theme::normal().fg(theme::WARNING)),
    );

    let status_line = Line::from(vec![
        Span::styled(concat!("doitbro v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {session_text}")),
        Span::raw(format!(" | {open} open / {done} done | {} | ", app.mode)),
        trailing,
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
