//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use doitbro_store::task::Task;

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the task list in projected order.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == PanelFocus::List;
    let visible = app.visible_tasks();

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let selected = is_focused && i == app.selected;
            ListItem::new(task_line(task, selected, &app.timestamp_format))
        })
        .collect();

    let title = format!("Tasks ({})", app.mode.label());
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(List::new(items).block(block), area);
}

/// Build one task row: checkbox, pin marker, text, timestamp.
fn task_line<'a>(task: &'a Task, selected: bool, timestamp_format: &str) -> Line<'a> {
    let checkbox = if task.done { "[✓]" } else { "[ ]" };
    let pin = if task.pinned { "📌 " } else { "" };

    let text_style = if selected {
        theme::selected()
    } else if task.done {
        theme::completed()
    } else {
        theme::normal()
    };

    Line::from(vec![
        Span::styled(checkbox, text_style),
        Span::raw(" "),
        Span::styled(pin, theme::normal().fg(theme::PIN)),
        Span::styled(&task.text, text_style),
        Span::raw(" "),
        Span::styled(format_timestamp(task.created_at, timestamp_format), theme::timestamp()),
    ])
}

/// Format a creation time (epoch milliseconds) in the local timezone.
fn format_timestamp(epoch_ms: u64, format: &str) -> String {
    i64::try_from(epoch_ms)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map_or_else(String::new, |dt| {
            dt.with_timezone(&chrono::Local).format(format).to_string()
        })
}
