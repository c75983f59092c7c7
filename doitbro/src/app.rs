//! Application state and event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;

use doitbro_store::task::Task;

use crate::session::Session;
use crate::sync::{SyncCommand, SyncEvent};
use crate::tasks::view::{ViewMode, project};

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Task input box is focused (default).
    Input,
    /// Task list is focused.
    List,
}

/// Taglines shown on the anonymous screen, one picked at startup.
const TAGLINES: [&str; 8] = [
    "The bro who helps you get stuff done.",
    "Let's just get it done, bro.",
    "I got you, bro.",
    "Productivity, but chill.",
    "You do your thing. I'll keep track.",
    "Your personal task bro.",
    "Because adulting is hard, bro.",
    "Helping you crush your to-do list, bro.",
];

/// Main application state.
///
/// Holds the read-only task mirror (wholly replaced by each snapshot), the
/// locally owned view state (input, focus, selection, view mode), and the
/// last transient status message. Key events translate into
/// [`SyncCommand`]s; [`SyncEvent`]s fold back into this state.
pub struct App {
    /// Current text input (byte buffer; cursor is a byte index on a char
    /// boundary).
    pub input: String,
    /// Cursor position in input (byte index).
    pub cursor_position: usize,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Selected filter/sort mode.
    pub mode: ViewMode,
    /// Current session.
    pub session: Session,
    /// Mirrored task collection, newest first (snapshot order).
    pub tasks: Vec<Task>,
    /// Selected index into the projected (visible) list.
    pub selected: usize,
    /// Transient status message; dismissed on the next key press.
    pub status: Option<String>,
    /// Tagline for the anonymous screen, picked at startup.
    pub tagline: &'static str,
    /// Timestamp display format string (chrono).
    pub timestamp_format: String,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Maximum task text length in characters.
    max_text_len: usize,
}

impl App {
    /// Create a new application in the anonymous state.
    #[must_use]
    pub fn new() -> Self {
        let tagline = TAGLINES[rand::rng().random_range(0..TAGLINES.len())];

        Self {
            input: String::new(),
            cursor_position: 0,
            focus: PanelFocus::Input,
            mode: ViewMode::All,
            session: Session::Anonymous,
            tasks: Vec::new(),
            selected: 0,
            status: None,
            tagline,
            timestamp_format: "%H:%M".to_string(),
            should_quit: false,
            max_text_len: doitbro_store::task::MAX_TASK_TEXT_LENGTH,
        }
    }

    /// Set the maximum task text length.
    #[must_use]
    pub const fn with_max_text_len(mut self, max_text_len: usize) -> Self {
        self.max_text_len = max_text_len;
        self
    }

    /// Set the timestamp display format.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Tasks in render order: the projection of the mirror under the
    /// current view mode.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        project(&self.tasks, self.mode)
    }

    /// The currently selected visible task, if any.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected).copied()
    }

    /// Fold a sync event into the application state.
    pub fn apply_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::SessionChanged { session } => {
                let was_authenticated = self.session.is_authenticated();
                self.session = session;
                match &self.session {
                    Session::Authenticated(identity) => {
                        self.status = Some(format!("Signed in as {}", identity.display_name));
                    }
                    Session::Anonymous => {
                        // No stale cross-user leakage: mirror and pending
                        // input clear on sign-out or session expiry.
                        self.tasks.clear();
                        self.input.clear();
                        self.cursor_position = 0;
                        self.selected = 0;
                        if was_authenticated {
                            self.status = Some("Signed out".to_string());
                        }
                    }
                }
            }
            SyncEvent::TasksSnapshot { tasks } => {
                self.tasks = tasks;
                self.clamp_selection();
            }
            SyncEvent::Error(message) => {
                self.status = Some(message);
            }
        }
    }

    /// Handle a key event, returning a command for the sync task when the
    /// action requires a backend call.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        // Any key dismisses the transient status message.
        self.status = None;

        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                return None;
            }
            (KeyCode::Char('g'), KeyModifiers::CONTROL) => {
                return Some(SyncCommand::SignIn);
            }
            (KeyCode::Char('o'), KeyModifiers::CONTROL) => {
                if self.session.is_authenticated() {
                    return Some(SyncCommand::SignOut);
                }
                self.status = Some("Not signed in".to_string());
                return None;
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.toggle_focus();
                return None;
            }
            _ => {}
        }

        // Focus-specific shortcuts
        match self.focus {
            PanelFocus::Input => self.handle_input_key(key),
            PanelFocus::List => self.handle_list_key(key),
        }
    }

    /// Handle key event when the input box is focused.
    fn handle_input_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        match key.code {
            KeyCode::Enter => self.submit_task(),
            KeyCode::Char(c) => {
                self.enter_char(c);
                None
            }
            KeyCode::Backspace => {
                self.delete_char();
                None
            }
            KeyCode::Left => {
                self.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.move_cursor_right();
                None
            }
            KeyCode::Home => {
                self.cursor_position = 0;
                None
            }
            KeyCode::End => {
                self.cursor_position = self.input.len();
                None
            }
            _ => None,
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_list_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self
                .selected_task()
                .cloned()
                .map(|task| SyncCommand::ToggleDone { task }),
            KeyCode::Char('p') => self
                .selected_task()
                .cloned()
                .map(|task| SyncCommand::TogglePin { task }),
            KeyCode::Delete | KeyCode::Char('d') => self
                .selected_task()
                .map(|task| task.id.clone())
                .map(|id| SyncCommand::Delete { id }),
            KeyCode::Left => {
                self.set_mode(self.mode.prev());
                None
            }
            KeyCode::Right | KeyCode::Char('f') => {
                self.set_mode(self.mode.next());
                None
            }
            _ => None,
        }
    }

    /// Submit the current input as a new task.
    ///
    /// Validation failures keep the input intact and surface a message
    /// synchronously, with no command issued. On acceptance the input
    /// clears immediately, before the write completes (optimistic clear).
    fn submit_task(&mut self) -> Option<SyncCommand> {
        if !self.session.is_authenticated() {
            self.status = Some("Sign in to add a task (Ctrl-G)".to_string());
            return None;
        }
        if self.input.is_empty() {
            self.status = Some("Enter a task first".to_string());
            return None;
        }
        if self.input.chars().count() > self.max_text_len {
            self.status = Some(format!("Task text too long (max {} characters)", self.max_text_len));
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.cursor_position = 0;
        Some(SyncCommand::Create { text })
    }

    /// Switch the view mode and keep the selection valid.
    fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.clamp_selection();
    }

    /// Toggle focus between the input box and the task list.
    const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Input => PanelFocus::List,
            PanelFocus::List => PanelFocus::Input,
        };
    }

    /// Insert a character at the cursor position.
    fn enter_char(&mut self, c: char) {
        self.input.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if let Some(c) = self.input[..self.cursor_position].chars().next_back() {
            self.cursor_position -= c.len_utf8();
            self.input.remove(self.cursor_position);
        }
    }

    /// Move cursor one character left.
    fn move_cursor_left(&mut self) {
        if let Some(c) = self.input[..self.cursor_position].chars().next_back() {
            self.cursor_position -= c.len_utf8();
        }
    }

    /// Move cursor one character right.
    fn move_cursor_right(&mut self) {
        if let Some(c) = self.input[self.cursor_position..].chars().next() {
            self.cursor_position += c.len_utf8();
        }
    }

    /// Select the previous visible task.
    const fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Select the next visible task.
    fn select_next(&mut self) {
        if self.selected + 1 < self.visible_tasks().len() {
            self.selected += 1;
        }
    }

    /// Keep the selection inside the visible list.
    fn clamp_selection(&mut self) {
        let len = self.visible_tasks().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
