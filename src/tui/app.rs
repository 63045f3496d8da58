//! Main-screen state and key handling between the terminal and the interpreter

use super::input::{
    handle_key_event, handle_scroll_input, Focus, KeyAction, LineInput, ScrollAction,
};
use super::{FileRow, ScreenSnapshot, ViewState};
use crate::config::Settings;
use crate::domain::Session;
use crate::interpreter::{self, Outcome, PromptSurface};
use crossterm::event::KeyEvent;
use tracing::{debug, warn};

const PAGE: u16 = 10;

/// The running application: the session plus everything only the screen
/// needs (focus, cursors, the command line, the status message).
pub struct App {
    session: Session,
    settings: Settings,
    focus: Focus,
    command_line: LineInput,
    status: String,
    segment_cursor: usize,
    file_cursor: usize,
    view: ViewState,
}

impl App {
    pub fn new(session: Session, settings: Settings) -> Self {
        let file_cursor = session.current_index();
        let status = if session.remaining() == 0 {
            format!("No books found in {}", session.scan_dir().display())
        } else {
            "Type a command, h for help.".to_string()
        };
        Self {
            session,
            settings,
            focus: Focus::Command,
            command_line: LineInput::default(),
            status,
            segment_cursor: 0,
            file_cursor,
            view: ViewState::Browsing,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Copies what the main screen shows
    pub fn snapshot(&self) -> ScreenSnapshot {
        let book = self.session.current();
        ScreenSnapshot {
            file_name: book.map(|b| b.file_name()),
            size_kb: book.and_then(|b| b.size_kb().ok()),
            size_limit_kb: self.settings.move_size_limit_kb,
            completed: self.session.completed(),
            remaining: self.session.remaining(),
            files: self
                .session
                .candidates()
                .iter()
                .map(|entry| FileRow {
                    name: entry.name.clone(),
                    large: entry.is_large(),
                })
                .collect(),
            current_index: self.session.current_index(),
            file_cursor: self.file_cursor,
            segments: book.map(|b| b.segments().to_vec()).unwrap_or_default(),
            segment_cursor: self.segment_cursor,
            sort_label: self.session.sort_by().label(),
            show_large: self.session.show_large(),
            focus: self.focus,
            command_line: self.command_line.clone(),
            status: self.status.clone(),
            view: self.view.clone(),
        }
    }

    /// Handles one key press. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent, prompt: &mut dyn PromptSurface) -> bool {
        match &mut self.view {
            ViewState::Help => {
                self.view = ViewState::Browsing;
                return false;
            }
            ViewState::Duplicates { report, scroll } => {
                let last = report.matches.len().saturating_add(1) as u16;
                match handle_scroll_input(key) {
                    ScrollAction::Up => *scroll = scroll.saturating_sub(1),
                    ScrollAction::Down => *scroll = (*scroll + 1).min(last),
                    ScrollAction::PageUp => *scroll = scroll.saturating_sub(PAGE),
                    ScrollAction::PageDown => *scroll = (*scroll + PAGE).min(last),
                    ScrollAction::Close => self.view = ViewState::Browsing,
                    ScrollAction::None => {}
                }
                return false;
            }
            ViewState::Browsing => {}
        }

        match handle_key_event(key, self.focus) {
            KeyAction::Quit => return true,
            KeyAction::CycleFocus => self.focus = self.focus.next(),
            KeyAction::FocusCommand => self.focus = Focus::Command,
            KeyAction::Edit(edit) => self.command_line.apply(edit),
            KeyAction::Submit => {
                let line = self.command_line.take();
                let outcome =
                    interpreter::run_command(&mut self.session, &self.settings, prompt, &line);
                if self.apply_outcome(outcome) {
                    return true;
                }
                self.file_cursor = self.session.current_index();
            }
            KeyAction::Up => match self.focus {
                Focus::Segments => self.segment_cursor = self.segment_cursor.saturating_sub(1),
                Focus::Files => self.file_cursor = self.file_cursor.saturating_sub(1),
                Focus::Command => {}
            },
            KeyAction::Down => match self.focus {
                Focus::Segments => self.segment_cursor += 1,
                Focus::Files => self.file_cursor += 1,
                Focus::Command => {}
            },
            KeyAction::EditSegment => {
                let outcome =
                    interpreter::edit_segment(&mut self.session, prompt, self.segment_cursor);
                self.apply_outcome(outcome);
            }
            KeyAction::DeleteSegment => {
                let outcome = interpreter::delete_segment(&mut self.session, self.segment_cursor);
                self.apply_outcome(outcome);
            }
            KeyAction::SelectFile => {
                if self.session.select(self.file_cursor) {
                    if let Some(book) = self.session.current() {
                        debug!(path = %book.path().display(), "Selected book");
                    }
                    self.segment_cursor = 0;
                    self.status.clear();
                }
            }
            KeyAction::CycleSort => {
                let sort_by = self.session.sort_by().cycle();
                self.relist(|session| session.set_sort(sort_by));
            }
            KeyAction::ToggleLarge => self.relist(|session| session.toggle_large()),
            KeyAction::None => {}
        }

        self.clamp_cursors();
        false
    }

    fn relist(&mut self, change: impl FnOnce(&mut Session) -> std::io::Result<()>) {
        match change(&mut self.session) {
            Ok(()) => {
                self.file_cursor = self.session.current_index();
                self.status = format!(
                    "Sorted {}, large files {}.",
                    self.session.sort_by().label(),
                    if self.session.show_large() { "shown" } else { "hidden" }
                );
            }
            Err(e) => {
                warn!(error = %e, "Failed to list scan directory");
                self.status = format!(
                    "Could not list {}: {}",
                    self.session.scan_dir().display(),
                    e
                );
            }
        }
    }

    /// Returns `true` on quit
    fn apply_outcome(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Quit => return true,
            Outcome::Quiet => {}
            Outcome::Status(message) => self.status = message,
            Outcome::Help => self.view = ViewState::Help,
            Outcome::Duplicates(report) => {
                self.status = report.summary();
                self.view = ViewState::Duplicates { report, scroll: 0 };
            }
        }
        false
    }

    fn clamp_cursors(&mut self) {
        let segments = self.session.current().map_or(0, |b| b.segment_count());
        self.segment_cursor = self.segment_cursor.min(segments.saturating_sub(1));
        let files = self.session.remaining();
        self.file_cursor = self.file_cursor.min(files.saturating_sub(1));
    }
}
