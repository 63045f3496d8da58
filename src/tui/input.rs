use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which panel receives keys on the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Command,
    Segments,
    Files,
}

impl Focus {
    /// Tab order: command line, segments, files
    pub fn next(self) -> Self {
        match self {
            Focus::Command => Focus::Segments,
            Focus::Segments => Focus::Files,
            Focus::Files => Focus::Command,
        }
    }
}

/// Represents the result of handling a key event on the main screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the application
    Quit,
    /// Move focus to the next panel
    CycleFocus,
    /// Give focus back to the command line
    FocusCommand,
    /// Run the command line
    Submit,
    /// Edit the command line
    Edit(LineEdit),
    /// Move the cursor in the focused list
    Up,
    Down,
    /// Retype the highlighted segment
    EditSegment,
    /// Remove the highlighted segment
    DeleteSegment,
    /// Make the highlighted file the current book
    SelectFile,
    /// Switch to the next sort order
    CycleSort,
    /// Show or hide large files
    ToggleLarge,
    /// No action
    None,
}

/// A change to a single-line text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    Clear,
}

/// Result of a key in a yes/no dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Yes,
    No,
    None,
}

/// Result of a key in the text prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAction {
    Submit,
    Cancel,
    Edit(LineEdit),
    None,
}

/// Result of a key in a scrollable listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    Up,
    Down,
    PageUp,
    PageDown,
    Close,
    None,
}

fn line_edit(key: KeyEvent) -> Option<LineEdit> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(LineEdit::Clear),
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Some(LineEdit::Insert(c))
        }
        (KeyCode::Backspace, _) => Some(LineEdit::Backspace),
        (KeyCode::Delete, _) => Some(LineEdit::Delete),
        (KeyCode::Left, _) => Some(LineEdit::Left),
        (KeyCode::Right, _) => Some(LineEdit::Right),
        (KeyCode::Home, _) => Some(LineEdit::Home),
        (KeyCode::End, _) => Some(LineEdit::End),
        _ => None,
    }
}

/// Maps keyboard events to actions for the focused panel
pub fn handle_key_event(key: KeyEvent, focus: Focus) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return KeyAction::Quit,
        (KeyCode::Tab, _) => return KeyAction::CycleFocus,
        _ => {}
    }

    match focus {
        Focus::Command => match key.code {
            KeyCode::Enter => KeyAction::Submit,
            KeyCode::Esc => KeyAction::Edit(LineEdit::Clear),
            _ => line_edit(key).map_or(KeyAction::None, KeyAction::Edit),
        },
        Focus::Segments => match key.code {
            KeyCode::Up | KeyCode::Char('k') => KeyAction::Up,
            KeyCode::Down | KeyCode::Char('j') => KeyAction::Down,
            KeyCode::Enter => KeyAction::EditSegment,
            KeyCode::Delete => KeyAction::DeleteSegment,
            KeyCode::Esc => KeyAction::FocusCommand,
            _ => KeyAction::None,
        },
        Focus::Files => match key.code {
            KeyCode::Up | KeyCode::Char('k') => KeyAction::Up,
            KeyCode::Down | KeyCode::Char('j') => KeyAction::Down,
            KeyCode::Enter => KeyAction::SelectFile,
            KeyCode::Char('s') => KeyAction::CycleSort,
            KeyCode::Char('l') => KeyAction::ToggleLarge,
            KeyCode::Esc => KeyAction::FocusCommand,
            _ => KeyAction::None,
        },
    }
}

/// Maps keyboard events to confirmation actions
pub fn handle_confirm_input(key: KeyEvent) -> ConfirmAction {
    match (key.code, key.modifiers) {
        // Confirm: y or Enter
        (KeyCode::Char('y'), _) | (KeyCode::Char('Y'), _) => ConfirmAction::Yes,
        (KeyCode::Enter, KeyModifiers::NONE) => ConfirmAction::Yes,

        // Cancel: n or Esc
        (KeyCode::Char('n'), _) | (KeyCode::Char('N'), _) => ConfirmAction::No,
        (KeyCode::Esc, KeyModifiers::NONE) => ConfirmAction::No,

        _ => ConfirmAction::None,
    }
}

/// Maps keyboard events in the text prompt
pub fn handle_prompt_input(key: KeyEvent) -> PromptAction {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => PromptAction::Submit,
        (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => PromptAction::Cancel,
        _ => line_edit(key).map_or(PromptAction::None, PromptAction::Edit),
    }
}

/// Maps keyboard events in the duplicate listing
pub fn handle_scroll_input(key: KeyEvent) -> ScrollAction {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => ScrollAction::Up,
        KeyCode::Down | KeyCode::Char('j') => ScrollAction::Down,
        KeyCode::PageUp => ScrollAction::PageUp,
        KeyCode::PageDown => ScrollAction::PageDown,
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ScrollAction::Close,
        _ => ScrollAction::None,
    }
}

/// Single-line text field with a cursor, counted in characters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineInput {
    text: String,
    cursor: usize,
}

impl LineInput {
    /// Field holding `text` with the cursor at the end
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    pub fn apply(&mut self, edit: LineEdit) {
        let len = self.text.chars().count();
        match edit {
            LineEdit::Insert(c) => {
                let offset = self.byte_offset(self.cursor);
                self.text.insert(offset, c);
                self.cursor += 1;
            }
            LineEdit::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let offset = self.byte_offset(self.cursor);
                    self.text.remove(offset);
                }
            }
            LineEdit::Delete => {
                if self.cursor < len {
                    let offset = self.byte_offset(self.cursor);
                    self.text.remove(offset);
                }
            }
            LineEdit::Left => self.cursor = self.cursor.saturating_sub(1),
            LineEdit::Right => self.cursor = (self.cursor + 1).min(len),
            LineEdit::Home => self.cursor = 0,
            LineEdit::End => self.cursor = len,
            LineEdit::Clear => {
                self.text.clear();
                self.cursor = 0;
            }
        }
    }

    /// Empties the field and returns what it held
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}
