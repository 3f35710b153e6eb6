//! Edit-session state: the single-line buffer and the Idle/Selected/Editing
//! state machine the controller runs.

use crate::domain::Address;

/// A single-line text buffer with a character-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    /// Cursor position in characters, not bytes
    cursor: usize,
}

impl TextBuffer {
    /// Creates a buffer holding `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Removes the character before the cursor. Returns false at the start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    /// Removes the character under the cursor. Returns false at the end.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    /// Replaces the whole text, leaving the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        *self = Self::new(text);
    }
}

/// An open edit on one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub address: Address,
    pub buffer: TextBuffer,
}

impl EditSession {
    pub fn new(address: Address, seed: impl Into<String>) -> Self {
        Self {
            address,
            buffer: TextBuffer::new(seed),
        }
    }
}

/// Where the controller is in the selection/edit lifecycle.
///
/// Editing carries its own address, so an edit is always at the selected
/// cell and there is never more than one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    /// No selection; only at start-up or when the grid is empty
    #[default]
    Idle,
    Selected(Address),
    Editing(EditSession),
}

impl EditState {
    pub fn selected_address(&self) -> Option<Address> {
        match self {
            EditState::Idle => None,
            EditState::Selected(addr) => Some(*addr),
            EditState::Editing(session) => Some(session.address),
        }
    }

    pub fn editing_address(&self) -> Option<Address> {
        match self {
            EditState::Editing(session) => Some(session.address),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        match self {
            EditState::Editing(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Editing(_))
    }
}
