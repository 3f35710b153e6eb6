//! Routes raw input events to navigation or the edit session.
//!
//! The host calls [`GridController::handle_event`] once per event and gets
//! back an [`Intent`] describing what happened. Each event is handled by
//! exactly one branch, chosen by the current [`EditState`].

use super::navigation::{Axis, Direction};
use super::session::EditState;
use super::state::{GridController, Intent};
use crate::domain::Address;

/// Keys the core understands. Anything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    F(u8),
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Shift alone does not count: it only picks the character.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// The character to type, if this is a printable key with no command modifier.
    pub fn printable(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !c.is_control() && !self.modifiers.is_command() => Some(c),
            _ => None,
        }
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::plain(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyInput),
    Click(Address),
    DoubleClick(Address),
    /// The grid lost focus
    Blur,
}

impl GridController {
    pub fn handle_event(&mut self, event: InputEvent) -> Intent {
        tracing::trace!(target: "input", ?event, "dispatch");
        match event {
            InputEvent::Key(input) => self.handle_key(input),
            InputEvent::Click(addr) => self.handle_click(addr),
            InputEvent::DoubleClick(addr) => self.handle_double_click(addr),
            InputEvent::Blur => self.commit_edit(None),
        }
    }

    pub fn handle_key(&mut self, input: KeyInput) -> Intent {
        match self.state() {
            EditState::Idle => Intent::Ignore,
            EditState::Selected(_) => self.handle_selected_key(input),
            EditState::Editing(_) => self.handle_editing_key(input),
        }
    }

    fn handle_selected_key(&mut self, input: KeyInput) -> Intent {
        if input.modifiers.ctrl {
            match input.key {
                Key::Char('z') | Key::Char('Z') => return self.undo(),
                Key::Char('y') | Key::Char('Y') => return self.redo(),
                _ => {}
            }
        }

        let moved = |app: &mut GridController, direction| {
            app.move_selection(direction)
                .map_or(Intent::Ignore, Intent::Navigate)
        };

        match input.key {
            Key::Up => moved(self, Direction::Up),
            Key::Down => moved(self, Direction::Down),
            Key::Left => moved(self, Direction::Left),
            Key::Right => moved(self, Direction::Right),
            Key::Enter | Key::F(2) => self.begin_edit(),
            Key::Delete | Key::Backspace => self.clear_selected(),
            _ => match input.printable() {
                Some(c) => self.begin_edit_with(c),
                None => Intent::Ignore,
            },
        }
    }

    fn handle_editing_key(&mut self, input: KeyInput) -> Intent {
        match input.key {
            Key::Enter => self.commit_edit(Some(Axis::Row)),
            Key::Tab => self.commit_edit(Some(Axis::Column)),
            Key::Escape => self.discard_edit(),
            Key::Backspace => self.edit_buffer(|buffer| {
                buffer.backspace();
            }),
            Key::Delete => self.edit_buffer(|buffer| {
                buffer.delete();
            }),
            Key::Left => self.edit_buffer(|buffer| buffer.move_left()),
            Key::Right => self.edit_buffer(|buffer| buffer.move_right()),
            Key::Home => self.edit_buffer(|buffer| buffer.move_home()),
            Key::End => self.edit_buffer(|buffer| buffer.move_end()),
            _ => match input.printable() {
                Some(c) => self.edit_buffer(|buffer| buffer.insert(c)),
                None => Intent::Ignore,
            },
        }
    }

    fn handle_click(&mut self, addr: Address) -> Intent {
        if self.editing_address() == Some(addr) {
            return Intent::Ignore;
        }
        self.select(addr.row, addr.col)
            .map_or(Intent::Ignore, Intent::Select)
    }

    fn handle_double_click(&mut self, addr: Address) -> Intent {
        if self.editing_address() == Some(addr) {
            return Intent::Ignore;
        }
        if self.select(addr.row, addr.col).is_none() {
            return Intent::Ignore;
        }
        self.begin_edit()
    }
}
