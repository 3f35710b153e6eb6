//! Formula bar synchronization.
//!
//! The bar is an external single-line editor bound to the selected cell. It
//! shows the live buffer while editing and the cell's raw content otherwise,
//! and feeds its own edits back into the controller's edit session.

use super::dispatcher::{Key, KeyInput};
use super::navigation::Axis;
use super::state::{GridController, Intent};

/// What the formula bar should display right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaBar {
    /// Reference of the bound cell, e.g. `"B3"`
    pub reference: Option<String>,
    pub text: String,
    /// False with no selection or when the bar is disabled
    pub interactive: bool,
    /// True while an edit session is open on the bound cell
    pub editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaBarEvent {
    /// The bar's full new text after the user typed into it
    Input(String),
    Key(KeyInput),
    Blur,
}

impl GridController {
    pub fn formula_bar(&self) -> FormulaBar {
        let Some(addr) = self.selected_address().filter(|_| self.formula_bar_enabled()) else {
            return FormulaBar {
                reference: None,
                text: String::new(),
                interactive: false,
                editing: false,
            };
        };

        let text = match self.buffer() {
            Some(buffer) => buffer.as_str().to_string(),
            None => self
                .grid()
                .cell(addr.row, addr.col)
                .map(|cell| cell.raw_content())
                .unwrap_or_default(),
        };

        FormulaBar {
            reference: Some(addr.to_reference()),
            text,
            interactive: true,
            editing: self.is_editing(),
        }
    }

    /// Applies an event coming from the formula bar.
    ///
    /// Typing while merely selected opens an edit session seeded with what
    /// was typed (subject to the read-only guard); typing while editing
    /// replaces the buffer.
    pub fn handle_formula_bar(&mut self, event: FormulaBarEvent) -> Intent {
        if !self.formula_bar().interactive {
            return Intent::Ignore;
        }

        match event {
            FormulaBarEvent::Input(text) => {
                if self.is_editing() {
                    self.edit_buffer(|buffer| buffer.set_text(text))
                } else {
                    tracing::debug!(target: "formula_bar", "typing opens an edit session");
                    self.begin_edit_with(text)
                }
            }
            FormulaBarEvent::Key(input) => match input.key {
                Key::Enter => self.commit_edit(Some(Axis::Row)),
                Key::Escape => self.discard_edit(),
                _ => Intent::Ignore,
            },
            FormulaBarEvent::Blur => self.commit_edit(None),
        }
    }
}
