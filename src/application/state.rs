//! The grid controller: selection, edit session and change notification.
//!
//! All mutation goes through this type. The rendering layer reads it and
//! feeds it input events (see [`dispatcher`](super::dispatcher)); it never
//! holds selection or edit state of its own.

use super::config::GridConfig;
use super::history::{History, UndoAction};
use super::navigation::{Axis, Bounds, Direction};
use super::session::{EditSession, EditState, TextBuffer};
use crate::domain::{Address, CellContent, Grid, GridResult};
use std::fmt;

/// Callback invoked with the full grid after every applied mutation.
pub type ChangeCallback = Box<dyn FnMut(&Grid)>;

/// What an edit session starts out holding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSeed {
    /// The cell's formula, or its stringified value (Enter, F2, double-click)
    CurrentContent,
    /// Text typed to overwrite the cell
    Text(String),
}

/// What handling an input event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Selection moved by keyboard navigation
    Navigate(Address),
    /// Selection set by pointer or programmatically
    Select(Address),
    /// An edit session opened on the address
    BeginEdit(Address),
    /// The open buffer changed (text or cursor)
    EditBuffer,
    /// Buffer written to `from`; selection now at `to`
    Commit { from: Address, to: Address },
    /// Buffer thrown away; selection unchanged
    Discard(Address),
    Clear(Address),
    Undo,
    Redo,
    /// The event asked for something read-only rules forbid; nothing changed
    Refused,
    /// The event means nothing in the current state
    Ignore,
}

/// Owns a grid and the single selection/edit session over it.
///
/// # Examples
///
/// ```
/// use gridentry::application::{GridConfig, GridController};
/// use gridentry::domain::{Address, CellValue};
///
/// let mut grid = GridController::new(GridConfig::default()).unwrap();
/// grid.select(0, 0);
/// grid.begin_edit_with("42");
/// grid.commit_edit(None);
///
/// assert_eq!(grid.grid().cell(0, 0).unwrap().value, CellValue::Number(42.0));
/// assert_eq!(grid.selected_address(), Some(Address::new(0, 0)));
/// ```
pub struct GridController {
    grid: Grid,
    state: EditState,
    read_only: bool,
    formula_bar_enabled: bool,
    history: History,
    on_change: Option<ChangeCallback>,
}

impl fmt::Debug for GridController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridController")
            .field("grid", &self.grid)
            .field("state", &self.state)
            .field("read_only", &self.read_only)
            .field("formula_bar_enabled", &self.formula_bar_enabled)
            .finish_non_exhaustive()
    }
}

impl GridController {
    /// Builds a controller in the Idle state.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::JaggedRows`](crate::domain::GridError::JaggedRows)
    /// when `config.initial_grid` is not rectangular.
    pub fn new(config: GridConfig) -> GridResult<Self> {
        let grid = Grid::initialize(config.initial_grid, Some(config.rows), Some(config.columns))
            .inspect_err(|e| tracing::warn!(target: "grid", error = %e, "rejected initial grid"))?;

        tracing::debug!(
            target: "grid",
            rows = grid.num_rows(),
            cols = grid.num_cols(),
            read_only = config.read_only,
            "grid controller created"
        );

        Ok(Self {
            grid,
            state: EditState::Idle,
            read_only: config.read_only,
            formula_bar_enabled: config.formula_bar_enabled,
            history: History::default(),
            on_change: None,
        })
    }

    /// Registers the change callback, replacing any previous one.
    pub fn with_on_change(mut self, callback: impl FnMut(&Grid) + 'static) -> Self {
        self.set_on_change(callback);
        self
    }

    pub fn set_on_change(&mut self, callback: impl FnMut(&Grid) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::of(&self.grid)
    }

    pub fn selected_address(&self) -> Option<Address> {
        self.state.selected_address()
    }

    pub fn editing_address(&self) -> Option<Address> {
        self.state.editing_address()
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    /// The open edit buffer, if any.
    pub fn buffer(&self) -> Option<&TextBuffer> {
        self.state.session().map(|session| &session.buffer)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn formula_bar_enabled(&self) -> bool {
        self.formula_bar_enabled
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// True when an edit may be opened on `addr`.
    pub fn can_edit(&self, addr: Address) -> bool {
        !self.read_only
            && self
                .grid
                .cell(addr.row, addr.col)
                .is_some_and(|cell| !cell.read_only)
    }

    /// Selects the top-left cell if nothing is selected yet.
    pub fn focus(&mut self) -> Option<Address> {
        match self.selected_address() {
            Some(addr) => Some(addr),
            None => self.select(0, 0),
        }
    }

    /// Selects the clamped position. Any open edit elsewhere is committed
    /// first, without advancing.
    ///
    /// Returns `None`, leaving the state alone, when the grid has no cells.
    pub fn select(&mut self, row: usize, col: usize) -> Option<Address> {
        let target = self.bounds().clamp(row, col)?;

        match self.editing_address() {
            Some(editing) if editing == target => return Some(target),
            Some(_) => {
                self.commit_edit(None);
            }
            None => {}
        }

        tracing::debug!(target: "selection", cell = %target, "select");
        self.state = EditState::Selected(target);
        Some(target)
    }

    /// Drops the selection, committing an open edit first.
    pub fn deselect(&mut self) {
        if self.is_editing() {
            self.commit_edit(None);
        }
        tracing::debug!(target: "selection", "deselect");
        self.state = EditState::Idle;
    }

    /// Moves the selection one cell. Refused (returns `None`) while editing
    /// or when nothing is selected.
    pub fn move_selection(&mut self, direction: Direction) -> Option<Address> {
        let EditState::Selected(from) = self.state else {
            return None;
        };
        let to = self.bounds().step(from, direction);
        tracing::trace!(target: "selection", from = %from, to = %to, ?direction, "move");
        self.state = EditState::Selected(to);
        Some(to)
    }

    /// Opens an edit session on the selected cell seeded with its current content.
    pub fn begin_edit(&mut self) -> Intent {
        self.begin_edit_seeded(EditSeed::CurrentContent)
    }

    /// Opens an edit session whose buffer starts as `text` (type to overwrite).
    pub fn begin_edit_with(&mut self, text: impl Into<String>) -> Intent {
        self.begin_edit_seeded(EditSeed::Text(text.into()))
    }

    pub fn begin_edit_seeded(&mut self, seed: EditSeed) -> Intent {
        let EditState::Selected(addr) = self.state else {
            return Intent::Ignore;
        };

        if !self.can_edit(addr) {
            tracing::debug!(target: "edit", cell = %addr, "edit refused: read-only");
            return Intent::Refused;
        }

        let seed = match seed {
            EditSeed::CurrentContent => self
                .grid
                .cell(addr.row, addr.col)
                .map(|cell| cell.raw_content())
                .unwrap_or_default(),
            EditSeed::Text(text) => text,
        };

        tracing::debug!(target: "edit", cell = %addr, "begin edit");
        self.state = EditState::Editing(EditSession::new(addr, seed));
        Intent::BeginEdit(addr)
    }

    /// Applies `edit` to the open buffer. `Ignore` when not editing.
    pub fn edit_buffer(&mut self, edit: impl FnOnce(&mut TextBuffer)) -> Intent {
        match &mut self.state {
            EditState::Editing(session) => {
                edit(&mut session.buffer);
                Intent::EditBuffer
            }
            _ => Intent::Ignore,
        }
    }

    /// Parses the buffer into the cell and ends the session.
    ///
    /// With `advance` the selection then moves along that axis; without it
    /// the selection stays on the edited cell.
    pub fn commit_edit(&mut self, advance: Option<Axis>) -> Intent {
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return Intent::Ignore;
        };
        let from = session.address;

        let content = CellContent::parse(session.buffer.as_str());
        self.apply_cell_change(from, |grid| grid.set_cell_value(from.row, from.col, content));

        let to = match advance {
            Some(axis) => self.bounds().advance(from, axis),
            None => from,
        };

        tracing::debug!(target: "edit", from = %from, to = %to, "commit");
        self.state = EditState::Selected(to);
        Intent::Commit { from, to }
    }

    /// Throws the buffer away and returns to the edited cell.
    pub fn discard_edit(&mut self) -> Intent {
        let EditState::Editing(session) = std::mem::take(&mut self.state) else {
            return Intent::Ignore;
        };
        let addr = session.address;
        tracing::debug!(target: "edit", cell = %addr, "discard");
        self.state = EditState::Selected(addr);
        Intent::Discard(addr)
    }

    /// Clears the selected cell (Delete/Backspace while not editing).
    pub fn clear_selected(&mut self) -> Intent {
        let EditState::Selected(addr) = self.state else {
            return Intent::Ignore;
        };

        if !self.can_edit(addr) {
            tracing::debug!(target: "edit", cell = %addr, "clear refused: read-only");
            return Intent::Refused;
        }

        self.apply_cell_change(addr, |grid| grid.clear_cell(addr.row, addr.col));
        Intent::Clear(addr)
    }

    /// Swaps the whole matrix.
    ///
    /// An open edit is discarded. The selection is clamped into the new
    /// bounds, or dropped when the new grid has no cells.
    pub fn replace_grid(&mut self, grid: Grid) {
        let previous = self.selected_address();
        let before = std::mem::replace(&mut self.grid, grid);

        self.state = match previous {
            Some(addr) => match self.bounds().clamp(addr.row, addr.col) {
                Some(clamped) => EditState::Selected(clamped),
                None => EditState::Idle,
            },
            None => EditState::Idle,
        };

        tracing::debug!(
            target: "grid",
            rows = self.grid.num_rows(),
            cols = self.grid.num_cols(),
            "grid replaced"
        );
        self.history.record(UndoAction::GridReplaced {
            before,
            after: self.grid.clone(),
        });
        self.notify();
    }

    /// Reverts the last committed mutation.
    pub fn undo(&mut self) -> Intent {
        if self.read_only || self.is_editing() {
            return Intent::Refused;
        }
        match self.history.take_undo() {
            Some(action) => {
                self.restore(action, true);
                Intent::Undo
            }
            None => Intent::Ignore,
        }
    }

    /// Re-applies the last undone mutation.
    pub fn redo(&mut self) -> Intent {
        if self.read_only || self.is_editing() {
            return Intent::Refused;
        }
        match self.history.take_redo() {
            Some(action) => {
                self.restore(action, false);
                Intent::Redo
            }
            None => Intent::Ignore,
        }
    }

    fn restore(&mut self, action: UndoAction, backwards: bool) {
        match action {
            UndoAction::CellModified { address, before, after } => {
                let cell = if backwards { before } else { after };
                self.grid = self.grid.replace_cell(address.row, address.col, cell);
                self.select(address.row, address.col);
            }
            UndoAction::GridReplaced { before, after } => {
                self.grid = if backwards { before } else { after };
                self.state = match self.selected_address() {
                    Some(addr) => self
                        .bounds()
                        .clamp(addr.row, addr.col)
                        .map_or(EditState::Idle, EditState::Selected),
                    None => EditState::Idle,
                };
            }
        }
        tracing::debug!(target: "edit", backwards, "history restore");
        self.notify();
    }

    fn apply_cell_change(&mut self, addr: Address, change: impl FnOnce(&Grid) -> Grid) {
        let Some(before) = self.grid.cell(addr.row, addr.col).cloned() else {
            return;
        };
        self.grid = change(&self.grid);

        if let Some(after) = self.grid.cell(addr.row, addr.col).cloned() {
            self.history.record(UndoAction::CellModified {
                address: addr,
                before,
                after,
            });
        }
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.grid);
        }
    }
}
