//! Undo/redo of committed grid mutations.

use crate::domain::{Address, Cell, Grid};
use std::collections::VecDeque;

const MAX_UNDO_STACK_SIZE: usize = 100;

/// Represents an action that can be undone/redone.
#[derive(Debug, Clone)]
pub enum UndoAction {
    /// A single cell was committed or cleared
    CellModified {
        address: Address,
        before: Cell,
        after: Cell,
    },
    /// The whole matrix was swapped by the host
    GridReplaced { before: Grid, after: Grid },
}

#[derive(Debug, Default)]
pub struct History {
    undo_stack: VecDeque<UndoAction>,
    redo_stack: VecDeque<UndoAction>,
}

impl History {
    /// Records a new action, dropping the oldest past the limit and
    /// invalidating anything that could be redone.
    pub fn record(&mut self, action: UndoAction) {
        self.undo_stack.push_back(action);
        if self.undo_stack.len() > MAX_UNDO_STACK_SIZE {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    pub fn take_undo(&mut self) -> Option<UndoAction> {
        let action = self.undo_stack.pop_back()?;
        self.redo_stack.push_back(action.clone());
        Some(action)
    }

    pub fn take_redo(&mut self) -> Option<UndoAction> {
        let action = self.redo_stack.pop_back()?;
        self.undo_stack.push_back(action.clone());
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}
