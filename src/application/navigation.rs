//! Bounds-clamped cursor movement.
//!
//! These are pure functions over grid dimensions; the controller owns the
//! selection and decides when moving is allowed.

use crate::domain::{Address, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which way the cursor advances after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Enter: next row, same column
    Row,
    /// Tab: next column, wrapping to the start of the next row
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub rows: usize,
    pub cols: usize,
}

impl Bounds {
    pub fn of(grid: &Grid) -> Self {
        Self {
            rows: grid.num_rows(),
            cols: grid.num_cols(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.row < self.rows && addr.col < self.cols
    }

    /// Clamps a position into the grid. `None` when the grid has no cells.
    pub fn clamp(&self, row: usize, col: usize) -> Option<Address> {
        if self.is_empty() {
            return None;
        }
        Some(Address::new(row.min(self.rows - 1), col.min(self.cols - 1)))
    }

    /// One step in `direction`, holding at the edge instead of wrapping.
    pub fn step(&self, from: Address, direction: Direction) -> Address {
        let (row, col) = match direction {
            Direction::Up => (from.row.saturating_sub(1), from.col),
            Direction::Down => (from.row.saturating_add(1), from.col),
            Direction::Left => (from.row, from.col.saturating_sub(1)),
            Direction::Right => (from.row, from.col.saturating_add(1)),
        };
        self.clamp(row, col).unwrap_or(from)
    }

    /// Where the cursor lands after committing at `from`.
    pub fn advance(&self, from: Address, axis: Axis) -> Address {
        match axis {
            Axis::Row => self.step(from, Direction::Down),
            Axis::Column => {
                if from.col + 1 < self.cols {
                    Address::new(from.row, from.col + 1)
                } else if from.row + 1 < self.rows {
                    Address::new(from.row + 1, 0)
                } else {
                    from
                }
            }
        }
    }
}
