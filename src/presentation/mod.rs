//! Presentation layer handling the terminal UI and user input.
//!
//! This module hosts a grid controller in a ratatui/crossterm terminal:
//! it draws the grid and formula bar, translates terminal events into core
//! input events, and parses the command line.

pub mod cli;
pub mod host;
pub mod ui;
pub mod input;

pub use cli::*;
pub use host::*;
pub use ui::*;
pub use input::*;
