//! Application layer: the grid controller and everything that drives it.
//!
//! This module owns selection and edit-session state, turns input events
//! into state transitions, and keeps the formula bar in step with the grid.

pub mod config;
pub mod navigation;
pub mod session;
pub mod history;
pub mod state;
pub mod dispatcher;
pub mod formula_bar;

pub use config::*;
pub use navigation::*;
pub use session::*;
pub use history::*;
pub use state::*;
pub use dispatcher::*;
pub use formula_bar::*;
