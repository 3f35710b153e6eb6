//! gridentry - Grid Data-Entry Engine
//!
//! The headless core of a spreadsheet-style widget: a rectangular cell matrix,
//! A1-style addressing, an exclusive single-cell edit session, keyboard
//! dispatch and a synchronized formula bar. Rendering lives in the
//! `presentation` layer and only observes the core.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
