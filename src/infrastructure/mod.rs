//! Infrastructure layer providing external service integrations.
//!
//! File persistence of grids and log output setup for the host binary.

pub mod persistence;
pub mod logging;

pub use persistence::*;
