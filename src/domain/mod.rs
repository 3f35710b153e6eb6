pub mod models;
pub mod reference;
pub mod parser;
pub mod errors;

pub use models::*;
pub use reference::*;
pub use parser::*;
pub use errors::*;
