//! Utility modules

pub mod format;
pub mod memory_storage;
pub mod parse;
pub mod validation;

pub use format::*;
pub use memory_storage::*;
pub use parse::*;
pub use validation::*;
