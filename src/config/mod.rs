//! Task file parsing and validation
//!
//! This module handles parsing of chore.yml task files, the built-in task
//! set, and validation of the combined configuration.

pub mod builtin;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use builtin::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
