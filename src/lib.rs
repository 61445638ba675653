//! chore - a small task dispatcher for Rust workspace chores
//!
//! Tasks are named sequences of shell command lines with prerequisite tasks.
//! The built-in set covers the usual workspace chores (`lint`, `fmt`, `cross`
//! and the `ensure_installed` check they rely on); a `chore.yml` task file can
//! override them or add more.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod ui;

// Re-export commonly used types
pub use error::{ChoreError, Result};
pub use runner::Dispatcher;

/// Current version of chore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
