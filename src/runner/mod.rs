//! Task execution engine
//!
//! This module handles the execution of tasks: prerequisite resolution,
//! variable interpolation, installed-tool checks and command running.

pub mod command;
pub mod context;
pub mod dispatch;
pub mod interpolate;
pub mod require;
pub mod task;

// Re-export main types
pub use command::*;
pub use context::*;
pub use dispatch::*;
pub use interpolate::*;
pub use require::*;
pub use task::*;
