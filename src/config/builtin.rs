//! Built-in task set
//!
//! The four workspace chores (`ensure_installed`, `lint`, `fmt`, `cross`) ship
//! inside the binary so `chore` works without a task file.

use crate::config::types::Config;
use crate::config::parse_config;
use crate::error::Result;

/// Target triple of the built-in `cross` task.
///
/// `builtin.yml` spells it out in its `target` var; `test_builtin_target`
/// keeps the two in step.
pub const DEFAULT_TARGET: &str = "aarch64-unknown-linux-gnu";

/// Default command listing installed cargo extensions
pub const DEFAULT_LIST_COMMAND: &str = "cargo --list";

const BUILTIN_TASKS: &str = include_str!("builtin.yml");

/// Parse the embedded task set
pub fn builtin_config() -> Result<Config> {
    parse_config(BUILTIN_TASKS)
}

/// Overlay a task file on top of a base configuration.
///
/// Tasks, variables and settings from `overlay` replace those of `base` with
/// the same name; everything else in `base` is kept.
pub fn merge_config(mut base: Config, overlay: Config) -> Config {
    if overlay.name.is_some() {
        base.name = overlay.name;
    }
    if overlay.usage.is_some() {
        base.usage = overlay.usage;
    }
    if overlay.interpreter.is_some() {
        base.interpreter = overlay.interpreter;
    }
    if overlay.list_command.is_some() {
        base.list_command = overlay.list_command;
    }
    base.dotenv |= overlay.dotenv;
    base.vars.extend(overlay.vars);
    base.tasks.extend(overlay.tasks);
    base
}
