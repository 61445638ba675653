//! Installed-tool checks
//!
//! `require: <tool>` runs the toolchain listing command (`cargo --list` unless
//! the task file says otherwise) and greps its output for the tool name.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{check_exit, interpolate_strict, invocation, Context, Spawner};

/// Fail with `MissingTool` unless `tool` shows up in the toolchain listing
pub fn ensure_installed(
    tool: &str,
    ctx: &Context,
    spawner: &mut dyn Spawner,
) -> ExecutionResult<()> {
    let tool = interpolate_strict(tool, &ctx.vars).map_err(|error| {
        ExecutionError::Interpolation {
            task: ctx.current_task().cloned().unwrap_or_default(),
            error,
        }
    })?;

    ctx.print_debug(&format!("Looking for '{}' in `{}`", tool, ctx.list_command));

    // The listing has no side effects, so it runs in dry-run mode as well
    let listing = invocation(ctx.list_command.clone(), None, ctx);
    let captured = spawner.output(&listing)?;
    check_exit(&listing.line, captured.code)?;

    if listing_contains(&captured.stdout, &tool) {
        ctx.print_debug(&format!("'{}' is installed", tool));
        return Ok(());
    }

    Err(ExecutionError::MissingTool(tool))
}

/// Whether any line of a toolchain listing contains `tool`, like `grep`
pub fn listing_contains(listing: &str, tool: &str) -> bool {
    listing.lines().any(|line| line.contains(tool))
}

/// Crate that provides a cargo extension
pub fn install_crate(tool: &str) -> String {
    match tool {
        "cross" => "cross".to_string(),
        _ => format!("cargo-{}", tool),
    }
}
