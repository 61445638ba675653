//! Command execution
//!
//! Command lines are handed to the interpreter (default `sh -c`) one at a time.
//! Process creation sits behind [`Spawner`] so the dispatcher can be driven
//! without touching the real toolchain.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{interpolate, Command, Context};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command as StdCommand, Stdio};

/// A fully interpolated command line, ready to hand to the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Interpreter and its leading arguments (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// The command line itself
    pub line: String,

    /// Working directory
    pub dir: PathBuf,

    /// Extra environment on top of the inherited one
    pub env: HashMap<String, String>,
}

impl Invocation {
    fn to_std(&self) -> ExecutionResult<StdCommand> {
        let (program, leading) = self.interpreter.split_first().ok_or_else(|| {
            ExecutionError::Spawn {
                command: self.line.clone(),
                error: "empty interpreter".to_string(),
            }
        })?;

        let mut command = StdCommand::new(program);
        command.args(leading);
        command.arg(&self.line);
        command.current_dir(&self.dir);
        command.envs(&self.env);
        Ok(command)
    }

    fn spawn_error(&self, error: std::io::Error) -> ExecutionError {
        ExecutionError::Spawn {
            command: self.line.clone(),
            error: error.to_string(),
        }
    }
}

/// Output captured from a subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,

    /// Standard output, lossily decoded
    pub stdout: String,
}

/// Starts subprocesses and waits for them
pub trait Spawner {
    /// Run with inherited stdio and return the exit code (`None` if killed by a signal)
    fn status(&mut self, invocation: &Invocation) -> ExecutionResult<Option<i32>>;

    /// Run with standard output captured
    fn output(&mut self, invocation: &Invocation) -> ExecutionResult<Captured>;
}

/// Spawns real processes with `std::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn status(&mut self, invocation: &Invocation) -> ExecutionResult<Option<i32>> {
        let mut command = invocation.to_std()?;
        command
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = command
            .status()
            .map_err(|e| invocation.spawn_error(e))?;
        Ok(status.code())
    }

    fn output(&mut self, invocation: &Invocation) -> ExecutionResult<Captured> {
        let mut command = invocation.to_std()?;
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let output = command
            .output()
            .map_err(|e| invocation.spawn_error(e))?;
        Ok(Captured {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Build the invocation for a command line in the given context
pub fn invocation(line: String, dir: Option<PathBuf>, ctx: &Context) -> Invocation {
    Invocation {
        interpreter: ctx.interpreter.clone(),
        line,
        dir: dir.unwrap_or_else(|| ctx.working_dir.clone()),
        env: ctx.env.clone(),
    }
}

/// Turn an exit code into success or `SubprocessFailed`
pub fn check_exit(line: &str, code: Option<i32>) -> ExecutionResult<()> {
    match code {
        Some(0) => Ok(()),
        exit_code => Err(ExecutionError::SubprocessFailed {
            command: line.to_string(),
            exit_code,
        }),
    }
}

/// Execute a command in the given context
pub fn execute_command(
    cmd: &Command,
    ctx: &Context,
    spawner: &mut dyn Spawner,
) -> ExecutionResult<()> {
    let task = ctx.current_task().cloned().unwrap_or_default();
    let interpolation_error = |error| ExecutionError::Interpolation {
        task: task.clone(),
        error,
    };

    let exec_str = interpolate(cmd.exec(), &ctx.vars).map_err(interpolation_error)?;

    if !cmd.is_quiet() || ctx.dry_run {
        let print_str = match cmd.print() {
            Some(print) => interpolate(print, &ctx.vars).map_err(interpolation_error)?,
            None => exec_str.clone(),
        };
        ctx.print_command(&print_str);
    }

    let working_dir = match cmd.dir() {
        Some(dir) => {
            let dir = interpolate(dir, &ctx.vars).map_err(interpolation_error)?;
            Some(ctx.working_dir.join(dir))
        }
        None => None,
    };

    if ctx.dry_run {
        return Ok(());
    }

    let invocation = invocation(exec_str, working_dir, ctx);
    let code = spawner.status(&invocation)?;
    check_exit(&invocation.line, code)
}
