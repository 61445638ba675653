//! Execution context for task running
//!
//! The context tracks all the state needed during one top-level invocation.

use crate::config::DEFAULT_LIST_COMMAND;
use crate::ui;
use std::collections::{HashMap, HashSet};
use std::env;
use std::path::PathBuf;

/// Execution context that tracks state during task execution
pub struct Context {
    /// Current working directory
    pub working_dir: PathBuf,

    /// Variables visible to the steps currently running
    pub vars: HashMap<String, String>,

    /// Extra environment exported to every subprocess (from .env)
    pub env: HashMap<String, String>,

    /// Interpreter command lines are handed to (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Command listing installed toolchain extensions
    pub list_command: String,

    /// Stack of tasks being executed (for detecting recursion)
    pub task_stack: Vec<String>,

    /// Task invocations (name and arguments) that already completed
    pub completed: HashSet<(String, Vec<String>)>,

    /// Print commands instead of running them
    pub dry_run: bool,

    /// Verbosity level
    pub verbosity: Verbosity,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            vars: HashMap::new(),
            env: HashMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            list_command: DEFAULT_LIST_COMMAND.to_string(),
            task_stack: Vec::new(),
            completed: HashSet::new(),
            dry_run: false,
            verbosity: Verbosity::Normal,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set variables
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    /// Set environment exported to subprocesses
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Get a variable value
    pub fn get_var(&self, key: &str) -> Option<&String> {
        self.vars.get(key)
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        if !interpreter.is_empty() {
            self.interpreter = interpreter;
        }
        self
    }

    /// Set the toolchain listing command
    pub fn with_list_command(mut self, list_command: String) -> Self {
        self.list_command = list_command;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Push a task onto the execution stack
    pub fn push_task(&mut self, task_name: String) {
        self.task_stack.push(task_name);
    }

    /// Pop a task from the execution stack
    pub fn pop_task(&mut self) -> Option<String> {
        self.task_stack.pop()
    }

    /// Check if a task is in the execution stack (detect recursion)
    pub fn is_task_in_stack(&self, task_name: &str) -> bool {
        self.task_stack.iter().any(|t| t == task_name)
    }

    /// Get the current task name (top of stack)
    pub fn current_task(&self) -> Option<&String> {
        self.task_stack.last()
    }

    /// Record a finished task invocation
    pub fn mark_completed(&mut self, task_name: &str, args: &[String]) {
        self.completed.insert((task_name.to_string(), args.to_vec()));
    }

    /// Whether this exact invocation already ran
    pub fn is_completed(&self, task_name: &str, args: &[String]) -> bool {
        self.completed
            .contains(&(task_name.to_string(), args.to_vec()))
    }

    /// Print a command line about to run
    pub fn print_command(&self, line: &str) {
        if self.verbosity < Verbosity::Normal {
            return;
        }
        if self.dry_run {
            ui::print_dry_run(line);
        } else {
            ui::print_run(line);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            ui::print_debug(message);
        }
    }

    /// Print task start message
    pub fn print_task_start(&self, task_name: &str) {
        self.print_debug(&format!("Running task: {}", task_name));
    }

    /// Print task complete message
    pub fn print_task_complete(&self, task_name: &str) {
        self.print_debug(&format!("Task completed: {}", task_name));
    }

    /// Print task skip message
    pub fn print_task_skip(&self, task_name: &str, reason: &str) {
        self.print_debug(&format!("Skipping task '{}': {}", task_name, reason));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = Context::new();
        assert_eq!(ctx.verbosity, Verbosity::Normal);
        assert_eq!(ctx.interpreter, vec!["sh", "-c"]);
        assert_eq!(ctx.list_command, "cargo --list");
        assert!(ctx.vars.is_empty());
        assert!(ctx.task_stack.is_empty());
        assert!(!ctx.dry_run);
    }

    #[test]
    fn test_context_with_vars() {
        let mut vars = HashMap::new();
        vars.insert("key".to_string(), "value".to_string());

        let ctx = Context::new().with_vars(vars);
        assert_eq!(ctx.get_var("key"), Some(&"value".to_string()));
    }

    #[test]
    fn test_task_stack() {
        let mut ctx = Context::new();

        assert!(!ctx.is_task_in_stack("lint"));

        ctx.push_task("lint".to_string());
        assert!(ctx.is_task_in_stack("lint"));
        assert_eq!(ctx.current_task(), Some(&"lint".to_string()));

        ctx.push_task("ensure_installed".to_string());
        assert_eq!(ctx.current_task(), Some(&"ensure_installed".to_string()));

        let popped = ctx.pop_task();
        assert_eq!(popped, Some("ensure_installed".to_string()));
        assert!(!ctx.is_task_in_stack("ensure_installed"));
        assert_eq!(ctx.current_task(), Some(&"lint".to_string()));
    }

    #[test]
    fn test_completed_is_keyed_on_arguments() {
        let mut ctx = Context::new();
        let sort = vec!["sort".to_string()];
        let cross = vec!["cross".to_string()];

        ctx.mark_completed("ensure_installed", &sort);
        assert!(ctx.is_completed("ensure_installed", &sort));
        assert!(!ctx.is_completed("ensure_installed", &cross));
        assert!(!ctx.is_completed("lint", &[]));
    }

    #[test]
    fn test_verbosity_levels() {
        assert!(Verbosity::Verbose > Verbosity::Normal);
        assert!(Verbosity::Normal > Verbosity::Quiet);
        assert!(Verbosity::Quiet > Verbosity::Silent);
    }

    #[test]
    fn test_empty_interpreter_is_ignored() {
        let ctx = Context::new().with_interpreter(Vec::new());
        assert_eq!(ctx.interpreter, vec!["sh", "-c"]);

        let ctx = Context::new().with_interpreter(vec!["bash".to_string(), "-c".to_string()]);
        assert_eq!(ctx.interpreter, vec!["bash", "-c"]);
    }
}
