//! Task dispatcher
//!
//! Looks tasks up by name, runs their prerequisites depth-first and
//! left-to-right, then runs their own steps in order. The first failure aborts
//! the whole invocation. A prerequisite invocation (name plus arguments) runs
//! at most once per top-level invocation.

use crate::config::{Config, DEFAULT_LIST_COMMAND};
use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{
    ensure_installed, execute_command, interpolate_list, Context, Spawner, Step, SystemSpawner,
    Task,
};
use std::collections::HashMap;

/// Runs tasks from a validated configuration
pub struct Dispatcher<S = SystemSpawner> {
    tasks: HashMap<String, Task>,
    spawner: S,
}

impl Dispatcher<SystemSpawner> {
    /// Create a dispatcher that spawns real processes
    pub fn new(config: &Config) -> Self {
        Self::with_spawner(config, SystemSpawner)
    }
}

impl<S: Spawner> Dispatcher<S> {
    /// Create a dispatcher with a custom process spawner
    pub fn with_spawner(config: &Config, spawner: S) -> Self {
        let tasks = config
            .tasks
            .iter()
            .map(|(name, task)| (name.clone(), Task::from_config(name.clone(), task.clone())))
            .collect();

        Dispatcher { tasks, spawner }
    }

    /// Look up a task by name
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// All tasks, sorted by name
    pub fn tasks(&self) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.tasks.values().collect();
        tasks.sort_by(|a, b| a.name.cmp(&b.name));
        tasks
    }

    /// The process spawner
    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Run a task with positional extra arguments
    pub fn run(
        &mut self,
        name: &str,
        extra_args: &[String],
        ctx: &mut Context,
    ) -> ExecutionResult<()> {
        self.run_with_options(name, extra_args, &HashMap::new(), ctx)
    }

    /// Run a task with positional extra arguments and command-line options
    pub fn run_with_options(
        &mut self,
        name: &str,
        extra_args: &[String],
        options: &HashMap<String, String>,
        ctx: &mut Context,
    ) -> ExecutionResult<()> {
        if !self.tasks.contains_key(name) {
            return Err(ExecutionError::UnknownTask(name.to_string()));
        }
        self.invoke(name, extra_args, options, ctx)
    }

    fn invoke(
        &mut self,
        name: &str,
        args: &[String],
        options: &HashMap<String, String>,
        ctx: &mut Context,
    ) -> ExecutionResult<()> {
        let task = self
            .tasks
            .get(name)
            .cloned()
            .ok_or_else(|| ExecutionError::UnknownTask(name.to_string()))?;

        if ctx.is_completed(name, args) {
            ctx.print_task_skip(name, "already ran");
            return Ok(());
        }
        if ctx.is_task_in_stack(name) {
            return Err(ExecutionError::CircularDependency(name.to_string()));
        }

        // Task scope: globals, then arguments, then options
        let mut scope = ctx.vars.clone();
        scope.extend(task.bind_args(args)?);
        scope.extend(task.resolve_options(options)?);

        ctx.push_task(name.to_string());
        ctx.print_task_start(name);

        let result = self.run_task(&task, scope, ctx);

        ctx.pop_task();
        result?;

        ctx.mark_completed(name, args);
        ctx.print_task_complete(name);
        Ok(())
    }

    fn run_task(
        &mut self,
        task: &Task,
        scope: HashMap<String, String>,
        ctx: &mut Context,
    ) -> ExecutionResult<()> {
        let no_options = HashMap::new();
        for dep in &task.deps {
            let dep_args = interpolate_list(&dep.args, &scope).map_err(|error| {
                ExecutionError::Interpolation {
                    task: task.name.clone(),
                    error,
                }
            })?;
            self.invoke(&dep.name, &dep_args, &no_options, ctx)?;
        }

        let globals = std::mem::replace(&mut ctx.vars, scope);
        let result = self.run_steps(task, ctx);
        ctx.vars = globals;
        result
    }

    fn run_steps(&mut self, task: &Task, ctx: &Context) -> ExecutionResult<()> {
        for step in &task.steps {
            match step {
                Step::Command(cmd) => execute_command(cmd, ctx, &mut self.spawner)?,
                Step::Require(tool) => ensure_installed(tool, ctx, &mut self.spawner)?,
            }
        }
        Ok(())
    }
}

/// Build a context from the configuration's top-level settings
pub fn context_for(config: &Config, env: HashMap<String, String>) -> Context {
    // Task-file vars win over the environment
    let mut vars = env.clone();
    vars.extend(config.vars.iter().map(|(k, v)| (k.clone(), v.clone())));

    let mut ctx = Context::new().with_vars(vars).with_env(env);
    if let Some(interpreter) = &config.interpreter {
        ctx = ctx.with_interpreter(interpreter.clone());
    }
    ctx.with_list_command(
        config
            .list_command
            .clone()
            .unwrap_or_else(|| DEFAULT_LIST_COMMAND.to_string()),
    )
}
