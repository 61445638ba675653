//! Runtime task representation
//!
//! Converts task file entries into the shape the dispatcher executes, and
//! binds invocation arguments and options to variables.

use crate::config;
use crate::error::{ExecutionError, ExecutionResult};
use std::collections::HashMap;
use std::env;

/// Runtime task representation
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Whether this task is private
    pub private: bool,

    /// Prerequisite invocations, in declaration order
    pub deps: Vec<TaskRef>,

    /// Positional arguments, in order
    pub args: Vec<Arg>,

    /// Named options, sorted by name
    pub options: Vec<TaskOption>,

    /// Steps to execute
    pub steps: Vec<Step>,
}

impl Task {
    /// Create a new task from configuration
    pub fn from_config(name: String, config: config::Task) -> Self {
        let mut options: Vec<TaskOption> = config
            .options
            .into_iter()
            .map(|(k, v)| TaskOption::from_config(k, v))
            .collect();
        options.sort_by(|a, b| a.name.cmp(&b.name));

        Task {
            name,
            usage: config.usage,
            description: config.description,
            private: config.private,
            deps: config.deps.into_iter().map(TaskRef::from_config).collect(),
            args: config.args.into_iter().map(Arg::from_config).collect(),
            options,
            steps: config.run.into_iter().map(Step::from_config).collect(),
        }
    }

    /// Bind positional extra arguments to the declared arguments.
    ///
    /// Every declared argument gets a value: the given one, its default, or
    /// the empty string when it is optional.
    pub fn bind_args(&self, extra: &[String]) -> ExecutionResult<HashMap<String, String>> {
        let mut vars = HashMap::new();
        let mut remaining = extra.iter();

        for arg in &self.args {
            if arg.variadic {
                let rest: Vec<&str> = remaining.by_ref().map(String::as_str).collect();
                let value = if rest.is_empty() {
                    arg.default.clone().unwrap_or_default()
                } else {
                    rest.join(" ")
                };
                if value.is_empty() && arg.required {
                    return Err(self.missing_argument(arg));
                }
                vars.insert(arg.name.clone(), value);
                continue;
            }

            let value = match (remaining.next(), &arg.default) {
                (Some(value), _) => value.clone(),
                (None, Some(default)) => default.clone(),
                (None, None) if arg.required => return Err(self.missing_argument(arg)),
                (None, None) => String::new(),
            };
            vars.insert(arg.name.clone(), value);
        }

        let unexpected: Vec<String> = remaining.cloned().collect();
        if !unexpected.is_empty() {
            return Err(ExecutionError::UnexpectedArguments {
                task: self.name.clone(),
                args: unexpected,
            });
        }

        Ok(vars)
    }

    /// Resolve option values into variables.
    ///
    /// `given` holds raw values from the command line; boolean options are
    /// present (with any value) when the flag was passed. Unset options fall
    /// back to their default, then their environment variable, then the empty
    /// string.
    pub fn resolve_options(
        &self,
        given: &HashMap<String, String>,
    ) -> ExecutionResult<HashMap<String, String>> {
        let mut vars = HashMap::new();

        for opt in &self.options {
            let value = match opt.option_type {
                OptionType::Bool => match given.get(&opt.name) {
                    Some(_) => opt.rewrite.clone().unwrap_or_else(|| "true".to_string()),
                    None => String::new(),
                },
                OptionType::String => match given.get(&opt.name) {
                    Some(value) => opt.rewrite.clone().unwrap_or_else(|| value.clone()),
                    None => match opt.fallback() {
                        Some(value) => value,
                        None if opt.required => {
                            return Err(ExecutionError::MissingOption {
                                task: self.name.clone(),
                                option: opt.name.clone(),
                            })
                        }
                        None => String::new(),
                    },
                },
            };
            vars.insert(opt.name.clone(), value);
        }

        Ok(vars)
    }

    fn missing_argument(&self, arg: &Arg) -> ExecutionError {
        ExecutionError::MissingArgument {
            task: self.name.clone(),
            arg: arg.name.clone(),
        }
    }
}

/// A prerequisite invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRef {
    pub name: String,
    pub args: Vec<String>,
}

impl TaskRef {
    pub fn from_config(config: config::Dep) -> Self {
        match config {
            config::Dep::Simple(name) => TaskRef {
                name,
                args: Vec::new(),
            },
            config::Dep::Complex(detail) => TaskRef {
                name: detail.name,
                args: detail.args,
            },
        }
    }
}

/// A single step of a task
#[derive(Debug, Clone)]
pub enum Step {
    /// Run a command line
    Command(Command),

    /// Check that a toolchain extension is installed
    Require(String),
}

impl Step {
    /// Create from config
    pub fn from_config(config: config::Run) -> Self {
        match config {
            config::Run::SimpleCommand(cmd) => Step::Command(Command::Simple(cmd)),
            config::Run::Require(item) => Step::Require(item.require),
            config::Run::Command(detail) => Step::Command(Command::Complex {
                exec: detail.exec,
                print: detail.print,
                quiet: detail.quiet,
                dir: detail.dir,
            }),
        }
    }
}

/// Runtime representation of a command
#[derive(Debug, Clone)]
pub enum Command {
    /// Simple command string
    Simple(String),

    /// Command with options
    Complex {
        exec: String,
        print: Option<String>,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    /// Get the command to execute
    pub fn exec(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { exec, .. } => exec,
        }
    }

    /// Get what to print instead of the command, if anything
    pub fn print(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { print, .. } => print.as_deref(),
        }
    }

    /// Check if this command is quiet
    pub fn is_quiet(&self) -> bool {
        match self {
            Command::Simple(_) => false,
            Command::Complex { quiet, .. } => *quiet,
        }
    }

    /// Get the working directory
    pub fn dir(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { dir, .. } => dir.as_deref(),
        }
    }
}

/// Runtime representation of an option
#[derive(Debug, Clone)]
pub struct TaskOption {
    pub name: String,
    pub usage: Option<String>,
    pub short: Option<char>,
    pub option_type: OptionType,
    pub default: Option<String>,
    pub required: bool,
    pub rewrite: Option<String>,
    pub environment: Option<String>,
    pub private: bool,
}

impl TaskOption {
    pub fn from_config(name: String, config: config::TaskOption) -> Self {
        let option_type = match config.option_type.as_str() {
            "bool" | "boolean" => OptionType::Bool,
            _ => OptionType::String,
        };

        TaskOption {
            name,
            usage: config.usage,
            short: config.short.and_then(|s| s.chars().next()),
            option_type,
            default: config.default,
            required: config.required,
            rewrite: config.rewrite,
            environment: config.environment,
            private: config.private,
        }
    }

    /// Value used when the option is not given
    fn fallback(&self) -> Option<String> {
        self.default.clone().or_else(|| {
            self.environment
                .as_ref()
                .and_then(|var| env::var(var).ok())
        })
    }
}

/// Option value types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    String,
    Bool,
}

/// Runtime representation of a positional argument
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: String,
    pub usage: Option<String>,
    pub default: Option<String>,
    pub required: bool,
    pub variadic: bool,
}

impl Arg {
    pub fn from_config(config: config::Arg) -> Self {
        Arg {
            name: config.name,
            usage: config.usage,
            default: config.default,
            required: config.required,
            variadic: config.variadic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(yaml: &str) -> Task {
        let config: config::Task = serde_yaml::from_str(yaml).unwrap();
        Task::from_config("test".to_string(), config)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_config_steps() {
        let task = task(
            r#"
deps:
  - name: ensure_installed
    args: [sort]
run:
  - require: sort
  - cargo sort --check
"#,
        );
        assert_eq!(
            task.deps,
            vec![TaskRef {
                name: "ensure_installed".to_string(),
                args: strings(&["sort"]),
            }]
        );
        assert!(matches!(&task.steps[0], Step::Require(tool) if tool == "sort"));
        assert!(matches!(&task.steps[1], Step::Command(cmd) if cmd.exec() == "cargo sort --check"));
    }

    #[test]
    fn test_bind_required_argument() {
        let task = task(
            r#"
args:
  - name: tool
    required: true
"#,
        );

        let vars = task.bind_args(&strings(&["sort"])).unwrap();
        assert_eq!(vars.get("tool").map(String::as_str), Some("sort"));

        let result = task.bind_args(&[]);
        assert!(matches!(result, Err(ExecutionError::MissingArgument { ref arg, .. }) if arg == "tool"));
    }

    #[test]
    fn test_bind_optional_and_default_arguments() {
        let task = task(
            r#"
args:
  - name: profile
    default: dev
  - name: features
"#,
        );

        let vars = task.bind_args(&[]).unwrap();
        assert_eq!(vars.get("profile").map(String::as_str), Some("dev"));
        assert_eq!(vars.get("features").map(String::as_str), Some(""));
    }

    #[test]
    fn test_bind_unexpected_arguments() {
        let task = task(
            r#"
args:
  - name: tool
"#,
        );

        let result = task.bind_args(&strings(&["sort", "cross"]));
        assert!(matches!(
            result,
            Err(ExecutionError::UnexpectedArguments { ref args, .. }) if args == &strings(&["cross"])
        ));
    }

    #[test]
    fn test_bind_variadic_argument() {
        let task = task(
            r#"
args:
  - name: package
  - name: rest
    variadic: true
"#,
        );

        let vars = task
            .bind_args(&strings(&["core", "--features", "serde"]))
            .unwrap();
        assert_eq!(vars.get("package").map(String::as_str), Some("core"));
        assert_eq!(vars.get("rest").map(String::as_str), Some("--features serde"));

        let vars = task.bind_args(&strings(&["core"])).unwrap();
        assert_eq!(vars.get("rest").map(String::as_str), Some(""));
    }

    #[test]
    fn test_resolve_bool_option_with_rewrite() {
        let task = task(
            r#"
options:
  release:
    type: bool
    rewrite: --release
"#,
        );

        let vars = task.resolve_options(&HashMap::new()).unwrap();
        assert_eq!(vars.get("release").map(String::as_str), Some(""));

        let mut given = HashMap::new();
        given.insert("release".to_string(), "true".to_string());
        let vars = task.resolve_options(&given).unwrap();
        assert_eq!(vars.get("release").map(String::as_str), Some("--release"));
    }

    #[test]
    fn test_resolve_string_option_fallbacks() {
        env::set_var("CHORE_TEST_PROFILE", "ci");
        let task = task(
            r#"
options:
  jobs:
    default: "4"
  profile:
    environment: CHORE_TEST_PROFILE
  features: {}
"#,
        );

        let vars = task.resolve_options(&HashMap::new()).unwrap();
        assert_eq!(vars.get("jobs").map(String::as_str), Some("4"));
        assert_eq!(vars.get("profile").map(String::as_str), Some("ci"));
        assert_eq!(vars.get("features").map(String::as_str), Some(""));
        env::remove_var("CHORE_TEST_PROFILE");

        let mut given = HashMap::new();
        given.insert("jobs".to_string(), "8".to_string());
        let vars = task.resolve_options(&given).unwrap();
        assert_eq!(vars.get("jobs").map(String::as_str), Some("8"));
    }

    #[test]
    fn test_resolve_required_option() {
        let task = task(
            r#"
options:
  target:
    required: true
"#,
        );

        let result = task.resolve_options(&HashMap::new());
        assert!(matches!(result, Err(ExecutionError::MissingOption { ref option, .. }) if option == "target"));
    }

    #[test]
    fn test_options_sorted_by_name() {
        let task = task(
            r#"
options:
  zeta: {}
  alpha: {}
"#,
        );
        let names: Vec<&str> = task.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
