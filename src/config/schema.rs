//! Task file validation
//!
//! Checks everything that can be checked before a single command runs.

use crate::config::types::{Config, Dep, Task};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    for (name, task) in &config.tasks {
        validate_task(name, task)?;
        for dep in &task.deps {
            validate_dep(config, name, dep)?;
        }
    }

    detect_circular_task_dependencies(config)?;

    Ok(())
}

/// Validate a single task
pub fn validate_task(name: &str, task: &Task) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for arg in &task.args {
        if arg.name.is_empty() {
            return Err(ConfigError::InvalidArgs {
                task: name.to_string(),
                reason: "argument name must not be empty".to_string(),
            });
        }
        if !seen.insert(arg.name.as_str()) || task.options.contains_key(&arg.name) {
            return Err(ConfigError::DuplicateNames(arg.name.clone()));
        }
    }

    // Only the last argument may collect the remaining extra arguments
    if let Some(pos) = task.args.iter().position(|arg| arg.variadic) {
        if pos + 1 != task.args.len() {
            return Err(ConfigError::InvalidArgs {
                task: name.to_string(),
                reason: format!("variadic argument '{}' must be last", task.args[pos].name),
            });
        }
    }

    for (opt_name, option) in &task.options {
        validate_option_type(&option.option_type)?;
        validate_option_flags(name, opt_name, option.short.as_deref())?;
    }

    for arg in &task.args {
        if RESERVED_NAMES.contains(&arg.name.as_str()) {
            return Err(reserved(name, &arg.name));
        }
    }

    Ok(())
}

/// Global flag names every task subcommand inherits
const RESERVED_NAMES: &[&str] = &[
    "file", "quiet", "silent", "verbose", "dry-run", "help", "version",
];

/// Short flags every task subcommand inherits
const RESERVED_SHORTS: &[char] = &['f', 'q', 's', 'v', 'n', 'h', 'V'];

fn reserved(task: &str, flag: &str) -> ConfigError {
    ConfigError::Invalid(format!(
        "Task '{}' redefines built-in flag '{}'",
        task, flag
    ))
}

/// Options can't shadow the global command-line flags
fn validate_option_flags(task: &str, opt_name: &str, short: Option<&str>) -> ConfigResult<()> {
    if RESERVED_NAMES.contains(&opt_name) {
        return Err(reserved(task, opt_name));
    }

    if let Some(short) = short {
        let mut chars = short.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if RESERVED_SHORTS.contains(&c) => {
                return Err(reserved(task, &format!("-{}", c)))
            }
            (Some(_), None) => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Short flag '{}' of option '{}' must be a single character",
                    short, opt_name
                )))
            }
        }
    }

    Ok(())
}

/// Validate an option type string
fn validate_option_type(option_type: &str) -> ConfigResult<()> {
    match option_type {
        "string" | "bool" | "boolean" => Ok(()),
        _ => Err(ConfigError::Invalid(format!(
            "Invalid option type: {}. Must be one of: string, bool",
            option_type
        ))),
    }
}

/// Check that a prerequisite names a known task and passes it a usable argument list
fn validate_dep(config: &Config, task_name: &str, dep: &Dep) -> ConfigResult<()> {
    let target = config
        .tasks
        .get(dep.name())
        .ok_or_else(|| ConfigError::UnknownDependency {
            task: task_name.to_string(),
            dependency: dep.name().to_string(),
        })?;

    let variadic = target.args.last().is_some_and(|arg| arg.variadic);
    if !variadic && dep.args().len() > target.args.len() {
        return Err(ConfigError::InvalidArgs {
            task: task_name.to_string(),
            reason: format!(
                "'{}' takes {} argument(s) but {} were given",
                dep.name(),
                target.args.len(),
                dep.args().len()
            ),
        });
    }

    if let Some(missing) = target
        .args
        .iter()
        .skip(dep.args().len())
        .find(|arg| arg.required && arg.default.is_none() && !arg.variadic)
    {
        return Err(ConfigError::InvalidArgs {
            task: task_name.to_string(),
            reason: format!(
                "'{}' requires argument '{}'",
                dep.name(),
                missing.name
            ),
        });
    }

    Ok(())
}

/// Detect circular dependencies in the prerequisite graph
fn detect_circular_task_dependencies(config: &Config) -> ConfigResult<()> {
    let mut visited = HashSet::new();
    let mut names: Vec<&String> = config.tasks.keys().collect();
    names.sort();
    for task_name in names {
        let mut stack = Vec::new();
        check_task_cycle(config, task_name, &mut visited, &mut stack)?;
    }
    Ok(())
}

/// Recursively check for cycles in task dependencies
fn check_task_cycle(
    config: &Config,
    task_name: &str,
    visited: &mut HashSet<String>,
    stack: &mut Vec<String>,
) -> ConfigResult<()> {
    if stack.iter().any(|name| name == task_name) {
        stack.push(task_name.to_string());
        return Err(ConfigError::CircularDependency(stack.join(" -> ")));
    }

    // Skip if already fully processed
    if visited.contains(task_name) {
        return Ok(());
    }

    let task = config
        .tasks
        .get(task_name)
        .ok_or_else(|| ConfigError::Invalid(format!("Task '{}' is not defined", task_name)))?;

    stack.push(task_name.to_string());
    for dep in &task.deps {
        check_task_cycle(config, dep.name(), visited, stack)?;
    }
    stack.pop();
    visited.insert(task_name.to_string());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::{Arg, DepDetail, Run, TaskOption};

    fn task_with_deps(deps: Vec<Dep>) -> Task {
        Task {
            deps,
            run: vec![Run::SimpleCommand("true".to_string())],
            ..Task::default()
        }
    }

    fn arg(name: &str) -> Arg {
        Arg {
            name: name.to_string(),
            required: true,
            ..Arg::default()
        }
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut task = Task::default();
        task.args.push(arg("name"));
        task.options
            .insert("name".to_string(), TaskOption::default());

        let result = validate_task("test", &task);
        assert!(matches!(result, Err(ConfigError::DuplicateNames(_))));
    }

    #[test]
    fn test_validate_repeated_argument() {
        let mut task = Task::default();
        task.args.push(arg("tool"));
        task.args.push(arg("tool"));

        let result = validate_task("test", &task);
        assert!(matches!(result, Err(ConfigError::DuplicateNames(_))));
    }

    #[test]
    fn test_validate_variadic_must_be_last() {
        let mut task = Task::default();
        task.args.push(Arg {
            variadic: true,
            ..arg("rest")
        });
        task.args.push(arg("tool"));

        let result = validate_task("test", &task);
        assert!(matches!(result, Err(ConfigError::InvalidArgs { .. })));
    }

    #[test]
    fn test_validate_invalid_option_type() {
        assert!(validate_option_type("integer").is_err());
        for opt_type in &["string", "bool", "boolean"] {
            assert!(validate_option_type(opt_type).is_ok(), "Failed for type: {}", opt_type);
        }
    }

    #[test]
    fn test_reserved_flags() {
        let mut task = Task::default();
        task.options.insert(
            "verbose".to_string(),
            TaskOption {
                option_type: "bool".to_string(),
                ..TaskOption::default()
            },
        );
        assert!(matches!(validate_task("test", &task), Err(ConfigError::Invalid(_))));

        let mut task = Task::default();
        task.options.insert(
            "release".to_string(),
            TaskOption {
                short: Some("n".to_string()),
                option_type: "bool".to_string(),
                ..TaskOption::default()
            },
        );
        assert!(matches!(validate_task("test", &task), Err(ConfigError::Invalid(_))));

        let mut task = Task::default();
        task.options.insert(
            "release".to_string(),
            TaskOption {
                short: Some("rel".to_string()),
                option_type: "bool".to_string(),
                ..TaskOption::default()
            },
        );
        assert!(matches!(validate_task("test", &task), Err(ConfigError::Invalid(_))));

        let mut task = Task::default();
        task.args.push(arg("file"));
        assert!(matches!(validate_task("test", &task), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_dependency() {
        let mut config = Config::default();
        config.tasks.insert(
            "lint".to_string(),
            task_with_deps(vec![Dep::Simple("setup".to_string())]),
        );

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(ConfigError::UnknownDependency { ref dependency, .. }) if dependency == "setup"
        ));
    }

    #[test]
    fn test_dependency_argument_count() {
        let mut config = Config::default();
        let mut ensure = Task::default();
        ensure.args.push(arg("tool"));
        config.tasks.insert("ensure_installed".to_string(), ensure);

        // Missing required argument
        config.tasks.insert(
            "lint".to_string(),
            task_with_deps(vec![Dep::Simple("ensure_installed".to_string())]),
        );
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidArgs { .. })
        ));

        // Too many arguments
        config.tasks.insert(
            "lint".to_string(),
            task_with_deps(vec![Dep::Complex(DepDetail {
                name: "ensure_installed".to_string(),
                args: vec!["sort".to_string(), "extra".to_string()],
            })]),
        );
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidArgs { .. })
        ));

        // Exactly right
        config.tasks.insert(
            "lint".to_string(),
            task_with_deps(vec![Dep::Complex(DepDetail {
                name: "ensure_installed".to_string(),
                args: vec!["sort".to_string()],
            })]),
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_detect_circular_dependency() {
        let mut config = Config::default();
        config
            .tasks
            .insert("a".to_string(), task_with_deps(vec![Dep::Simple("b".to_string())]));
        config
            .tasks
            .insert("b".to_string(), task_with_deps(vec![Dep::Simple("a".to_string())]));

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::CircularDependency(_))));
    }

    #[test]
    fn test_detect_self_dependency() {
        let mut config = Config::default();
        config
            .tasks
            .insert("a".to_string(), task_with_deps(vec![Dep::Simple("a".to_string())]));

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::CircularDependency(ref path)) if path == "a -> a"));
    }

    #[test]
    fn test_shared_dependency_is_not_a_cycle() {
        let mut config = Config::default();
        config.tasks.insert("setup".to_string(), task_with_deps(vec![]));
        config.tasks.insert(
            "lint".to_string(),
            task_with_deps(vec![Dep::Simple("setup".to_string())]),
        );
        config.tasks.insert(
            "ci".to_string(),
            task_with_deps(vec![
                Dep::Simple("setup".to_string()),
                Dep::Simple("lint".to_string()),
            ]),
        );

        assert!(validate_config(&config).is_ok());
    }
}
