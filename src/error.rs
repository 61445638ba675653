//! Error types for chore

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for chore operations
pub type Result<T> = std::result::Result<T, ChoreError>;

/// Main error type for chore
#[derive(Error, Debug)]
pub enum ChoreError {
    /// Task file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ChoreError {
    /// Process exit status for this error.
    ///
    /// A failing subprocess propagates its own exit code; everything else,
    /// including a subprocess killed by a signal, exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ChoreError::Execution(ExecutionError::SubprocessFailed {
                exit_code: Some(code),
                ..
            }) if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Task file parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find task file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task '{task}' depends on undefined task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Argument and option '{0}' must have unique names within a task")]
    DuplicateNames(String),

    #[error("Invalid arguments for task '{task}': {reason}")]
    InvalidArgs { task: String, reason: String },

    #[error("Failed to read task file '{path}': {error}")]
    Read { path: PathBuf, error: String },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{0}' is not defined")]
    UnknownTask(String),

    #[error(
        "'{0}' is not installed; install it with `cargo install {}`",
        crate::runner::install_crate(.0)
    )]
    MissingTool(String),

    #[error("Command `{command}` failed with exit code {}", display_code(.exit_code))]
    SubprocessFailed {
        command: String,
        exit_code: Option<i32>,
    },

    #[error("Failed to spawn `{command}`: {error}")]
    Spawn { command: String, error: String },

    #[error("Task '{task}' requires argument '{arg}'")]
    MissingArgument { task: String, arg: String },

    #[error("Option '{option}' of task '{task}' is required but not provided")]
    MissingOption { task: String, option: String },

    #[error("Task '{task}' got unexpected arguments: {}", .args.join(" "))]
    UnexpectedArguments { task: String, args: Vec<String> },

    #[error("Task '{0}' is already running (circular dependency)")]
    CircularDependency(String),

    #[error("Interpolation failed in task '{task}': {error}")]
    Interpolation {
        task: String,
        error: InterpolationError,
    },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Variable '{0}' is not defined")]
    UndefinedVariable(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;
