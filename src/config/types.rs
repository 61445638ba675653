//! Task file types
//!
//! This module defines the data structures that represent a chore.yml task file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level task file structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Application name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Interpreter used to run command lines (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Command whose output lists installed toolchain extensions
    #[serde(
        rename = "list-command",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub list_command: Option<String>,

    /// Load a .env file next to the task file
    #[serde(default)]
    pub dotenv: bool,

    /// Variables substituted into command lines
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub vars: HashMap<String, String>,

    /// Tasks defined in the task file
    #[serde(default)]
    pub tasks: HashMap<String, Task>,
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Task {
    /// Usage description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Longer description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this task is private (hidden from help)
    #[serde(default)]
    pub private: bool,

    /// Prerequisite tasks, run depth-first before this task's own steps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<Dep>,

    /// Positional arguments, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,

    /// Named options (flags) for the task
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, TaskOption>,

    /// Steps to execute
    #[serde(default, deserialize_with = "deserialize_run_items")]
    pub run: Vec<Run>,
}

/// A reference to a prerequisite task
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Dep {
    /// Task name without arguments
    Simple(String),

    /// Task name with arguments
    Complex(DepDetail),
}

/// Detailed prerequisite specification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DepDetail {
    /// Name of the task to run
    pub name: String,

    /// Positional arguments passed to the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Dep {
    /// Name of the referenced task
    pub fn name(&self) -> &str {
        match self {
            Dep::Simple(name) => name,
            Dep::Complex(detail) => &detail.name,
        }
    }

    /// Arguments passed to the referenced task
    pub fn args(&self) -> &[String] {
        match self {
            Dep::Simple(_) => &[],
            Dep::Complex(detail) => &detail.args,
        }
    }
}

/// A run step - a command line or a required-tool check
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Run {
    /// Simple string command
    SimpleCommand(String),

    /// Check that a toolchain extension is installed
    Require(RequireItem),

    /// Command with additional options
    Command(CommandDetail),
}

/// A required-tool check
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RequireItem {
    /// Tool name looked up in the toolchain listing
    pub require: String,
}

/// Detailed command specification
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommandDetail {
    /// The command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to suppress the echo line
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// An option (flag) definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TaskOption {
    /// Usage description for help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Short flag (single character)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,

    /// Option type (string or bool)
    #[serde(rename = "type", default = "default_option_type")]
    pub option_type: String,

    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Required option
    #[serde(default)]
    pub required: bool,

    /// Value substituted instead of the raw option value when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<String>,

    /// Environment variable to read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Private option (hidden from help)
    #[serde(default)]
    pub private: bool,
}

impl Default for TaskOption {
    fn default() -> Self {
        TaskOption {
            usage: None,
            short: None,
            option_type: default_option_type(),
            default: None,
            required: false,
            rewrite: None,
            environment: None,
            private: false,
        }
    }
}

fn default_option_type() -> String {
    "string".to_string()
}

/// A positional argument definition
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Arg {
    /// Argument name, used as the variable name
    pub name: String,

    /// Usage description for help text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Required argument
    #[serde(default)]
    pub required: bool,

    /// Collects all remaining extra arguments
    #[serde(default)]
    pub variadic: bool,
}

/// Custom deserializer for run steps that handles both single values and arrays
fn deserialize_run_items<'de, D>(deserializer: D) -> Result<Vec<Run>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Single string command
        Value::String(s) => Ok(vec![Run::SimpleCommand(s)]),
        // Single mapping
        Value::Mapping(_) => {
            let run = Run::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![run])
        }
        // Array of run steps
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| Run::deserialize(item).map_err(D::Error::custom))
            .collect(),
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("run must be a string, object, or array")),
    }
}
