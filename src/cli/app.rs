//! Main CLI application

use crate::cli::completion::print_completions;
use crate::config::{load_config, load_dotenv, validate_config, Config};
use crate::error::Result;
use crate::runner::{context_for, Dispatcher, OptionType, Task, Verbosity};
use crate::ui;
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// CLI application
pub struct App {
    /// The clap command
    command: Command,
    /// Effective configuration (built-ins plus task file)
    config: Config,
    /// Task file path, if one was found
    config_path: Option<PathBuf>,
    /// Dispatcher over the configured tasks
    dispatcher: Dispatcher,
}

impl App {
    /// Create a new app, discovering the task file from the current directory
    pub fn new() -> Result<Self> {
        Self::load(None)
    }

    /// Create app with a specific task file
    pub fn with_config_file(path: PathBuf) -> Result<Self> {
        Self::load(Some(path))
    }

    fn load(path: Option<PathBuf>) -> Result<Self> {
        let (config, config_path) = load_config(path.as_deref())?;
        validate_config(&config)?;

        let dispatcher = Dispatcher::new(&config);
        let command = build_command(&config, &dispatcher);

        Ok(App {
            command,
            config,
            config_path,
            dispatcher,
        })
    }

    /// Run the application with command line arguments
    pub fn run<I, T>(mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().get_matches_from(args);

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            print_completions(*shell, &mut self.command);
            return Ok(());
        }

        if matches.get_flag("list") {
            print!("{}", ui::format_task_list(&self.public_tasks()));
            return Ok(());
        }

        let verbosity = get_verbosity(&matches);

        let (task_name, task_matches) = match matches.subcommand() {
            Some((name, sub_matches)) => (name.to_string(), sub_matches),
            None => {
                self.command.print_help()?;
                println!();
                return Ok(());
            }
        };

        // Tasks without a subcommand of their own (unknown or private) arrive
        // as external subcommands with raw trailing arguments
        let (extra_args, options) = match self.dispatcher.task(&task_name) {
            Some(task) if !task.private => (
                parse_task_args(task, task_matches),
                parse_task_options(task, task_matches),
            ),
            _ => (external_args(task_matches), HashMap::new()),
        };

        let env = load_dotenv(&self.config, self.config_path.as_deref())?;
        let mut ctx = context_for(&self.config, env)
            .with_verbosity(verbosity)
            .with_dry_run(matches.get_flag("dry-run"));

        self.dispatcher
            .run_with_options(&task_name, &extra_args, &options, &mut ctx)?;

        Ok(())
    }

    /// Names and usage lines of public tasks, sorted by name
    fn public_tasks(&self) -> Vec<(String, Option<String>)> {
        self.dispatcher
            .tasks()
            .into_iter()
            .filter(|task| !task.private)
            .map(|task| (task.name.clone(), task.usage.clone()))
            .collect()
    }
}

/// Build the clap command from configuration
fn build_command(config: &Config, dispatcher: &Dispatcher) -> Command {
    let mut cmd = Command::new(config.name.clone().unwrap_or_else(|| "chore".to_string()))
        .version(crate::VERSION)
        .about(
            config
                .usage
                .clone()
                .unwrap_or_else(|| "A task dispatcher for Rust workspace chores".to_string()),
        )
        .allow_external_subcommands(true)
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to chore.yml task file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print commands instead of running them")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available tasks")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script")
                .value_parser(clap::value_parser!(Shell)),
        );

    // Add subcommands for each task
    for task in dispatcher.tasks() {
        if task.private {
            continue;
        }
        cmd = cmd.subcommand(task_command(task));
    }

    cmd
}

/// Build the subcommand for one task
fn task_command(task: &Task) -> Command {
    let mut task_cmd = Command::new(task.name.clone()).about(task.usage.clone().unwrap_or_default());

    if let Some(desc) = &task.description {
        task_cmd = task_cmd.long_about(desc.clone());
    }

    for arg in &task.args {
        let mut arg_def = Arg::new(arg.name.clone())
            .value_name(arg.name.to_uppercase())
            .help(arg.usage.clone().unwrap_or_default());

        if arg.variadic {
            arg_def = arg_def
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true);
        }
        if arg.required && arg.default.is_none() {
            arg_def = arg_def.required(true);
        }
        if let Some(default) = &arg.default {
            arg_def = arg_def.default_value(default.clone());
        }

        task_cmd = task_cmd.arg(arg_def);
    }

    for opt in &task.options {
        if opt.private {
            continue;
        }

        let mut opt_def = Arg::new(opt.name.clone()).long(opt.name.clone()).help(
            opt.usage
                .clone()
                .unwrap_or_else(|| format!("Option: {}", opt.name)),
        );

        if let Some(short) = opt.short {
            opt_def = opt_def.short(short);
        }

        opt_def = match opt.option_type {
            OptionType::Bool => opt_def.action(ArgAction::SetTrue),
            OptionType::String => opt_def.value_name(opt.name.to_uppercase()),
        };

        task_cmd = task_cmd.arg(opt_def);
    }

    task_cmd
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Collect positional arguments in declaration order
fn parse_task_args(task: &Task, matches: &ArgMatches) -> Vec<String> {
    let mut extra = Vec::new();

    for arg in &task.args {
        if arg.variadic {
            if let Some(values) = matches.get_many::<String>(&arg.name) {
                extra.extend(values.cloned());
            }
        } else if let Some(value) = matches.get_one::<String>(&arg.name) {
            extra.push(value.clone());
        } else {
            // Later positionals cannot be set once one is missing
            break;
        }
    }

    extra
}

/// Collect the options given on the command line
fn parse_task_options(task: &Task, matches: &ArgMatches) -> HashMap<String, String> {
    let mut options = HashMap::new();

    for opt in &task.options {
        if opt.private {
            continue;
        }
        match opt.option_type {
            OptionType::Bool => {
                if matches.get_flag(&opt.name) {
                    options.insert(opt.name.clone(), "true".to_string());
                }
            }
            OptionType::String => {
                if let Some(value) = matches.get_one::<String>(&opt.name) {
                    options.insert(opt.name.clone(), value.clone());
                }
            }
        }
    }

    options
}

/// Raw trailing arguments of an external subcommand
fn external_args(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<OsString>("")
        .map(|values| {
            values
                .map(|value| value.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default()
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<()> {
    run_from(std::env::args().collect())
}

/// Run the CLI application with the given arguments
pub fn run_from(args: Vec<String>) -> Result<()> {
    // The task file decides which subcommands exist, so find it before clap parses
    let app = match extract_file_arg(&args) {
        Some(path) => App::with_config_file(path)?,
        None => App::new()?,
    };

    app.run(args)
}

/// Extract --file argument before clap parsing.
///
/// Only the global flags ahead of the task name are scanned; anything after
/// the task name or `--` belongs to the task.
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--file" || arg == "-f" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--file=") {
            return Some(PathBuf::from(path));
        }
        if arg == "--completions" {
            iter.next();
            continue;
        }
        if arg == "--" || !arg.starts_with('-') {
            break;
        }
    }
    None
}
