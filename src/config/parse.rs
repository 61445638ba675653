//! Task file discovery and parsing

use crate::config::builtin::{builtin_config, merge_config};
use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, Result};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Task file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["chore.yml", "chore.yaml"];

/// Find the task file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the task file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a task file from a path
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_config(&contents)
}

/// Parse a task file from a string
pub fn parse_config(yaml: &str) -> Result<Config> {
    // An empty file is a valid (empty) task file
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Load the effective configuration: built-in tasks overlaid with a task file.
///
/// With an explicit path the file must exist. Otherwise the task file is
/// discovered upward from the current directory, and its absence leaves only
/// the built-in tasks.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let builtin = builtin_config()?;

    let config_path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => match find_config_file() {
            Ok(path) => Some(path),
            Err(ConfigError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
    };

    match config_path {
        Some(path) => {
            let overlay = parse_config_file(&path)?;
            Ok((merge_config(builtin, overlay), Some(path)))
        }
        None => Ok((builtin, None)),
    }
}

/// Read `.env` next to the task file, if the task file asks for it.
///
/// A missing `.env` is not an error.
pub fn load_dotenv(
    config: &Config,
    config_path: Option<&Path>,
) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if !config.dotenv {
        return Ok(vars);
    }

    let base_dir = config_path
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let env_path = base_dir.join(".env");
    if !env_path.is_file() {
        return Ok(vars);
    }

    let entries = dotenvy::from_path_iter(&env_path).map_err(|e| ConfigError::Read {
        path: env_path.clone(),
        error: e.to_string(),
    })?;
    for entry in entries {
        let (key, value) = entry.map_err(|e| ConfigError::Read {
            path: env_path.clone(),
            error: e.to_string(),
        })?;
        vars.insert(key, value);
    }

    Ok(vars)
}
