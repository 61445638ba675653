//! Variable interpolation for strings
//!
//! Replaces `${var}` references with variable values. Substitution is purely
//! textual and happens before a command line reaches the shell.

use crate::error::{InterpolationError, InterpolationResult};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

fn var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_\-]*)\}").expect("valid regex"))
}

/// Interpolate variables in a string
///
/// Supports:
/// - `${var}` - variable from `vars`
/// - Environment variables (when not found in `vars`)
///
/// Substitution is a single pass: values are inserted verbatim and never
/// expanded again. Unknown variables are left untouched so the shell can
/// still see them.
pub fn interpolate(s: &str, vars: &HashMap<String, String>) -> InterpolationResult<String> {
    Ok(substitute(s, vars, &mut None))
}

/// Interpolate with strict mode - errors on undefined variables
pub fn interpolate_strict(
    s: &str,
    vars: &HashMap<String, String>,
) -> InterpolationResult<String> {
    let mut undefined = None;
    let result = substitute(s, vars, &mut undefined);

    match undefined {
        Some(name) => Err(InterpolationError::UndefinedVariable(name)),
        None => Ok(result),
    }
}

/// Replace every known `${var}`, recording the first unknown name
fn substitute(s: &str, vars: &HashMap<String, String>, undefined: &mut Option<String>) -> String {
    var_pattern()
        .replace_all(s, |caps: &Captures| match lookup(&caps[1], vars) {
            Some(value) => value,
            None => {
                undefined.get_or_insert_with(|| caps[1].to_string());
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Interpolate a list of strings
pub fn interpolate_list(
    list: &[String],
    vars: &HashMap<String, String>,
) -> InterpolationResult<Vec<String>> {
    list.iter().map(|s| interpolate(s, vars)).collect()
}

fn lookup(name: &str, vars: &HashMap<String, String>) -> Option<String> {
    vars.get(name).cloned().or_else(|| env::var(name).ok())
}
