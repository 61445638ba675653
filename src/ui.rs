//! Terminal output helpers
//!
//! Everything chore itself prints goes to standard error so command output on
//! standard out stays clean.

use colored::Colorize;

/// Echo a command line before it runs
pub fn print_run(line: &str) {
    eprintln!("{} {}", "[RUN]".cyan().bold(), line);
}

/// Echo a command line that dry-run mode skipped
pub fn print_dry_run(line: &str) {
    eprintln!("{} {}", "[DRY-RUN]".yellow().bold(), line);
}

pub fn print_debug(message: &str) {
    eprintln!("{} {}", "[DEBUG]".dimmed(), message);
}

/// Print the final error that aborted the invocation
pub fn print_fatal(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}

/// Format task names and usage lines as an aligned listing
pub fn format_task_list(tasks: &[(String, Option<String>)]) -> String {
    let width = tasks.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let mut out = String::from("Available tasks:\n");
    for (name, usage) in tasks {
        match usage {
            Some(usage) => out.push_str(&format!(
                "    {:<width$}  {}\n",
                name.bold(),
                usage.dimmed(),
                width = width
            )),
            None => out.push_str(&format!("    {}\n", name.bold())),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_task_list() {
        colored::control::set_override(false);
        let listing = format_task_list(&[
            ("cross".to_string(), Some("Cross-compile".to_string())),
            ("ensure_installed".to_string(), None),
            ("fmt".to_string(), Some("Format code".to_string())),
        ]);
        assert_eq!(
            listing,
            "Available tasks:\n    cross             Cross-compile\n    ensure_installed\n    fmt               Format code\n"
        );
    }
}
