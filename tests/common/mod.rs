//! Common test utilities

#![allow(dead_code)]

use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory with a chore.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("chore.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// A stand-in for the cargo toolchain living in a scratch directory.
///
/// `cargo` and `cross` append their command line to `log` and exit 0, unless
/// the command line equals `$FAKE_TOOL_FAIL`, in which case they exit 1.
/// `cargo --list` lists the given extensions.
pub struct FakeToolchain {
    pub dir: TempDir,
    pub bin: PathBuf,
    pub log: PathBuf,
}

impl FakeToolchain {
    pub fn new(installed: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("bin");
        let log = dir.path().join("calls.log");
        fs::create_dir(&bin).unwrap();

        let listing: String = installed
            .iter()
            .map(|tool| format!("printf '    %s\\n' '{}'\n", tool))
            .collect();

        write_script(
            &bin.join("cargo"),
            &format!(
                r#"#!/bin/sh
echo "cargo $*" >> '{log}'
if [ "$1" = "--list" ]; then
  printf 'Installed Commands:\n'
  printf '    build                Compile a local package\n'
  printf '    fmt\n'
{listing}fi
if [ -n "$FAKE_TOOL_FAIL" ] && [ "cargo $*" = "$FAKE_TOOL_FAIL" ]; then
  exit 1
fi
exit 0
"#,
                log = log.display(),
                listing = listing
            ),
        );

        write_script(
            &bin.join("cross"),
            &format!(
                r#"#!/bin/sh
echo "cross $*" >> '{log}'
if [ -n "$FAKE_TOOL_FAIL" ] && [ "cross $*" = "$FAKE_TOOL_FAIL" ]; then
  exit 1
fi
exit 0
"#,
                log = log.display()
            ),
        );

        FakeToolchain { dir, bin, log }
    }

    /// PATH with the fake tools first
    pub fn path_var(&self) -> String {
        format!(
            "{}:{}",
            self.bin.display(),
            env::var("PATH").unwrap_or_default()
        )
    }

    /// Command lines the fake tools saw, in order
    pub fn calls(&self) -> Vec<String> {
        match fs::read_to_string(&self.log) {
            Ok(contents) => contents
                .lines()
                .map(|line| line.trim_end().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

fn write_script(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}
