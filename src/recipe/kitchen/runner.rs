// src/recipe/kitchen/runner.rs

//! Process runner for build steps
//!
//! Steps run synchronously with the operator's terminal attached. Any
//! unsuccessful exit is fatal for the cook; there is no retry and no
//! timeout.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Executes one external build step
pub trait Runner {
    /// Run `program` with `args` in `cwd`, blocking until it exits
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<()>;

    /// Run a query step (such as a dry run) and report whether it succeeded
    ///
    /// Query steps never read from the terminal and their output is not
    /// shown.
    fn succeeds(&self, program: &str, args: &[String], cwd: &Path) -> bool {
        self.run(program, args, cwd).is_ok()
    }
}

/// Runs build steps as real child processes with inherited stdio
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Parallel jobs exported as `MAKEFLAGS=-j<jobs>`
    pub jobs: Option<u32>,
}

impl SystemRunner {
    pub fn new(jobs: Option<u32>) -> Self {
        Self { jobs }
    }
}

impl Runner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<()> {
        let program_path = resolve_program(program, cwd);
        info!("Running {} {}", program, args.join(" "));
        debug!("Working directory: {}", cwd.display());

        let mut command = Command::new(&program_path);
        command.args(args).current_dir(cwd);
        if let Some(jobs) = self.jobs {
            command.env("MAKEFLAGS", format!("-j{}", jobs));
        }

        let status = command.status().map_err(|e| Error::ProcessError {
            program: program.to_string(),
            reason: format!("failed to start: {}", e),
        })?;

        if status.success() {
            return Ok(());
        }

        let reason = match status.code() {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        Err(Error::ProcessError {
            program: program.to_string(),
            reason,
        })
    }

    fn succeeds(&self, program: &str, args: &[String], cwd: &Path) -> bool {
        debug!("Checking {} {}", program, args.join(" "));
        Command::new(resolve_program(program, cwd))
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .is_ok_and(|output| output.status.success())
    }
}

/// Relative programs with a path separator (`./configure`) are taken from
/// the working directory, not looked up on PATH
fn resolve_program(program: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        cwd.join(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_program() {
        let cwd = Path::new("/src/nginx");
        assert_eq!(
            resolve_program("./configure", cwd),
            PathBuf::from("/src/nginx/./configure")
        );
        assert_eq!(
            resolve_program("auto/configure", cwd),
            PathBuf::from("/src/nginx/auto/configure")
        );
        assert_eq!(resolve_program("make", cwd), PathBuf::from("make"));
        assert_eq!(resolve_program("/usr/bin/make", cwd), PathBuf::from("/usr/bin/make"));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_and_failure() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(Some(2));

        runner
            .run("sh", &["-c".to_string(), "exit 0".to_string()], temp.path())
            .unwrap();

        let err = runner
            .run("sh", &["-c".to_string(), "exit 2".to_string()], temp.path())
            .unwrap_err();
        match err {
            Error::ProcessError { program, reason } => {
                assert_eq!(program, "sh");
                assert_eq!(reason, "exited with status 2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_cwd_with_makeflags() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(Some(3));

        runner
            .run(
                "sh",
                &["-c".to_string(), "echo \"$MAKEFLAGS\" > flags.txt".to_string()],
                temp.path(),
            )
            .unwrap();

        let flags = std::fs::read_to_string(temp.path().join("flags.txt")).unwrap();
        assert_eq!(flags.trim(), "-j3");
    }

    #[cfg(unix)]
    #[test]
    fn test_succeeds_does_not_read_stdin() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::default();

        // `read` fails at end of input instead of waiting on the terminal
        let read = ["-c".to_string(), "read line".to_string()];
        let exit = ["-c".to_string(), "exit 0".to_string()];
        assert!(!runner.succeeds("sh", &read, temp.path()));
        assert!(runner.succeeds("sh", &exit, temp.path()));
        assert!(!runner.succeeds("./no-such-tool", &[], temp.path()));
    }

    #[test]
    fn test_missing_program() {
        let temp = TempDir::new().unwrap();
        let err = SystemRunner::default()
            .run("./no-such-configure", &[], temp.path())
            .unwrap_err();
        assert!(matches!(err, Error::ProcessError { .. }));
    }
}
