// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use kettle::recipe::{ModuleProbe, Runner};
use kettle::{Error, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One recorded process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Runner that records invocations instead of executing them
///
/// A program listed in `fail` exits with the paired status.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: RefCell<Vec<Call>>,
    pub fail: Vec<(String, i32)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(program: &str, status: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail: vec![(program.to_string(), status)],
        }
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.program.clone()).collect()
    }

    pub fn call(&self, program: &str) -> Option<Call> {
        self.calls
            .borrow()
            .iter()
            .find(|c| c.program == program)
            .cloned()
    }
}

impl Runner for RecordingRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<()> {
        self.calls.borrow_mut().push(Call {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });

        match self.fail.iter().find(|(p, _)| p == program) {
            Some((_, status)) => Err(Error::ProcessError {
                program: program.to_string(),
                reason: format!("exited with status {}", status),
            }),
            None => Ok(()),
        }
    }

    /// Dry runs never match: the fake source tree starts unpatched
    fn succeeds(&self, _program: &str, _args: &[String], _cwd: &Path) -> bool {
        false
    }
}

/// Resolver that always answers with `root`
pub fn fixed_root(root: PathBuf) -> impl Fn(&ModuleProbe) -> Result<PathBuf> {
    move |_probe: &ModuleProbe| Ok(root.clone())
}

/// Resolver that behaves as if the helper tool is not installed
pub fn missing_tool(probe: &ModuleProbe) -> Result<PathBuf> {
    Err(Error::ProcessError {
        program: probe.command.first().cloned().unwrap_or_default(),
        reason: "not found".to_string(),
    })
}

/// Scratch install root plus an unpacked nginx-like source tree
pub struct Workspace {
    pub temp: TempDir,
    pub root: PathBuf,
    pub source: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        let source = temp.path().join("nginx-src");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(source.join("objs")).unwrap();
        fs::write(source.join("objs/nginx.8"), ".TH NGINX 8\n").unwrap();
        Self { temp, root, source }
    }

    /// Simulate what `make install` leaves in the prefix
    pub fn stage_install(&self, prefix: &Path) {
        fs::create_dir_all(prefix.join("bin")).unwrap();
        fs::write(prefix.join("bin/nginx"), "#!/bin/sh\n").unwrap();
        fs::create_dir_all(prefix.join("html")).unwrap();
        fs::write(prefix.join("html/index.html"), "<h1>Welcome to nginx!</h1>\n").unwrap();
    }

    pub fn module_dir(&self, name: &str) -> PathBuf {
        let dir = self.temp.path().join("modules").join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
