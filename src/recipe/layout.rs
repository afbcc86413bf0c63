// src/recipe/layout.rs

//! Installation layout derived from the root prefix
//!
//! All paths are computed once, up front, from the root prefix plus the
//! package name and version. Nothing else feeds into them, so two layouts
//! built from the same inputs are identical.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Absolute installation paths for one cook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    /// Package name
    pub name: String,
    /// Version being installed (`HEAD` for head builds)
    pub version: String,
    /// Root prefix shared by every package (e.g. `/usr/local`)
    pub root: PathBuf,
    /// Directory holding every installed version of every package
    pub cellar: PathBuf,
    /// Per-version install prefix: `<cellar>/<name>/<version>`
    pub prefix: PathBuf,
    pub bin: PathBuf,
    pub sbin: PathBuf,
    pub share: PathBuf,
    pub man: PathBuf,
    /// Shared configuration directory: `<root>/etc`
    pub etc: PathBuf,
    /// Shared variable-state directory: `<root>/var`
    pub var: PathBuf,
    pub include: PathBuf,
    pub lib: PathBuf,
    /// Version-independent link to the current install: `<root>/opt/<name>`
    pub opt_prefix: PathBuf,
}

impl InstallLayout {
    /// Compute the layout for `name` at `version` under `root`
    ///
    /// A relative root is resolved against the current directory so the
    /// resulting paths are always absolute.
    pub fn new(root: &Path, name: &str, version: &str) -> Result<Self> {
        if !is_single_component(name) {
            return Err(Error::InvalidPath(format!("invalid package name: {:?}", name)));
        }
        if !is_single_component(version) {
            return Err(Error::InvalidPath(format!("invalid version: {:?}", version)));
        }

        let root = std::path::absolute(root).map_err(|e| {
            Error::InvalidPath(format!("cannot resolve root {}: {}", root.display(), e))
        })?;

        let cellar = root.join("Cellar");
        let prefix = cellar.join(name).join(version);
        let share = prefix.join("share");

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            cellar,
            bin: prefix.join("bin"),
            sbin: prefix.join("sbin"),
            man: share.join("man"),
            share,
            etc: root.join("etc"),
            var: root.join("var"),
            include: root.join("include"),
            lib: root.join("lib"),
            opt_prefix: root.join("opt").join(name),
            prefix,
            root,
        })
    }

    /// Man page directory for a section (`man8` for section 8)
    pub fn man_section(&self, section: &str) -> PathBuf {
        self.man.join(format!("man{}", section))
    }

    /// Directory holding every installed version of this package
    pub fn package_cellar(&self) -> PathBuf {
        self.cellar.join(&self.name)
    }

    /// Variables available to `%(name)s` substitution in recipes
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        let path = |p: &PathBuf| p.to_string_lossy().into_owned();
        vec![
            ("name", self.name.clone()),
            ("version", self.version.clone()),
            ("root", path(&self.root)),
            ("cellar", path(&self.cellar)),
            ("prefix", path(&self.prefix)),
            ("bin", path(&self.bin)),
            ("sbin", path(&self.sbin)),
            ("share", path(&self.share)),
            ("man", path(&self.man)),
            ("etc", path(&self.etc)),
            ("var", path(&self.var)),
            ("include", path(&self.include)),
            ("lib", path(&self.lib)),
            ("opt_prefix", path(&self.opt_prefix)),
        ]
    }
}

/// Exactly one normal path component: no separators, not `.` or `..`
fn is_single_component(part: &str) -> bool {
    !part.is_empty() && !part.contains('/') && part != "." && part != ".."
}
