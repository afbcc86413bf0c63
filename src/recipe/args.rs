// src/recipe/args.rs

//! Argument builder: turns a recipe, a layout and the enabled options into
//! the exact configure argument list
//!
//! The base sequence comes from the recipe verbatim and in order. External
//! modules are merged with set-union semantics, then option flags are
//! appended in declaration order. Entries are never reordered afterwards,
//! because configure scripts can be order-sensitive.

use crate::error::{Error, Result};
use crate::recipe::format::{BuildOption, ModuleProbe, Recipe, Variant};
use crate::recipe::layout::InstallLayout;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Ordered configure arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArgumentList(Vec<String>);

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument
    pub fn push(&mut self, arg: impl Into<String>) {
        self.0.push(arg.into());
    }

    /// Append every argument not already present (order-preserving union)
    pub fn merge(&mut self, other: &ArgumentList) {
        for arg in &other.0 {
            if !self.contains(arg) {
                self.0.push(arg.clone());
            }
        }
    }

    pub fn contains(&self, arg: &str) -> bool {
        self.0.iter().any(|a| a == arg)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for ArgumentList {
    fn from(args: Vec<String>) -> Self {
        Self(args)
    }
}

impl<'a> IntoIterator for &'a ArgumentList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Locates the root directory of an add-on module shipped by a helper tool
///
/// Injected into [`build_arguments`] so tests can substitute canned
/// answers for real process execution.
pub trait RootResolver {
    fn resolve_root(&self, probe: &ModuleProbe) -> Result<PathBuf>;
}

impl<F> RootResolver for F
where
    F: Fn(&ModuleProbe) -> Result<PathBuf>,
{
    fn resolve_root(&self, probe: &ModuleProbe) -> Result<PathBuf> {
        self(probe)
    }
}

/// Runs the probe command and reads the root from its stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandResolver;

impl RootResolver for CommandResolver {
    fn resolve_root(&self, probe: &ModuleProbe) -> Result<PathBuf> {
        let (program, args) = probe
            .command
            .split_first()
            .ok_or_else(|| Error::ParseError("Empty probe command".to_string()))?;

        let program_path = which::which(program).map_err(|e| Error::ProcessError {
            program: program.clone(),
            reason: e.to_string(),
        })?;

        debug!("Probing {} {}", program_path.display(), args.join(" "));
        let output = Command::new(&program_path)
            .args(args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Error::ProcessError {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::ProcessError {
                program: program.clone(),
                reason: format!("exited with {}", output.status),
            });
        }

        let root = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        Ok(PathBuf::from(root))
    }
}

/// Build the full configure argument list
///
/// Fails fast with `DependencyUnavailable` when a probe-backed option is
/// enabled and its helper is missing or reports a non-directory root; no
/// partial list is returned in that case.
pub fn build_arguments(
    recipe: &Recipe,
    layout: &InstallLayout,
    enabled: &BTreeSet<String>,
    variant: Variant,
    external_modules: &ArgumentList,
    resolver: &dyn RootResolver,
) -> Result<ArgumentList> {
    let mut args: ArgumentList = recipe
        .build
        .configure_args
        .iter()
        .map(|template| recipe.substitute(template, layout))
        .collect::<Vec<_>>()
        .into();

    args.merge(external_modules);

    for option in &recipe.options {
        if !enabled.contains(&option.name) || !option.applies_to(variant) {
            continue;
        }

        if let Some(probe) = &option.probe {
            let module = probe_module(recipe, option, probe, resolver)?;
            args.push(module);
        } else if let Some(flag) = &option.flag {
            args.push(flag.clone());
        }
    }

    info!(
        "Configure arguments for {} ({}): {} entries",
        recipe.package.name,
        variant,
        args.len()
    );
    Ok(args)
}

fn probe_module(
    recipe: &Recipe,
    option: &BuildOption,
    probe: &ModuleProbe,
    resolver: &dyn RootResolver,
) -> Result<String> {
    let unavailable = || Error::DependencyUnavailable {
        option: option.name.clone(),
        hint: probe.hint.clone().unwrap_or_else(|| {
            format!(
                "{} must be installed and on your PATH in order to continue.",
                probe.command.first().map(String::as_str).unwrap_or("the helper")
            )
        }),
    };

    let root = resolver.resolve_root(probe).map_err(|e| {
        debug!("Probe for {} failed: {}", option.name, e);
        unavailable()
    })?;

    if !root.is_dir() {
        debug!("Probe for {} returned non-directory {}", option.name, root.display());
        return Err(unavailable());
    }

    let module_dir = match &probe.subdir {
        Some(subdir) => root.join(subdir),
        None => root,
    };
    Ok(format!("{}={}", recipe.modules.argument, module_dir.display()))
}
