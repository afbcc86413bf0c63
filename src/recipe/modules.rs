// src/recipe/modules.rs

//! External module resolver
//!
//! Folds repeatable `--with-module=<path>` invocation flags into configure
//! arguments of the form `--add-module=<absolute path>`, in the order the
//! flags were given.

use crate::error::{Error, Result};
use crate::recipe::args::ArgumentList;
use crate::recipe::format::ModuleSection;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolve module flags relative to the current directory
pub fn resolve_modules(raw_args: &[String], modules: &ModuleSection) -> Result<ArgumentList> {
    let cwd = std::env::current_dir()?;
    resolve_modules_from(raw_args, modules, &cwd)
}

/// Resolve module flags, expanding relative paths against `base`
///
/// Each occurrence is split on `=`; anything other than a flag and one
/// non-empty path is `MalformedOption`. The path must name an existing
/// directory or the whole resolution fails with `ModuleNotFound`.
pub fn resolve_modules_from(
    raw_args: &[String],
    modules: &ModuleSection,
    base: &Path,
) -> Result<ArgumentList> {
    let prefix = format!("{}=", modules.flag);
    let mut acc = ArgumentList::new();

    for arg in raw_args.iter().filter(|a| a.starts_with(&prefix)) {
        let dir = module_dir(arg, base)?;
        if !dir.is_dir() {
            return Err(Error::ModuleNotFound(dir));
        }
        debug!("External module: {}", dir.display());
        acc.push(format!("{}={}", modules.argument, dir.display()));
    }

    Ok(acc)
}

fn module_dir(arg: &str, base: &Path) -> Result<PathBuf> {
    let mut parts: Vec<&str> = arg.split('=').collect();
    while parts.len() > 1 && parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }

    match parts.as_slice() {
        [_, path] => Ok(expand_path(path, base)),
        _ => Err(Error::MalformedOption(arg.to_string())),
    }
}

/// Expand `~` and make a path absolute, folding `.` and `..` lexically
fn expand_path(raw: &str, base: &Path) -> PathBuf {
    let expanded = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(raw),
        },
        _ => PathBuf::from(raw),
    };

    let joined = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
