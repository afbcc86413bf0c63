// src/recipe/kitchen/finalize.rs

//! Post-install filesystem adjustments
//!
//! Every step can be rerun safely: repeating an install converges on the
//! same tree. A failing step aborts finalization without rolling back
//! earlier ones; rerunning repairs the partial state.

use crate::error::{Error, Result};
use crate::recipe::format::{LegacyLinkSection, Recipe};
use crate::recipe::layout::InstallLayout;
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs as unix_fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// What finalization touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizeSummary {
    /// Installed man pages
    pub man_pages: Vec<PathBuf>,
    /// Runtime directories ensured
    pub runtime_dirs: Vec<PathBuf>,
    /// Shared content location the docroot now links to
    pub docroot: Option<PathBuf>,
    /// Legacy compatibility link, when one was needed
    pub legacy_link: Option<PathBuf>,
}

/// Run every finalize step declared by the recipe
pub fn finalize(
    recipe: &Recipe,
    layout: &InstallLayout,
    source_dir: &Path,
) -> Result<FinalizeSummary> {
    let steps = &recipe.finalize;
    let mut summary = FinalizeSummary::default();

    for page in &steps.man_pages {
        summary
            .man_pages
            .push(install_man_page(&source_dir.join(page), layout)?);
    }

    for dir in &steps.runtime_dirs {
        let dir = PathBuf::from(recipe.substitute(dir, layout));
        ensure_dir(&dir)?;
        summary.runtime_dirs.push(dir);
    }

    if let Some(docroot) = &steps.docroot {
        let shared = PathBuf::from(recipe.substitute(&docroot.shared, layout));
        relocate_docroot(&layout.prefix.join(&docroot.path), &shared)?;
        summary.docroot = Some(shared);
    }

    if let Some(legacy) = &steps.legacy_link {
        summary.legacy_link = ensure_legacy_link(layout, legacy)?;
    }

    Ok(summary)
}

/// Copy a man page from the build tree into its section directory
///
/// The section comes from the file extension (`nginx.8` goes to `man8`).
pub fn install_man_page(page: &Path, layout: &InstallLayout) -> Result<PathBuf> {
    let (Some(name), Some(section)) = (page.file_name(), page.extension()) else {
        return Err(Error::InvalidPath(format!(
            "Man page has no section suffix: {}",
            page.display()
        )));
    };
    if !page.is_file() {
        return Err(Error::IoError(format!(
            "Man page not found in build output: {}",
            page.display()
        )));
    }

    let dest_dir = layout.man_section(&section.to_string_lossy());
    ensure_dir(&dest_dir)?;
    let dest = dest_dir.join(name);
    fs::copy(page, &dest).map_err(|e| io_error("install", &dest, e))?;
    debug!("Installed man page {}", dest.display());
    Ok(dest)
}

/// Move the product's content directory to a shared location and link it
///
/// The first install moves the bundled content into `shared`. Later
/// installs drop their bundled copy and keep whatever is already shared
/// (last install wins; nothing is merged). Either way `product` ends up
/// as a relative symlink to `shared`.
pub fn relocate_docroot(product: &Path, shared: &Path) -> Result<()> {
    if !shared.exists() {
        if let Some(parent) = shared.parent() {
            ensure_dir(parent)?;
        }
        if is_real_dir(product) {
            move_dir(product, shared)?;
            info!("Moved {} to {}", product.display(), shared.display());
        } else {
            ensure_dir(shared)?;
        }
    } else {
        remove_path(product)?;
        ensure_dir(shared)?;
    }

    let parent = product
        .parent()
        .ok_or_else(|| Error::InvalidPath(product.display().to_string()))?;
    replace_with_symlink(product, &relative_path(parent, shared))?;
    info!("Linked {} -> {}", product.display(), shared.display());
    Ok(())
}

/// Keep the old binary location working when a prior install used it
///
/// If any installed version of the package has the legacy directory,
/// `<prefix>/<dir>/<binary>` becomes a relative link to `<bin>/<binary>`.
pub fn ensure_legacy_link(
    layout: &InstallLayout,
    legacy: &LegacyLinkSection,
) -> Result<Option<PathBuf>> {
    if !any_version_has(&layout.package_cellar(), &legacy.dir)? {
        return Ok(None);
    }

    let dir = layout.prefix.join(&legacy.dir);
    ensure_dir(&dir)?;
    let link = dir.join(&legacy.binary);
    let target = relative_path(&dir, &layout.bin.join(&legacy.binary));
    replace_with_symlink(&link, &target)?;
    info!("Linked legacy {} -> {}", link.display(), target.display());
    Ok(Some(link))
}

fn any_version_has(package_cellar: &Path, dir: &str) -> Result<bool> {
    let entries = match fs::read_dir(package_cellar) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(io_error("read", package_cellar, e)),
    };

    for entry in entries {
        let entry = entry?;
        if entry.path().join(dir).is_dir() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create a directory and its parents if absent
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| io_error("create", path, e))
}

/// Point `link` at `target`, replacing whatever is there
///
/// An existing link with the same target is left untouched.
pub fn replace_with_symlink(link: &Path, target: &Path) -> Result<()> {
    if let Ok(meta) = fs::symlink_metadata(link) {
        if meta.file_type().is_symlink() && fs::read_link(link).ok().as_deref() == Some(target) {
            return Ok(());
        }
        remove_path(link)?;
    }
    if let Some(parent) = link.parent() {
        ensure_dir(parent)?;
    }
    unix_fs::symlink(target, link).map_err(|e| io_error("symlink", link, e))
}

/// Remove a file, link or directory tree; missing paths are fine
///
/// Links are removed themselves, never followed.
fn remove_path(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(io_error("inspect", path, e)),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| io_error("remove", path, e))
}

fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
}

/// Rename, falling back to copy-and-remove across filesystems
///
/// Any other rename failure is returned as is; nothing is copied.
fn move_dir(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!("{} is on another filesystem, copying", to.display());
            copy_tree(from, to)?;
            remove_path(from)
        }
        Err(e) => Err(io_error("move", from, e)),
    }
}

/// Copy a directory tree, recreating symlinks rather than following them
fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| Error::IoError(e.to_string()))?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| Error::IoError(e.to_string()))?;
        let dest = to.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            ensure_dir(&dest)?;
        } else if file_type.is_symlink() {
            let target =
                fs::read_link(entry.path()).map_err(|e| io_error("read link", entry.path(), e))?;
            unix_fs::symlink(target, &dest).map_err(|e| io_error("symlink", &dest, e))?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|e| io_error("copy", &dest, e))?;
        }
    }
    Ok(())
}

/// Path to `target` relative to the directory `from`
///
/// Both paths are absolute and compared lexically.
pub fn relative_path(from: &Path, target: &Path) -> PathBuf {
    let from: Vec<Component<'_>> = from.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> Error {
    Error::IoError(format!("Failed to {} {}: {}", action, path.display(), e))
}
