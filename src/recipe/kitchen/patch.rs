// src/recipe/kitchen/patch.rs

//! Applying recipe patches to the source tree

use super::runner::Runner;
use crate::error::{Error, Result};
use crate::recipe::format::PatchInfo;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

/// Apply every patch in order with `patch -p<strip>`
///
/// File patches are resolved against `recipe_dir`; inline patches are
/// written to a temporary file first. A patch that already applies in
/// reverse is skipped, so rerunning on the same source tree succeeds.
/// Returns the number applied by this call.
pub fn apply_patches(
    patches: &[PatchInfo],
    recipe_dir: Option<&Path>,
    source_dir: &Path,
    runner: &dyn Runner,
) -> Result<usize> {
    let mut applied = 0;
    for (index, patch) in patches.iter().enumerate() {
        match (&patch.file, &patch.content) {
            (Some(file), _) => {
                let path = patch_path(file, recipe_dir);
                if !path.is_file() {
                    return Err(Error::IoError(format!(
                        "Patch file not found: {}",
                        path.display()
                    )));
                }
                if apply_patch(source_dir, &path, patch.strip, runner)? {
                    info!("Applied patch: {}", file);
                    applied += 1;
                } else {
                    info!("Patch already applied, skipping: {}", file);
                }
            }
            (None, Some(content)) => {
                let mut temp = NamedTempFile::new()?;
                temp.write_all(content.as_bytes())?;
                temp.flush()?;
                if apply_patch(source_dir, temp.path(), patch.strip, runner)? {
                    info!("Applied inline patch #{}", index + 1);
                    applied += 1;
                } else {
                    info!("Inline patch #{} already applied, skipping", index + 1);
                }
            }
            (None, None) => {
                return Err(Error::ParseError(format!(
                    "Patch #{} has neither file nor content",
                    index + 1
                )));
            }
        }
    }

    Ok(applied)
}

fn patch_path(file: &str, recipe_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(file);
    match recipe_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// Apply a patch to the source directory unless it is already applied
///
/// Returns false when the patch was skipped. Neither invocation prompts.
fn apply_patch(
    source_dir: &Path,
    patch_path: &Path,
    strip: u32,
    runner: &dyn Runner,
) -> Result<bool> {
    let patch_args = [
        "-p".to_string(),
        strip.to_string(),
        "-i".to_string(),
        patch_path.to_string_lossy().into_owned(),
    ];

    let reverse_check: Vec<String> = ["-R", "--dry-run", "--force", "--silent"]
        .into_iter()
        .map(String::from)
        .chain(patch_args.iter().cloned())
        .collect();
    if runner.succeeds("patch", &reverse_check, source_dir) {
        return Ok(false);
    }

    let forward: Vec<String> = ["--forward", "--batch"]
        .into_iter()
        .map(String::from)
        .chain(patch_args.iter().cloned())
        .collect();
    runner.run("patch", &forward, source_dir)?;
    Ok(true)
}
