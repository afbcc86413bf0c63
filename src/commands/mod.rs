// src/commands/mod.rs
//! Command handlers for the Kettle CLI

mod inspect;
mod install;
mod service;
mod system;

pub use inspect::{cmd_args, cmd_options, cmd_validate};
pub use install::cmd_install;
pub use service::{cmd_caveats, cmd_service};
pub use system::cmd_completions;

use anyhow::{Context, Result};
use kettle::recipe::load_recipe;
use kettle::{InstallLayout, KettleConfig, LoadedRecipe, Variant};
use std::path::PathBuf;
use tracing::debug;

/// Load a recipe by path or name, searching the configured directories
pub(crate) fn open_recipe(spec: &str, config: &KettleConfig) -> Result<LoadedRecipe> {
    let loaded = load_recipe(spec, &config.recipes.dirs)
        .with_context(|| format!("Failed to load recipe '{}'", spec))?;
    debug!(
        "Loaded recipe {} from {}",
        loaded.recipe.package.name,
        loaded
            .base_dir
            .as_deref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "built-in set".to_string())
    );
    Ok(loaded)
}

/// Installation root: the command line wins over the config file
pub(crate) fn install_root(root: Option<&str>, config: &KettleConfig) -> PathBuf {
    root.map(PathBuf::from)
        .unwrap_or_else(|| config.install.root.clone())
}

/// Layout for the recipe's variant under the chosen root
pub(crate) fn layout_for(
    loaded: &LoadedRecipe,
    root: &std::path::Path,
    variant: Variant,
) -> Result<InstallLayout> {
    let recipe = &loaded.recipe;
    let version = recipe.version_for(variant)?;
    InstallLayout::new(root, &recipe.package.name, &version)
        .with_context(|| format!("Invalid install root: {}", root.display()))
}
