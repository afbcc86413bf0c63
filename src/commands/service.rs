// src/commands/service.rs

//! Service descriptor and caveats output

use super::{install_root, layout_for, open_recipe};
use crate::cli::TargetArgs;
use anyhow::{Context, Result};
use kettle::service::render;
use kettle::{generate_descriptor, render_caveats, KettleConfig, ServiceFormat};

/// Print the recipe's service descriptor
pub fn cmd_service(
    recipe: &str,
    target: &TargetArgs,
    format: Option<ServiceFormat>,
    config: &KettleConfig,
) -> Result<()> {
    let loaded = open_recipe(recipe, config)?;
    let root = install_root(target.root.as_deref(), config);
    let layout = layout_for(&loaded, &root, target.variant())?;

    let descriptor = generate_descriptor(&loaded.recipe, &layout).ok_or_else(|| {
        anyhow::anyhow!("{} does not declare a service", loaded.recipe.package.name)
    })?;

    let format = format.unwrap_or(config.service.format);
    let rendered = render(&descriptor, format)
        .with_context(|| format!("Failed to render {} descriptor", format))?;
    print!("{}", rendered);
    Ok(())
}

/// Print post-install guidance
pub fn cmd_caveats(recipe: &str, target: &TargetArgs, config: &KettleConfig) -> Result<()> {
    let loaded = open_recipe(recipe, config)?;
    let root = install_root(target.root.as_deref(), config);
    let layout = layout_for(&loaded, &root, target.variant())?;

    match render_caveats(&loaded.recipe, &layout) {
        Some(text) => print!("{}", text),
        None => println!("{} has no caveats", loaded.recipe.package.name),
    }
    Ok(())
}
