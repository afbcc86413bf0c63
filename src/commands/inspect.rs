// src/commands/inspect.rs

//! Read-only recipe commands: options, args, validate

use super::{install_root, open_recipe};
use crate::cli::TargetArgs;
use anyhow::{Context, Result};
use kettle::recipe::{offered_options, validate_recipe};
use kettle::{CookRequest, KettleConfig, Kitchen, Variant};
use std::env;

/// List the options a recipe offers for a variant
pub fn cmd_options(recipe: &str, variant: Variant, config: &KettleConfig) -> Result<()> {
    let loaded = open_recipe(recipe, config)?;
    let recipe = &loaded.recipe;

    let offered = offered_options(&recipe.options, variant);
    let modules = &recipe.modules;
    if offered.is_empty() && modules.description.is_none() {
        println!("{} ({}) has no options", recipe.package.name, variant);
        return Ok(());
    }

    for option in offered {
        println!("{}", option.flag_literal());
        println!("\t{}", option.description);
    }
    if let Some(description) = &modules.description {
        println!("{}=<path>", modules.flag);
        println!("\t{}", description);
    }
    Ok(())
}

/// Print the configure arguments an install would use, one per line
///
/// Module paths resolve against the current directory and probes run,
/// but nothing is built.
pub fn cmd_args(
    recipe: &str,
    target: &TargetArgs,
    flags: &[String],
    config: &KettleConfig,
) -> Result<()> {
    let loaded = open_recipe(recipe, config)?;
    let kitchen = Kitchen::new(config.kitchen_config());
    let source = env::current_dir().context("Failed to read current directory")?;

    let request = CookRequest::new(source, install_root(target.root.as_deref(), config))
        .with_variant(target.variant())
        .with_args(flags.to_vec());

    let plan = kitchen
        .plan(&loaded, &request)
        .with_context(|| format!("Failed to plan {}", loaded.recipe.package.name))?;

    for warning in &plan.warnings {
        eprintln!("Warning: {}", warning);
    }
    println!("{}", plan.layout.prefix.display());
    for arg in plan.arguments.iter() {
        println!("  {}", arg);
    }
    Ok(())
}

/// Check a recipe for errors and print warnings
pub fn cmd_validate(recipe: &str, config: &KettleConfig) -> Result<()> {
    let loaded = open_recipe(recipe, config)?;
    let recipe = &loaded.recipe;

    let warnings = validate_recipe(recipe).with_context(|| "Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    println!("Recipe {} is valid", recipe.package.name);
    if warnings.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len());
    }
    Ok(())
}
