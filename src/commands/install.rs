// src/commands/install.rs

//! Install command - cook a recipe from an unpacked source tree

use super::{install_root, open_recipe};
use crate::cli::TargetArgs;
use anyhow::{Context, Result};
use kettle::{CookRequest, CookState, KettleConfig, Kitchen};
use tracing::info;

/// Cook a recipe and install the result
///
/// # Arguments
/// * `recipe` - Recipe file path or built-in recipe name
/// * `source` - Unpacked source directory
/// * `target` - Root and variant selection
/// * `no_service` - Skip writing the service descriptor
/// * `flags` - Recipe flags (`--with-<option>`, `--with-module=<path>`)
pub fn cmd_install(
    recipe: &str,
    source: &str,
    target: &TargetArgs,
    no_service: bool,
    flags: &[String],
    config: &KettleConfig,
) -> Result<()> {
    let loaded = open_recipe(recipe, config)?;
    let name = loaded.recipe.package.name.clone();
    let variant = target.variant();

    let mut kitchen_config = config.kitchen_config();
    if no_service {
        kitchen_config.write_descriptor = false;
    }
    let kitchen = Kitchen::new(kitchen_config);

    let request = CookRequest::new(source, install_root(target.root.as_deref(), config))
        .with_variant(variant)
        .with_args(flags.to_vec());

    let mut cook = kitchen
        .prepare(&loaded, &request)
        .with_context(|| format!("Cannot cook {} ({})", name, variant))?;

    println!(
        "Cooking {} {} into {} with {} parallel jobs...",
        name,
        cook.layout().version,
        cook.layout().prefix.display(),
        kitchen.config().jobs
    );

    let report = match cook.run() {
        Ok(report) => report,
        Err(e) => {
            let stage = match cook.state() {
                CookState::Failed { stage, .. } => stage.to_string(),
                other => format!("{:?}", other),
            };
            return Err(e).with_context(|| format!("Failed to cook {} during {}", name, stage));
        }
    };

    for warning in &report.plan.warnings {
        println!("Warning: {}", warning);
    }

    println!("\n[COMPLETE] Installed {} to {}", name, report.plan.layout.prefix.display());
    if report.patches_applied > 0 {
        println!("  - {} patch(es) applied", report.patches_applied);
    }
    for page in &report.finalize.man_pages {
        println!("  - man page: {}", page.display());
    }
    if let Some(docroot) = &report.finalize.docroot {
        println!("  - docroot: {}", docroot.display());
    }
    if let Some(link) = &report.finalize.legacy_link {
        println!("  - legacy link: {}", link.display());
    }
    if let Some(path) = &report.descriptor_path {
        println!("  - service: {}", path.display());
    }

    if let Some(caveats) = &report.caveats {
        println!("\n==> Caveats");
        print!("{}", caveats);
    }

    info!("Successfully cooked {} ({})", name, variant);
    Ok(())
}
