// src/recipe/parser.rs

//! Recipe file parsing and lookup

use crate::error::{Error, Result};
use crate::recipe::format::{Recipe, Variant};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recipes compiled into the binary
const BUILTIN_RECIPES: &[(&str, &str)] = &[("nginx", include_str!("../../recipes/nginx.toml"))];

/// A parsed recipe together with the directory it was loaded from
///
/// Relative patch paths are resolved against `base_dir`.
#[derive(Debug, Clone)]
pub struct LoadedRecipe {
    pub recipe: Recipe,
    pub base_dir: Option<PathBuf>,
}

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Names of the built-in recipes
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_RECIPES.iter().map(|(name, _)| *name)
}

/// Parse a built-in recipe by name
pub fn builtin_recipe(name: &str) -> Option<Result<Recipe>> {
    BUILTIN_RECIPES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, content)| parse_recipe(content))
}

/// Load a recipe from a path, a search directory, or the built-in set
///
/// Lookup order:
/// 1. `spec` as a file path
/// 2. `<dir>/<spec>.toml` for each search directory
/// 3. a built-in recipe named `spec`
pub fn load_recipe(spec: &str, search_dirs: &[PathBuf]) -> Result<LoadedRecipe> {
    let direct = Path::new(spec);
    if direct.is_file() {
        return load_file(direct);
    }

    for dir in search_dirs {
        let candidate = dir.join(format!("{}.toml", spec));
        if candidate.is_file() {
            return load_file(&candidate);
        }
    }

    if let Some(recipe) = builtin_recipe(spec) {
        debug!("Using built-in recipe for {}", spec);
        return Ok(LoadedRecipe {
            recipe: recipe?,
            base_dir: None,
        });
    }

    Err(Error::RecipeNotFound(spec.to_string()))
}

fn load_file(path: &Path) -> Result<LoadedRecipe> {
    debug!("Loading recipe from {}", path.display());
    let recipe = parse_recipe_file(path)?;
    Ok(LoadedRecipe {
        recipe,
        base_dir: path.parent().map(Path::to_path_buf),
    })
}

/// Validate a recipe for completeness and correctness
///
/// Hard errors are returned as `Err`; soft issues come back as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }

    // Stable and devel must pin a version and digest; head tracks a live reference
    for variant in [Variant::Stable, Variant::Devel] {
        let Ok(spec) = recipe.variant(variant) else {
            continue;
        };
        if spec.version.as_deref().is_none_or(str::is_empty) {
            return Err(Error::ParseError(format!(
                "The {} variant must declare a version",
                variant
            )));
        }
        match &spec.checksum {
            Some(checksum) if checksum.split_once(':').is_some() => {}
            Some(checksum) => {
                return Err(Error::ParseError(format!(
                    "Invalid checksum format: {}. Expected algorithm:hex",
                    checksum
                )));
            }
            None => warnings.push(format!("The {} variant has no checksum", variant)),
        }
    }

    if recipe.build.make.is_empty() || recipe.build.install.is_empty() {
        return Err(Error::ParseError(
            "Build and install commands cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for option in &recipe.options {
        if !option.name.starts_with("with-") && !option.name.starts_with("without-") {
            warnings.push(format!(
                "Option {} does not follow the with-/without- naming convention",
                option.name
            ));
        }
        if !seen.insert(option.name.as_str()) {
            return Err(Error::ParseError(format!("Duplicate option: {}", option.name)));
        }
        if option.flag_literal() == recipe.modules.flag {
            return Err(Error::ParseError(format!(
                "Option {} collides with the module flag",
                option.name
            )));
        }
        match (&option.flag, &option.probe) {
            (None, None) => warnings.push(format!("Option {} has no effect", option.name)),
            (Some(_), Some(_)) => {
                return Err(Error::ParseError(format!(
                    "Option {} declares both a flag and a probe",
                    option.name
                )));
            }
            (_, Some(probe)) if probe.command.is_empty() => {
                return Err(Error::ParseError(format!(
                    "Option {} has an empty probe command",
                    option.name
                )));
            }
            _ => {}
        }
    }

    for patch in &recipe.patches {
        if patch.file.is_some() == patch.content.is_some() {
            return Err(Error::ParseError(
                "Each patch needs exactly one of file or content".to_string(),
            ));
        }
    }

    if recipe.package.summary.is_none() {
        warnings.push("Missing package summary".to_string());
    }

    Ok(warnings)
}
