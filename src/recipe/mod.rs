// src/recipe/mod.rs

//! Recipe system for configuring, building and installing from source
//!
//! Recipes define how to turn an unpacked source tree into an installed
//! package, including:
//! - Source variants (stable, devel, head)
//! - Build options toggled by invocation flags
//! - External add-on modules
//! - Build instructions (configure, make, install)
//! - Post-install finalization and service supervision
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The build instructions (like a recipe card)
//! - **Cook**: Build and install a package from a recipe
//! - **Kitchen**: Where cooking happens, with its runner and resolver
//! - **Simmer**: The configure/make/install steps
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "nginx"
//!
//! [variants.stable]
//! version = "1.2.8"
//! url = "http://nginx.org/download/nginx-1.2.8.tar.gz"
//!
//! [[options]]
//! name = "with-webdav"
//! description = "Compile with support for WebDAV module"
//! flag = "--with-http_dav_module"
//!
//! [build]
//! configure_args = ["--prefix=%(prefix)s", "--conf-path=%(etc)s/nginx/nginx.conf"]
//! ```

pub mod args;
pub mod format;
mod kitchen;
pub mod layout;
pub mod modules;
pub mod options;
pub mod parser;

pub use args::{build_arguments, ArgumentList, CommandResolver, RootResolver};
pub use format::{BuildOption, BuildSection, ModuleProbe, PatchInfo, Recipe, Variant};
pub use kitchen::{
    apply_patches, finalize, runner, Cook, CookPlan, CookReport, CookRequest, CookState,
    FinalizeSummary, Kitchen, KitchenConfig, Runner, Stage, SystemRunner,
};
pub use layout::InstallLayout;
pub use modules::resolve_modules;
pub use options::{offered_options, parse_options};
pub use parser::{load_recipe, parse_recipe, parse_recipe_file, validate_recipe, LoadedRecipe};
