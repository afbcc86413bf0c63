// src/lib.rs

//! Kettle: a build-recipe execution engine
//!
//! Kettle turns a declarative recipe into a configured, built, installed
//! and optionally service-supervised piece of software.
//!
//! # Architecture
//!
//! - Recipes: TOML files (or built-ins) declaring variants, options,
//!   configure arguments, finalize steps and a service template
//! - Layout: every install path derived up front from the root prefix
//! - Kitchen: sequences the cook stages and owns the process runner
//! - Explicit inputs: invocation flags are passed in, never read globally

pub mod caveats;
pub mod config;
mod error;
pub mod recipe;
pub mod service;

pub use caveats::render_caveats;
pub use config::{load_config, KettleConfig};
pub use error::{Error, Result};
pub use recipe::{
    Cook, CookPlan, CookReport, CookRequest, CookState, InstallLayout, Kitchen, KitchenConfig,
    LoadedRecipe, Recipe, Stage, Variant,
};
pub use service::{generate_descriptor, ServiceDescriptor, ServiceFormat};
