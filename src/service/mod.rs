// src/service/mod.rs

//! Service descriptor generation
//!
//! A recipe's `[service]` template is resolved against the install layout
//! into a plain [`ServiceDescriptor`]. Renderers turn the descriptor into
//! a launchd property list, a systemd unit or JSON.

mod launchd;
mod systemd;

pub use launchd::render_plist;
pub use systemd::render_unit;

use crate::error::{Error, Result};
use crate::recipe::{InstallLayout, Recipe};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a supervisor needs to run the installed program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub label: String,
    pub executable_path: String,
    pub working_directory: String,
    pub arguments: Vec<String>,
    pub run_at_load: bool,
    pub keep_alive: bool,
}

impl ServiceDescriptor {
    /// Build a descriptor that starts at load and is not restarted
    pub fn new(
        label: impl Into<String>,
        executable_path: impl Into<String>,
        working_directory: impl Into<String>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            label: label.into(),
            executable_path: executable_path.into(),
            working_directory: working_directory.into(),
            arguments,
            run_at_load: true,
            keep_alive: false,
        }
    }

    /// Executable followed by its arguments
    pub fn program_arguments(&self) -> Vec<&str> {
        std::iter::once(self.executable_path.as_str())
            .chain(self.arguments.iter().map(String::as_str))
            .collect()
    }
}

/// Resolve the recipe's service template, if it has one
pub fn generate_descriptor(recipe: &Recipe, layout: &InstallLayout) -> Option<ServiceDescriptor> {
    let service = recipe.service.as_ref()?;
    Some(ServiceDescriptor::new(
        recipe.substitute(&service.label, layout),
        recipe.substitute(&service.executable, layout),
        recipe.substitute(&service.working_directory, layout),
        service
            .arguments
            .iter()
            .map(|arg| recipe.substitute(arg, layout))
            .collect(),
    ))
}

/// Output format for a descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceFormat {
    #[default]
    Launchd,
    Systemd,
    Json,
}

impl ServiceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceFormat::Launchd => "launchd",
            ServiceFormat::Systemd => "systemd",
            ServiceFormat::Json => "json",
        }
    }

    /// File name the descriptor is installed under
    pub fn file_name(&self, label: &str) -> String {
        match self {
            ServiceFormat::Launchd => format!("{}.plist", label),
            ServiceFormat::Systemd => format!("{}.service", label),
            ServiceFormat::Json => format!("{}.json", label),
        }
    }
}

impl fmt::Display for ServiceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a descriptor in the requested format
pub fn render(descriptor: &ServiceDescriptor, format: ServiceFormat) -> Result<String> {
    match format {
        ServiceFormat::Launchd => render_plist(descriptor),
        ServiceFormat::Systemd => Ok(render_unit(descriptor)),
        ServiceFormat::Json => serde_json::to_string_pretty(descriptor)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| Error::Render(e.to_string())),
    }
}
