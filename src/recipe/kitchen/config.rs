// src/recipe/kitchen/config.rs

//! Configuration, request and report types for the Kitchen

use super::finalize::FinalizeSummary;
use crate::recipe::args::ArgumentList;
use crate::recipe::format::Variant;
use crate::recipe::layout::InstallLayout;
use crate::service::{ServiceDescriptor, ServiceFormat};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Number of parallel jobs passed to build steps
    pub jobs: u32,
    /// Format of the descriptor written into the install prefix
    pub service_format: ServiceFormat,
    /// Write the service descriptor file during the final stage
    pub write_descriptor: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            jobs,
            service_format: ServiceFormat::default(),
            write_descriptor: true,
        }
    }
}

/// One invocation of a recipe
#[derive(Debug, Clone)]
pub struct CookRequest {
    /// Unpacked source tree; build steps run here
    pub source_dir: PathBuf,
    /// Installation root (`/usr/local` by default)
    pub root: PathBuf,
    /// Active variant
    pub variant: Variant,
    /// Raw invocation flags (`--with-debug`, `--with-module=...`)
    pub raw_args: Vec<String>,
}

impl CookRequest {
    pub fn new(source_dir: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            root: root.into(),
            variant: Variant::Stable,
            raw_args: Vec::new(),
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_args(mut self, raw_args: Vec<String>) -> Self {
        self.raw_args = raw_args;
        self
    }
}

/// Outcome of the planning stages
#[derive(Debug, Clone)]
pub struct CookPlan {
    pub layout: InstallLayout,
    pub variant: Variant,
    /// Enabled option names
    pub enabled_options: BTreeSet<String>,
    /// Final configure arguments
    pub arguments: ArgumentList,
    /// Non-fatal findings (missing dependencies)
    pub warnings: Vec<String>,
}

/// Result of cooking a recipe
#[derive(Debug, Clone)]
pub struct CookReport {
    pub plan: CookPlan,
    /// Number of patches applied before configure
    pub patches_applied: usize,
    /// What finalization touched
    pub finalize: FinalizeSummary,
    /// Service descriptor, when the recipe declares one
    pub descriptor: Option<ServiceDescriptor>,
    /// Where the descriptor was written
    pub descriptor_path: Option<PathBuf>,
    /// Post-install guidance
    pub caveats: Option<String>,
}
