// src/recipe/kitchen/mod.rs

//! Kitchen: where recipes are cooked
//!
//! The Kitchen owns the collaborators a cook needs: the process runner for
//! build steps and the resolver used by probe-backed options. Both are
//! trait objects so tests can swap in recording doubles.
//!
//! ## Cooking Process
//! 1. **Parse options**: pick the enabled options from the invocation flags
//! 2. **Resolve modules**: expand `--with-module=` paths
//! 3. **Build arguments**: compute the configure argument list
//! 4. **Apply patches**: patch the unpacked source tree
//! 5. **Simmer**: configure, build and install
//! 6. **Finalize**: man pages, runtime dirs, docroot and legacy links
//! 7. **Plate**: write the service descriptor, render caveats

mod config;
mod cook;
pub mod finalize;
mod patch;
pub mod runner;

pub use config::{CookPlan, CookReport, CookRequest, KitchenConfig};
pub use cook::{Cook, CookState, Stage};
pub use finalize::FinalizeSummary;
pub use patch::apply_patches;
pub use runner::{Runner, SystemRunner};

use crate::error::Result;
use crate::recipe::args::{CommandResolver, RootResolver};
use crate::recipe::parser::LoadedRecipe;
use std::sync::Arc;
use tracing::error;

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    runner: Arc<dyn Runner>,
    resolver: Arc<dyn RootResolver>,
}

impl Kitchen {
    /// Create a Kitchen that runs real processes
    pub fn new(config: KitchenConfig) -> Self {
        let runner = Arc::new(SystemRunner::new(Some(config.jobs)));
        Self {
            config,
            runner,
            resolver: Arc::new(CommandResolver),
        }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    /// Replace the process runner
    pub fn with_runner(mut self, runner: Arc<dyn Runner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace the module root resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn RootResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Prepare a cook without running any stage
    pub fn prepare<'a>(
        &'a self,
        loaded: &'a LoadedRecipe,
        request: &'a CookRequest,
    ) -> Result<Cook<'a>> {
        Cook::new(self, loaded, request)
    }

    /// Cook a recipe: plan, patch, build, install, finalize and describe
    pub fn cook(&self, loaded: &LoadedRecipe, request: &CookRequest) -> Result<CookReport> {
        let mut cook = self.prepare(loaded, request)?;
        cook.run().inspect_err(|e| {
            if let CookState::Failed { stage, .. } = cook.state() {
                error!(
                    "Cooking {} failed during {}: {}",
                    loaded.recipe.package.name, stage, e
                );
            }
        })
    }

    /// Compute the configure arguments without building anything
    pub fn plan(&self, loaded: &LoadedRecipe, request: &CookRequest) -> Result<CookPlan> {
        self.prepare(loaded, request)?.plan()
    }
}
