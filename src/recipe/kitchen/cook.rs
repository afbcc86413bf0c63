// src/recipe/kitchen/cook.rs

//! Cook: the staged execution of a single recipe
//!
//! Stages run strictly in sequence. The first failing stage moves the cook
//! to [`CookState::Failed`] and nothing after it runs; there is no retry
//! and no rollback of side effects already performed.

use super::config::{CookPlan, CookReport, CookRequest};
use super::finalize::{self, FinalizeSummary};
use super::patch::apply_patches;
use super::Kitchen;
use crate::caveats::render_caveats;
use crate::error::{Error, Result};
use crate::recipe::args::{build_arguments, ArgumentList};
use crate::recipe::format::Recipe;
use crate::recipe::layout::InstallLayout;
use crate::recipe::modules::resolve_modules;
use crate::recipe::options::parse_options;
use crate::recipe::parser::LoadedRecipe;
use crate::service::{generate_descriptor, render, ServiceDescriptor};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Steps of a cook, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ParseOptions,
    ResolveModules,
    BuildArguments,
    ApplyPatches,
    RunConfigure,
    RunBuild,
    RunInstall,
    Finalize,
    GenerateDescriptor,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ParseOptions => "parse-options",
            Stage::ResolveModules => "resolve-modules",
            Stage::BuildArguments => "build-arguments",
            Stage::ApplyPatches => "apply-patches",
            Stage::RunConfigure => "configure",
            Stage::RunBuild => "build",
            Stage::RunInstall => "install",
            Stage::Finalize => "finalize",
            Stage::GenerateDescriptor => "generate-descriptor",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a cook currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookState {
    Pending,
    Running(Stage),
    Succeeded,
    Failed { stage: Stage, reason: String },
}

impl CookState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CookState::Succeeded | CookState::Failed { .. })
    }
}

/// A single cook operation
pub struct Cook<'a> {
    kitchen: &'a Kitchen,
    loaded: &'a LoadedRecipe,
    request: &'a CookRequest,
    layout: InstallLayout,
    source_dir: PathBuf,
    state: CookState,
    warnings: Vec<String>,
}

impl<'a> Cook<'a> {
    /// Resolve the variant and layout; fails before any stage runs
    pub(super) fn new(
        kitchen: &'a Kitchen,
        loaded: &'a LoadedRecipe,
        request: &'a CookRequest,
    ) -> Result<Self> {
        let recipe = &loaded.recipe;
        let version = recipe.version_for(request.variant)?;
        let layout = InstallLayout::new(&request.root, &recipe.package.name, &version)?;

        let source_dir = std::path::absolute(&request.source_dir)?;
        if !source_dir.is_dir() {
            return Err(Error::InvalidPath(format!(
                "Source directory does not exist: {}",
                source_dir.display()
            )));
        }

        Ok(Self {
            kitchen,
            loaded,
            request,
            layout,
            source_dir,
            state: CookState::Pending,
            warnings: Vec::new(),
        })
    }

    pub fn state(&self) -> &CookState {
        &self.state
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    fn recipe(&self) -> &'a Recipe {
        &self.loaded.recipe
    }

    /// Run one stage, recording its outcome in the cook state
    fn stage<T>(&mut self, stage: Stage, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        debug!("Entering stage {}", stage);
        self.state = CookState::Running(stage);

        f(self).inspect_err(|e| {
            warn!("Stage {} failed: {}", stage, e);
            self.state = CookState::Failed {
                stage,
                reason: e.to_string(),
            };
        })
    }

    /// Run every stage through descriptor generation
    pub fn run(&mut self) -> Result<CookReport> {
        let plan = self.plan_stages()?;
        let recipe = self.recipe();

        info!(
            "Cooking {} {} into {}",
            recipe.package.name,
            self.layout.version,
            self.layout.prefix.display()
        );

        let patches_applied = self.stage(Stage::ApplyPatches, |c| c.apply_patches())?;
        self.stage(Stage::RunConfigure, |c| c.configure(&plan.arguments))?;
        self.stage(Stage::RunBuild, |c| c.run_command(&recipe.build.make))?;
        self.stage(Stage::RunInstall, |c| c.run_command(&recipe.build.install))?;
        let finalize = self.stage(Stage::Finalize, |c| c.finalize())?;
        let (descriptor, descriptor_path) =
            self.stage(Stage::GenerateDescriptor, |c| c.write_descriptor())?;
        let caveats = render_caveats(recipe, &self.layout);

        self.state = CookState::Succeeded;
        info!("Cooked {} {}", recipe.package.name, self.layout.version);

        Ok(CookReport {
            plan,
            patches_applied,
            finalize,
            descriptor,
            descriptor_path,
            caveats,
        })
    }

    /// Run only the stages that compute the configure arguments
    ///
    /// Nothing is executed and the filesystem is not touched.
    pub fn plan(&mut self) -> Result<CookPlan> {
        let plan = self.plan_stages()?;
        self.state = CookState::Succeeded;
        Ok(plan)
    }

    fn plan_stages(&mut self) -> Result<CookPlan> {
        self.check_dependencies();

        let enabled = self.stage(Stage::ParseOptions, |c| Ok(c.parse_options()))?;
        let modules = self.stage(Stage::ResolveModules, |c| c.resolve_modules())?;
        let arguments =
            self.stage(Stage::BuildArguments, |c| c.build_arguments(&enabled, &modules))?;

        Ok(CookPlan {
            layout: self.layout.clone(),
            variant: self.request.variant,
            enabled_options: enabled,
            arguments,
            warnings: self.warnings.clone(),
        })
    }

    /// Warn about declared dependencies missing from `<root>/opt`
    fn check_dependencies(&mut self) {
        let recipe = self.recipe();
        for dep in &recipe.package.depends_on {
            let linked = self.layout.root.join("opt").join(dep);
            if !linked.exists() {
                let message = format!(
                    "{} depends on {}, which is not installed under {}",
                    recipe.package.name,
                    dep,
                    self.layout.root.display()
                );
                warn!("{}", message);
                self.warnings.push(message);
            }
        }
    }

    fn parse_options(&self) -> BTreeSet<String> {
        let enabled = parse_options(
            &self.recipe().options,
            &self.request.raw_args,
            self.request.variant,
        );
        if !enabled.is_empty() {
            info!(
                "Enabled options: {}",
                enabled.iter().cloned().collect::<Vec<_>>().join(", ")
            );
        }
        enabled
    }

    fn resolve_modules(&self) -> Result<ArgumentList> {
        resolve_modules(&self.request.raw_args, &self.recipe().modules)
    }

    fn build_arguments(
        &self,
        enabled: &BTreeSet<String>,
        modules: &ArgumentList,
    ) -> Result<ArgumentList> {
        build_arguments(
            self.recipe(),
            &self.layout,
            enabled,
            self.request.variant,
            modules,
            self.kitchen.resolver.as_ref(),
        )
    }

    fn apply_patches(&self) -> Result<usize> {
        apply_patches(
            &self.recipe().patches,
            self.loaded.base_dir.as_deref(),
            &self.source_dir,
            self.kitchen.runner.as_ref(),
        )
    }

    fn configure(&self, arguments: &ArgumentList) -> Result<()> {
        let entrypoint = self.recipe().configure_entrypoint(self.request.variant);
        self.kitchen
            .runner
            .run(entrypoint, arguments.as_slice(), &self.source_dir)
    }

    /// Run a build command given as program plus arguments
    fn run_command(&self, command: &[String]) -> Result<()> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::ParseError("Empty build command".to_string()))?;
        let recipe = self.recipe();
        let args: Vec<String> = args
            .iter()
            .map(|arg| recipe.substitute(arg, &self.layout))
            .collect();
        self.kitchen.runner.run(program, &args, &self.source_dir)
    }

    fn finalize(&self) -> Result<FinalizeSummary> {
        finalize::finalize(self.recipe(), &self.layout, &self.source_dir)
    }

    fn write_descriptor(&self) -> Result<(Option<ServiceDescriptor>, Option<PathBuf>)> {
        let Some(descriptor) = generate_descriptor(self.recipe(), &self.layout) else {
            return Ok((None, None));
        };
        if !self.kitchen.config.write_descriptor {
            return Ok((Some(descriptor), None));
        }

        let format = self.kitchen.config.service_format;
        let path = self.layout.prefix.join(format.file_name(&descriptor.label));
        let content = render(&descriptor, format)?;

        finalize::ensure_dir(&self.layout.prefix)?;
        fs::write(&path, content).map_err(|e| {
            Error::IoError(format!("Failed to write {}: {}", path.display(), e))
        })?;
        info!("Wrote {} descriptor to {}", format, path.display());

        Ok((Some(descriptor), Some(path)))
    }
}
