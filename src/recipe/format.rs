// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files that describe how to configure, build, install
//! and supervise a package whose source tree is already unpacked.

use crate::error::{Error, Result};
use crate::recipe::layout::InstallLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A complete recipe for building a package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Source tracks (stable, devel, head)
    pub variants: VariantsSection,

    /// Options that toggle features at invocation time
    #[serde(default)]
    pub options: Vec<BuildOption>,

    /// Repeatable external module flag
    #[serde(default)]
    pub modules: ModuleSection,

    /// Build instructions
    pub build: BuildSection,

    /// Patches applied to the source tree before configure
    #[serde(default)]
    pub patches: Vec<PatchInfo>,

    /// Post-install filesystem adjustments
    #[serde(default)]
    pub finalize: FinalizeSection,

    /// Service supervision template (optional)
    #[serde(default)]
    pub service: Option<ServiceSection>,

    /// Post-install guidance shown to the operator (optional)
    #[serde(default)]
    pub caveats: Option<CaveatsSection>,

    /// Variables for substitution (optional)
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl Recipe {
    /// Substitute variables in a string
    ///
    /// Replaces `%(name)s` patterns with their values from:
    /// 1. Layout variables (prefix, bin, etc, var, root, ...)
    /// 2. Custom variables from the [variables] section
    pub fn substitute(&self, template: &str, layout: &InstallLayout) -> String {
        let mut result = template.to_string();

        for (key, value) in layout.variables() {
            result = result.replace(&format!("%({})s", key), &value);
        }

        for (key, value) in &self.variables {
            result = result.replace(&format!("%({})s", key), value);
        }

        result
    }

    /// Get the source spec for a variant
    pub fn variant(&self, variant: Variant) -> Result<&VariantSpec> {
        let spec = match variant {
            Variant::Stable => Some(&self.variants.stable),
            Variant::Devel => self.variants.devel.as_ref(),
            Variant::Head => self.variants.head.as_ref(),
        };

        spec.ok_or_else(|| {
            Error::ParseError(format!(
                "{} has no {} variant",
                self.package.name, variant
            ))
        })
    }

    /// Version string installed for a variant
    ///
    /// Head builds track a live reference and are always installed as `HEAD`.
    pub fn version_for(&self, variant: Variant) -> Result<String> {
        let spec = self.variant(variant)?;
        match (variant, &spec.version) {
            (Variant::Head, _) => Ok("HEAD".to_string()),
            (_, Some(version)) => Ok(version.clone()),
            (_, None) => Err(Error::ParseError(format!(
                "{} variant of {} has no version",
                variant, self.package.name
            ))),
        }
    }

    /// Configure entrypoint for a variant
    ///
    /// Head checkouts lack a pre-generated configure script.
    pub fn configure_entrypoint(&self, variant: Variant) -> &str {
        match (variant, &self.build.head_configure) {
            (Variant::Head, Some(entry)) => entry,
            _ => &self.build.configure,
        }
    }

    /// Look up a declared option by name
    pub fn option(&self, name: &str) -> Option<&BuildOption> {
        self.options.iter().find(|o| o.name == name)
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub summary: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,

    /// Packages that must already be installed under `<root>/opt`
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// A source/version track of the same package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Stable release (default)
    #[default]
    Stable,
    /// Development release
    Devel,
    /// Live source-control head
    Head,
}

impl Variant {
    /// Get the variant name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Stable => "stable",
            Variant::Devel => "devel",
            Variant::Head => "head",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared source tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantsSection {
    pub stable: VariantSpec,

    #[serde(default)]
    pub devel: Option<VariantSpec>,

    #[serde(default)]
    pub head: Option<VariantSpec>,
}

/// Source location and integrity digest of one variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantSpec {
    /// Release version (absent for head)
    #[serde(default)]
    pub version: Option<String>,

    /// Source location (archive URL or source-control reference)
    pub url: String,

    /// Integrity digest, `algorithm:hex` (absent for head)
    #[serde(default)]
    pub checksum: Option<String>,
}

/// A recipe-declared build option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOption {
    /// Option name; the invocation flag is `--<name>`
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Variants offering this option (empty = every variant)
    #[serde(default)]
    pub variants: Vec<Variant>,

    /// Configure flag appended when the option is enabled
    #[serde(default)]
    pub flag: Option<String>,

    /// Helper lookup for an add-on module root
    #[serde(default)]
    pub probe: Option<ModuleProbe>,
}

impl BuildOption {
    /// Invocation flag that enables this option
    pub fn flag_literal(&self) -> String {
        format!("--{}", self.name)
    }

    /// Check whether the option is offered for a variant
    pub fn applies_to(&self, variant: Variant) -> bool {
        self.variants.is_empty() || self.variants.contains(&variant)
    }
}

/// How to discover the root of an add-on module shipped by a helper tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleProbe {
    /// Command printing the root directory on stdout
    pub command: Vec<String>,

    /// Module directory relative to the discovered root
    #[serde(default)]
    pub subdir: Option<String>,

    /// Remediation shown when the helper is missing
    #[serde(default)]
    pub hint: Option<String>,
}

/// Repeatable external module flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleSection {
    /// Invocation flag, used as `<flag>=<path>`
    #[serde(default = "default_module_flag")]
    pub flag: String,

    /// Configure flag emitted per module, as `<argument>=<abs path>`
    #[serde(default = "default_module_argument")]
    pub argument: String,

    #[serde(default)]
    pub description: Option<String>,
}

impl Default for ModuleSection {
    fn default() -> Self {
        Self {
            flag: default_module_flag(),
            argument: default_module_argument(),
            description: None,
        }
    }
}

fn default_module_flag() -> String {
    "--with-module".to_string()
}

fn default_module_argument() -> String {
    "--add-module".to_string()
}

/// Build instructions section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    /// Configure entrypoint, relative to the source tree
    #[serde(default = "default_configure")]
    pub configure: String,

    /// Configure entrypoint for head checkouts
    #[serde(default)]
    pub head_configure: Option<String>,

    /// Base configure arguments, in order
    ///
    /// Supports `%(variable)s` substitution.
    #[serde(default)]
    pub configure_args: Vec<String>,

    /// Build command (program followed by arguments)
    #[serde(default = "default_make")]
    pub make: Vec<String>,

    /// Install command (program followed by arguments)
    #[serde(default = "default_install")]
    pub install: Vec<String>,
}

fn default_configure() -> String {
    "./configure".to_string()
}

fn default_make() -> Vec<String> {
    vec!["make".to_string()]
}

fn default_install() -> Vec<String> {
    vec!["make".to_string(), "install".to_string()]
}

/// Information about a single patch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchInfo {
    /// Patch file path, relative to the recipe file
    #[serde(default)]
    pub file: Option<String>,

    /// Inline patch body
    #[serde(default)]
    pub content: Option<String>,

    /// Strip level for patch (default: 1)
    #[serde(default = "default_strip")]
    pub strip: u32,
}

fn default_strip() -> u32 {
    1
}

/// Post-install filesystem adjustments
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FinalizeSection {
    /// Man pages in the build tree, installed by section (`objs/nginx.8`)
    #[serde(default)]
    pub man_pages: Vec<String>,

    /// Runtime directories to create (supports substitution)
    #[serde(default)]
    pub runtime_dirs: Vec<String>,

    /// Content directory relocated to a shared location
    #[serde(default)]
    pub docroot: Option<DocrootSection>,

    /// Compatibility link for an older binary directory
    #[serde(default)]
    pub legacy_link: Option<LegacyLinkSection>,
}

/// Bundled content directory moved out of the versioned prefix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocrootSection {
    /// Directory relative to the prefix (`html`)
    pub path: String,

    /// Shared location (supports substitution)
    pub shared: String,
}

/// Link kept for tooling that expects an older layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyLinkSection {
    /// Old binary directory name relative to a prefix (`sbin`)
    pub dir: String,

    /// Binary name inside `bin`
    pub binary: String,
}

/// Service supervision template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSection {
    /// Service label (supports substitution)
    pub label: String,

    /// Executable (supports substitution)
    pub executable: String,

    /// Working directory (supports substitution)
    pub working_directory: String,

    /// Arguments after the executable
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Post-install guidance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaveatsSection {
    /// Text shown after install (supports substitution)
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const SAMPLE_RECIPE: &str = r#"
[package]
name = "hello"
summary = "Greets"
depends_on = ["gettext"]

[variants.stable]
version = "2.12"
url = "https://ftp.gnu.org/gnu/hello/hello-2.12.tar.gz"
checksum = "sha256:cf04af86dc085268c5f4470fbae49b18afbc221b78096aab842d934a76bad0ab"

[variants.head]
url = "https://git.savannah.gnu.org/git/hello.git"

[[options]]
name = "with-nls"
description = "Enable native language support"
flag = "--enable-nls"

[[options]]
name = "with-color"
variants = ["head"]
flag = "--enable-color"

[build]
head_configure = "./bootstrap"
configure_args = ["--prefix=%(prefix)s", "--sysconfdir=%(etc)s", "--docdir=%(docs)s"]

[variables]
docs = "/srv/docs"
"#;

    fn sample() -> Recipe {
        toml::from_str(SAMPLE_RECIPE).unwrap()
    }

    #[test]
    fn test_parse_recipe() {
        let recipe = sample();
        assert_eq!(recipe.package.name, "hello");
        assert_eq!(recipe.package.depends_on, vec!["gettext"]);
        assert_eq!(recipe.options.len(), 2);
        assert_eq!(recipe.build.configure, "./configure");
        assert_eq!(recipe.build.make, vec!["make"]);
        assert_eq!(recipe.build.install, vec!["make", "install"]);
        assert_eq!(recipe.modules.flag, "--with-module");
        assert_eq!(recipe.modules.argument, "--add-module");
        assert!(recipe.service.is_none());
    }

    #[test]
    fn test_variable_substitution() {
        let recipe = sample();
        let layout = InstallLayout::new(Path::new("/usr/local"), "hello", "2.12").unwrap();
        assert_eq!(
            recipe.substitute("--prefix=%(prefix)s", &layout),
            "--prefix=/usr/local/Cellar/hello/2.12"
        );
        assert_eq!(
            recipe.substitute("--docdir=%(docs)s", &layout),
            "--docdir=/srv/docs"
        );
        assert_eq!(recipe.substitute("%(unknown)s", &layout), "%(unknown)s");
    }

    #[test]
    fn test_variant_versions() {
        let recipe = sample();
        assert_eq!(recipe.version_for(Variant::Stable).unwrap(), "2.12");
        assert_eq!(recipe.version_for(Variant::Head).unwrap(), "HEAD");
        assert!(recipe.version_for(Variant::Devel).is_err());
        assert!(recipe.variant(Variant::Head).unwrap().checksum.is_none());
    }

    #[test]
    fn test_configure_entrypoint() {
        let recipe = sample();
        assert_eq!(recipe.configure_entrypoint(Variant::Stable), "./configure");
        assert_eq!(recipe.configure_entrypoint(Variant::Devel), "./configure");
        assert_eq!(recipe.configure_entrypoint(Variant::Head), "./bootstrap");
    }

    #[test]
    fn test_option_variant_gating() {
        let recipe = sample();
        let nls = recipe.option("with-nls").unwrap();
        assert!(nls.applies_to(Variant::Stable));
        assert!(nls.applies_to(Variant::Head));
        assert_eq!(nls.flag_literal(), "--with-nls");

        let color = recipe.option("with-color").unwrap();
        assert!(!color.applies_to(Variant::Stable));
        assert!(color.applies_to(Variant::Head));
    }

    #[test]
    fn test_variant_display() {
        assert_eq!(Variant::Stable.to_string(), "stable");
        assert_eq!(Variant::Devel.as_str(), "devel");
        assert_eq!(Variant::Head.as_str(), "head");
        assert_eq!(Variant::default(), Variant::Stable);
    }
}
