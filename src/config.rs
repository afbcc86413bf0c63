// src/config.rs
//! Configuration file parsing for Kettle
//!
//! Supports TOML configuration files with the following sections:
//! - [install] - Installation root and parallel jobs
//! - [service] - Descriptor format and whether to write it
//! - [recipes] - Extra directories searched for recipe files
//!
//! Lookup order: an explicit path, `$KETTLE_CONFIG`, the user config
//! directory (`kettle/config.toml`), then `/etc/kettle/kettle.toml`.
//! When none exists the defaults apply.

use crate::error::{Error, Result};
use crate::recipe::KitchenConfig;
use crate::service::ServiceFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "KETTLE_CONFIG";

/// System-wide config file
pub const SYSTEM_CONFIG_PATH: &str = "/etc/kettle/kettle.toml";

/// Default installation root
pub const DEFAULT_ROOT: &str = "/usr/local";

/// TOML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KettleConfig {
    #[serde(default)]
    pub install: InstallSection,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub recipes: RecipesSection,
}

/// Installation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallSection {
    /// Root prefix every package installs under
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Parallel build jobs (0 = auto)
    #[serde(default)]
    pub jobs: u32,
}

impl Default for InstallSection {
    fn default() -> Self {
        Self {
            root: default_root(),
            jobs: 0,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}

/// Service descriptor settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    #[serde(default)]
    pub format: ServiceFormat,

    /// Write the descriptor into the install prefix after a cook
    #[serde(default = "default_true")]
    pub write: bool,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            format: ServiceFormat::default(),
            write: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Recipe lookup settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipesSection {
    /// Directories searched for `<name>.toml`, in order
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
}

impl KettleConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::IoError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content).map_err(|e| {
            Error::ParseError(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        Self::from_toml(content).map_err(|e| Error::ParseError(format!("Invalid config: {}", e)))
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: KettleConfig = toml::from_str(content)?;
        config.recipes.dirs = config.recipes.dirs.iter().map(|d| expand_home(d)).collect();
        Ok(config)
    }

    /// Build the Kitchen configuration from these settings
    pub fn kitchen_config(&self) -> KitchenConfig {
        let mut kitchen = KitchenConfig {
            service_format: self.service.format,
            write_descriptor: self.service.write,
            ..KitchenConfig::default()
        };
        if self.install.jobs > 0 {
            kitchen.jobs = self.install.jobs;
        }
        kitchen
    }
}

/// Locate and load the configuration
///
/// An explicit path must exist. Implicit locations are optional.
pub fn load_config(explicit: Option<&Path>) -> Result<KettleConfig> {
    if let Some(path) = explicit {
        return KettleConfig::load(path);
    }

    match find_config() {
        Some(path) => {
            debug!("Using config file {}", path.display());
            KettleConfig::load(&path)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(KettleConfig::default())
        }
    }
}

/// First existing config file in lookup order
fn find_config() -> Option<PathBuf> {
    let candidates = [
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        dirs::config_dir().map(|dir| dir.join("kettle").join("config.toml")),
        Some(PathBuf::from(SYSTEM_CONFIG_PATH)),
    ];

    candidates.into_iter().flatten().find(|path| path.is_file())
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
