// src/cli/mod.rs
//! CLI definitions for Kettle
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `install` - Cook a recipe from an unpacked source tree
//! - `options` - List the options a recipe offers
//! - `args` - Print the configure arguments an install would use
//! - `service` - Print the service descriptor
//! - `caveats` - Print post-install guidance
//! - `validate` - Check a recipe for errors
//! - `completions` - Generate shell completions

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use kettle::{ServiceFormat, Variant};

#[derive(Parser)]
#[command(name = "kettle")]
#[command(author = "Kettle Contributors")]
#[command(version)]
#[command(about = "Cook unpacked source trees into installed, supervised software", long_about = None)]
pub struct Cli {
    /// Configuration file (default: $KETTLE_CONFIG, then user and system config)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where and which variant to install
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Installation root (default from config, else /usr/local)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Use the development variant
    #[arg(long, conflicts_with = "head")]
    pub devel: bool,

    /// Use the head (live checkout) variant
    #[arg(long = "HEAD")]
    pub head: bool,
}

impl TargetArgs {
    pub fn variant(&self) -> Variant {
        variant_for(self.devel, self.head)
    }
}

/// Map the `--devel`/`--HEAD` switches to a variant
pub fn variant_for(devel: bool, head: bool) -> Variant {
    if head {
        Variant::Head
    } else if devel {
        Variant::Devel
    } else {
        Variant::Stable
    }
}

/// Descriptor output format
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FormatArg {
    Launchd,
    Systemd,
    Json,
}

impl From<FormatArg> for ServiceFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Launchd => ServiceFormat::Launchd,
            FormatArg::Systemd => ServiceFormat::Systemd,
            FormatArg::Json => ServiceFormat::Json,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure, build and install a recipe from an unpacked source tree
    Install {
        /// Recipe file path or built-in recipe name
        recipe: String,

        /// Unpacked source directory
        #[arg(short, long)]
        source: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Do not write the service descriptor into the prefix
        #[arg(long)]
        no_service: bool,

        /// Recipe flags, e.g. --with-debug --with-module=/path/to/module
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        flags: Vec<String>,
    },

    /// List the options a recipe offers for a variant
    Options {
        /// Recipe file path or built-in recipe name
        recipe: String,

        /// Use the development variant
        #[arg(long, conflicts_with = "head")]
        devel: bool,

        /// Use the head (live checkout) variant
        #[arg(long = "HEAD")]
        head: bool,
    },

    /// Print the configure arguments an install would use
    Args {
        /// Recipe file path or built-in recipe name
        recipe: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Recipe flags, e.g. --with-debug --with-module=/path/to/module
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        flags: Vec<String>,
    },

    /// Print the service descriptor for an install
    Service {
        /// Recipe file path or built-in recipe name
        recipe: String,

        #[command(flatten)]
        target: TargetArgs,

        /// Output format (default from config, else launchd)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Print post-install guidance
    Caveats {
        /// Recipe file path or built-in recipe name
        recipe: String,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Check a recipe for errors and warnings
    Validate {
        /// Recipe file path or built-in recipe name
        recipe: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
