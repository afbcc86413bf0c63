// src/main.rs

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use kettle::load_config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        return commands::cmd_completions(shell);
    }

    let config = load_config(cli.config.as_deref().map(Path::new))
        .context("Failed to load configuration")?;

    match command {
        Commands::Install {
            recipe,
            source,
            target,
            no_service,
            flags,
        } => commands::cmd_install(&recipe, &source, &target, no_service, &flags, &config),
        Commands::Options {
            recipe,
            devel,
            head,
        } => commands::cmd_options(&recipe, cli::variant_for(devel, head), &config),
        Commands::Args {
            recipe,
            target,
            flags,
        } => commands::cmd_args(&recipe, &target, &flags, &config),
        Commands::Service {
            recipe,
            target,
            format,
        } => commands::cmd_service(&recipe, &target, format.map(Into::into), &config),
        Commands::Caveats { recipe, target } => commands::cmd_caveats(&recipe, &target, &config),
        Commands::Validate { recipe } => commands::cmd_validate(&recipe, &config),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
