// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe path or built-in name
fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .required(true)
        .help("Recipe file path or built-in recipe name")
}

/// Common argument: installation root
fn root_arg() -> Arg {
    Arg::new("root")
        .short('r')
        .long("root")
        .value_name("DIR")
        .help("Installation root (default from config, else /usr/local)")
}

fn variant_args() -> [Arg; 2] {
    [
        Arg::new("devel")
            .long("devel")
            .action(ArgAction::SetTrue)
            .conflicts_with("head")
            .help("Use the development variant"),
        Arg::new("head")
            .long("HEAD")
            .action(ArgAction::SetTrue)
            .help("Use the head (live checkout) variant"),
    ]
}

/// Trailing recipe flags
fn flags_arg() -> Arg {
    Arg::new("flags")
        .num_args(0..)
        .trailing_var_arg(true)
        .allow_hyphen_values(true)
        .help("Recipe flags, e.g. --with-debug --with-module=/path/to/module")
}

fn build_cli() -> Command {
    Command::new("kettle")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Kettle Contributors")
        .about("Cook unpacked source trees into installed, supervised software")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Configuration file (default: $KETTLE_CONFIG, then user and system config)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("install")
                .about("Configure, build and install a recipe from an unpacked source tree")
                .arg(recipe_arg())
                .arg(
                    Arg::new("source")
                        .short('s')
                        .long("source")
                        .required(true)
                        .value_name("DIR")
                        .help("Unpacked source directory"),
                )
                .arg(root_arg())
                .args(variant_args())
                .arg(
                    Arg::new("no_service")
                        .long("no-service")
                        .action(ArgAction::SetTrue)
                        .help("Do not write the service descriptor into the prefix"),
                )
                .arg(flags_arg()),
        )
        .subcommand(
            Command::new("options")
                .about("List the options a recipe offers for a variant")
                .arg(recipe_arg())
                .args(variant_args()),
        )
        .subcommand(
            Command::new("args")
                .about("Print the configure arguments an install would use")
                .arg(recipe_arg())
                .arg(root_arg())
                .args(variant_args())
                .arg(flags_arg()),
        )
        .subcommand(
            Command::new("service")
                .about("Print the service descriptor for an install")
                .arg(recipe_arg())
                .arg(root_arg())
                .args(variant_args())
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_parser(["launchd", "systemd", "json"])
                        .help("Output format (default from config, else launchd)"),
                ),
        )
        .subcommand(
            Command::new("caveats")
                .about("Print post-install guidance")
                .arg(recipe_arg())
                .arg(root_arg())
                .args(variant_args()),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a recipe for errors and warnings")
                .arg(recipe_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell to generate completions for"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("kettle.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
