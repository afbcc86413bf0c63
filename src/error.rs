// src/error.rs

//! Error types for the Kettle library
//!
//! Every error is terminal for the current cook: nothing is retried
//! internally. Messages are written for the operator and say what to fix.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, planning or cooking a recipe
#[derive(Debug, Error)]
pub enum Error {
    /// A `--with-module=` flag that does not split into flag and path
    #[error("Unable to parse option {0}: expected --with-module=<path>")]
    MalformedOption(String),

    /// An external module path that is not an existing directory
    #[error("Unable to locate module in directory {}", .0.display())]
    ModuleNotFound(PathBuf),

    /// A helper tool needed by an enabled option is missing or misconfigured
    #[error("Unable to install with {option} support. {hint}")]
    DependencyUnavailable { option: String, hint: String },

    /// A build subprocess could not be started or exited unsuccessfully
    #[error("{program} failed: {reason}")]
    ProcessError { program: String, reason: String },

    /// A filesystem operation failed
    #[error("I/O error: {0}")]
    IoError(String),

    /// Recipe or configuration could not be parsed or is invalid
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No recipe file or built-in recipe by that name
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    /// A path that cannot be used where it was supplied
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Service descriptor serialisation failed
    #[error("Failed to render service descriptor: {0}")]
    Render(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IoError(e.to_string())
    }
}

/// Result type for Kettle operations
pub type Result<T> = std::result::Result<T, Error>;
