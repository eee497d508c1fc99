//! Subcommand handlers for `sv`.
//!
//! Each submodule runs one subcommand against a loaded registry and prints
//! through [`crate::output`]. Failures are collected into [`CommandError`].

pub mod check;
pub mod compile;
pub mod completions;
pub mod query;
pub mod registry;

use sieve_rs::{FilterError, RegistryError};

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter or order-by error.
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Registry file could not be loaded.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}
