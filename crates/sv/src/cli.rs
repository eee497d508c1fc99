//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the sv CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// sv - Parse, compile and run filter expressions
#[derive(Parser, Debug)]
#[command(name = "sv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Field registry file (default: <config dir>/sv/registry.toml)
    #[arg(long, global = true, env = "SIEVE_REGISTRY")]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a filter and order string and print the result
    Check {
        /// Filter expression (e.g., "age > 30 and name co `ada`")
        filter: String,

        /// Order-by list (e.g., "-age,name")
        #[arg(short, long, allow_hyphen_values = true)]
        sorters: Option<String>,
    },

    /// Compile a filter to a parameterized SQL WHERE clause
    Compile {
        /// Filter expression
        filter: String,

        /// Order-by list, compiled to ORDER BY
        #[arg(short, long, allow_hyphen_values = true)]
        sorters: Option<String>,
    },

    /// Filter, sort and paginate a JSON array of records
    #[command(alias = "q")]
    Query {
        /// Filter expression (default: match everything)
        filter: Option<String>,

        /// Order-by list
        #[arg(short, long, allow_hyphen_values = true)]
        sorters: Option<String>,

        /// JSON input file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Number of matching records to skip
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,

        /// Page size (0 = no limit)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        limit: i64,

        /// Include the total match count
        #[arg(long)]
        count: bool,
    },

    /// Show the loaded field registry
    Registry,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
