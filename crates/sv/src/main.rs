use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::query::QueryOptions;
use commands::registry::{load_registry, registry_path};
use commands::{CommandContext, CommandError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                let rendered = serde_json::to_string_pretty(&error_json)
                    .unwrap_or_else(|_| error_json.to_string());
                eprintln!("{rendered}");
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins; otherwise `--verbose` shows debug events and `--quiet`
/// keeps only errors.
fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    match &cli.command {
        Some(Commands::Check { filter, sorters }) => {
            commands::check::execute(&ctx, filter, sorters.as_deref())
        }
        Some(Commands::Compile { filter, sorters }) => {
            let path = registry_path(cli.registry.as_deref())?;
            let registry = load_registry(&path)?;
            commands::compile::execute(&ctx, &registry, filter, sorters.as_deref())
        }
        Some(Commands::Query {
            filter,
            sorters,
            input,
            offset,
            limit,
            count,
        }) => {
            let path = registry_path(cli.registry.as_deref())?;
            let registry = load_registry(&path)?;
            let opts = QueryOptions {
                filter: filter.clone(),
                sorters: sorters.clone(),
                input: input.clone(),
                offset: *offset,
                limit: *limit,
                count: *count,
            };
            commands::query::execute(&ctx, &registry, &opts)
        }
        Some(Commands::Registry) => {
            let path = registry_path(cli.registry.as_deref())?;
            let registry = load_registry(&path)?;
            commands::registry::execute(&ctx, &path, &registry)
        }
        Some(Commands::Completions { shell }) => {
            commands::completions::execute(shell).map_err(CommandError::Io)
        }
        None => {
            if !ctx.quiet {
                println!("sv - filter expression tool");
                println!("Use --help for usage information");
            }
            Ok(())
        }
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Filter(filter_error) => filter_error.kind(),
        CommandError::Registry(_) => "REGISTRY_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Json(_) => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Registry(sieve_rs::RegistryError::Read { .. }) => ExitCode::from(3),
        CommandError::Registry(_) => ExitCode::from(5),
        CommandError::Config(_) => ExitCode::from(5),
    }
}
