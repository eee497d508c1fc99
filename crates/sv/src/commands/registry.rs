//! Registry command implementation and registry file resolution.
//!
//! The registry file is taken from `--registry`, then `SIEVE_REGISTRY`, then
//! `<config dir>/sv/registry.toml`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sieve_rs::FieldRegistry;

use crate::output::{format_registry_json, format_registry_table};

use super::{CommandContext, CommandError, Result};

/// Registry file name inside the config directory.
const REGISTRY_FILE: &str = "registry.toml";

/// Resolves the registry file path.
///
/// `explicit` is the `--registry` flag, which clap already fills from
/// `SIEVE_REGISTRY` when the flag is absent.
pub fn registry_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    ProjectDirs::from("", "", "sv")
        .map(|dirs| dirs.config_dir().join(REGISTRY_FILE))
        .ok_or_else(|| CommandError::Config("could not determine config directory".to_string()))
}

/// Loads the registry from `path`.
pub fn load_registry(path: &Path) -> Result<FieldRegistry> {
    if !path.exists() {
        return Err(CommandError::Config(format!(
            "registry file not found: {} (use --registry or SIEVE_REGISTRY)",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), "loading field registry");
    let registry = FieldRegistry::load(path)?;
    tracing::debug!(
        fields = registry.fields().count(),
        order_fields = registry.order_fields().count(),
        "loaded field registry"
    );
    Ok(registry)
}

/// Prints the loaded registry.
pub fn execute(ctx: &CommandContext, path: &Path, registry: &FieldRegistry) -> Result<()> {
    if ctx.json_output {
        let output = format_registry_json(path, registry)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_registry_table(path, registry, ctx.use_colors);
        print!("{output}");
    }
    Ok(())
}
