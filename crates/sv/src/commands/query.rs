//! Query command implementation.
//!
//! Reads a JSON array of objects and prints the filtered, sorted page.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use serde_json::Value as JsonValue;
use sieve_rs::memory::{JsonAccessor, Page};
use sieve_rs::{FieldRegistry, FilterRequest};

use crate::output::format_page_json;

use super::{CommandContext, Result};

/// Options for the query command.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub filter: Option<String>,
    pub sorters: Option<String>,
    /// Input file, or `-` for stdin.
    pub input: PathBuf,
    pub offset: i64,
    pub limit: i64,
    pub count: bool,
}

impl QueryOptions {
    fn to_request(&self) -> FilterRequest {
        FilterRequest {
            filters: self.filter.clone(),
            sorters: self.sorters.clone(),
            offset: self.offset,
            limit: self.limit,
            count: self.count,
        }
    }
}

/// Reads records from a file or stdin.
pub fn read_records(input: &Path) -> Result<Vec<JsonValue>> {
    let contents = if input == Path::new("-") {
        io::read_to_string(io::stdin())?
    } else {
        fs::read_to_string(input)?
    };
    Ok(serde_json::from_str(&contents)?)
}

/// Runs the query over already-loaded records.
pub fn run_query(
    registry: &FieldRegistry,
    records: Vec<JsonValue>,
    opts: &QueryOptions,
) -> Result<Page<JsonValue>> {
    let query = opts.to_request().parse()?.into_query();
    Ok(query.run(records, registry, &JsonAccessor::new(registry))?)
}

/// Executes the query command.
pub fn execute(ctx: &CommandContext, registry: &FieldRegistry, opts: &QueryOptions) -> Result<()> {
    let records = read_records(&opts.input)?;
    let read = records.len();
    let page = run_query(registry, records, opts)?;

    if ctx.json_output {
        let output = format_page_json(&page)?;
        println!("{output}");
        return Ok(());
    }

    if !ctx.quiet {
        let output = serde_json::to_string_pretty(&page.records)?;
        println!("{output}");

        let mut summary = match page.total {
            Some(total) => format!("{} of {} matching", page.records.len(), total),
            None => format!("{} returned", page.records.len()),
        };
        if ctx.verbose {
            summary.push_str(&format!(" ({read} read)"));
        }
        if ctx.use_colors {
            eprintln!("{}", summary.dimmed());
        } else {
            eprintln!("{summary}");
        }
    }
    Ok(())
}
