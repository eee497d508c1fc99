//! Compile command implementation.

use sieve_rs::sql::{SqlCompiler, SqlQuery};
use sieve_rs::{parse_order_by, FieldRegistry, FilterParser};

use crate::output::{format_compile_json, format_compile_text};

use super::{CommandContext, Result};

/// Compiles a filter and order list to SQL.
pub fn compile(registry: &FieldRegistry, filter: &str, sorters: Option<&str>) -> Result<SqlQuery> {
    let parsed = FilterParser::parse(filter)?;
    let orders = parse_order_by(sorters.unwrap_or_default())?;
    Ok(SqlCompiler::new(registry).compile_query(parsed.as_ref(), &orders)?)
}

/// Compiles and prints the SQL fragments.
pub fn execute(
    ctx: &CommandContext,
    registry: &FieldRegistry,
    filter: &str,
    sorters: Option<&str>,
) -> Result<()> {
    let query = compile(registry, filter, sorters)?;

    if ctx.json_output {
        let output = format_compile_json(&query)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_compile_text(&query, ctx.use_colors);
        print!("{output}");
    }
    Ok(())
}
