//! Check command implementation.
//!
//! Parses a filter and an order-by string without touching the registry.

use sieve_rs::{parse_order_by, FilterParser};

use crate::output::{format_check_json, format_check_text};

use super::{CommandContext, Result};

/// Parses and prints the filter and order list.
pub fn execute(ctx: &CommandContext, filter: &str, sorters: Option<&str>) -> Result<()> {
    let parsed = FilterParser::parse(filter)?;
    let orders = parse_order_by(sorters.unwrap_or_default())?;

    if ctx.json_output {
        let output = format_check_json(parsed.as_ref(), &orders)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_check_text(parsed.as_ref(), &orders, ctx.use_colors);
        print!("{output}");
    }
    Ok(())
}
