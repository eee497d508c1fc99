//! Filter and SQL output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sieve_rs::filter::{Expression, Filter, Operand};
use sieve_rs::memory::Page;
use sieve_rs::sql::SqlQuery;
use sieve_rs::OrderInstruction;

/// JSON output structure for the check command.
#[derive(Serialize)]
pub struct CheckOutput<'a> {
    /// Canonical rendering of the filter, `None` for an empty filter.
    pub filter: Option<String>,
    pub conditions: Vec<ConditionOutput<'a>>,
    pub orders: &'a [OrderInstruction],
}

/// JSON output structure for a single condition.
#[derive(Serialize)]
pub struct ConditionOutput<'a> {
    pub column: &'a str,
    pub operator: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Formats a parsed filter and order list as JSON.
pub fn format_check_json(
    filter: Option<&Filter>,
    orders: &[OrderInstruction],
) -> Result<String, serde_json::Error> {
    let conditions = filter
        .map(|f| {
            f.conditions()
                .into_iter()
                .map(|c| ConditionOutput {
                    column: &c.column,
                    operator: c.operator.as_str(),
                    value: c.value.as_ref().map(Operand::to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    let output = CheckOutput {
        filter: filter.map(Filter::to_string),
        conditions,
        orders,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a parsed filter as an indented tree, followed by the order list.
pub fn format_check_text(
    filter: Option<&Filter>,
    orders: &[OrderInstruction],
    use_colors: bool,
) -> String {
    let mut output = String::new();

    match filter {
        Some(filter) => {
            output.push_str(&format!("{} {}\n", label("Filter:", use_colors), filter));
            write_tree(&mut output, filter.expressions(), 1, use_colors);
        }
        None => output.push_str(&format!("{} (none)\n", label("Filter:", use_colors))),
    }

    if orders.is_empty() {
        output.push_str(&format!("{} (none)\n", label("Order:", use_colors)));
    } else {
        output.push_str(&format!("{}\n", label("Order:", use_colors)));
        for (i, order) in orders.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} {}\n",
                i + 1,
                order.column,
                order.direction.as_sql()
            ));
        }
    }

    output
}

fn write_tree(output: &mut String, expressions: &[Expression], depth: usize, use_colors: bool) {
    let indent = "  ".repeat(depth);
    for expression in expressions {
        match expression {
            Expression::Condition(condition) => {
                output.push_str(&format!("{indent}{condition}\n"));
            }
            Expression::Connective(_) => {
                let word = expression.to_string();
                if use_colors {
                    output.push_str(&format!("{indent}{}\n", word.cyan()));
                } else {
                    output.push_str(&format!("{indent}{word}\n"));
                }
            }
            Expression::Group(inner) => {
                output.push_str(&format!("{indent}(\n"));
                write_tree(output, inner, depth + 1, use_colors);
                output.push_str(&format!("{indent})\n"));
            }
        }
    }
}

/// Formats compiled SQL as JSON.
pub fn format_compile_json(query: &SqlQuery) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(query)
}

/// Formats compiled SQL for reading.
pub fn format_compile_text(query: &SqlQuery, use_colors: bool) -> String {
    let mut output = String::new();

    let where_clause = query.where_clause.as_deref().unwrap_or("(none)");
    output.push_str(&format!("{} {}\n", label("WHERE:   ", use_colors), where_clause));

    let args: Vec<String> = query.args.iter().map(ToString::to_string).collect();
    output.push_str(&format!(
        "{} [{}]\n",
        label("Args:    ", use_colors),
        args.join(", ")
    ));

    if query.joins.is_empty() {
        output.push_str(&format!("{} (none)\n", label("Joins:   ", use_colors)));
    } else {
        output.push_str(&format!("{}\n", label("Joins:   ", use_colors)));
        for join in &query.joins {
            output.push_str(&format!("  {join}\n"));
        }
    }

    let order_by = query.order_by.as_deref().unwrap_or("(none)");
    output.push_str(&format!("{} {}\n", label("ORDER BY:", use_colors), order_by));

    output
}

/// Formats a query page as JSON.
pub fn format_page_json(page: &Page<JsonValue>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(page)
}

fn label(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}
