//! Order-by parsing.
//!
//! Order strings are a comma-separated list of logical field names, each
//! optionally prefixed with `-` (descending) or `+` (ascending), e.g.
//! `-created_at,name`. Earlier entries take priority.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{FilterError, FilterResult};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending (the default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Returns the SQL keyword.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderInstruction {
    /// Logical field name, resolved through the order registry.
    pub column: String,
    /// Sort direction.
    pub direction: Direction,
}

impl OrderInstruction {
    /// Creates an ascending instruction.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    /// Creates a descending instruction.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

impl fmt::Display for OrderInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Asc => f.write_str(&self.column),
            Direction::Desc => write!(f, "-{}", self.column),
        }
    }
}

/// Parses an order-by string into sort instructions.
///
/// Empty input and empty segments produce no instructions.
///
/// # Errors
///
/// Returns `FilterError::Syntax` when a segment is a bare `-` or `+`, or
/// when a field name contains whitespace.
///
/// # Example
///
/// ```
/// use sieve_rs::filter::{parse_order_by, Direction};
///
/// let orders = parse_order_by("-created_at,name").unwrap();
/// assert_eq!(orders[0].column, "created_at");
/// assert_eq!(orders[0].direction, Direction::Desc);
/// assert_eq!(orders[1].direction, Direction::Asc);
/// ```
pub fn parse_order_by(input: &str) -> FilterResult<Vec<OrderInstruction>> {
    let mut orders = Vec::new();

    for segment in input.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (direction, column) = if let Some(rest) = segment.strip_prefix('-') {
            (Direction::Desc, rest.trim_start())
        } else if let Some(rest) = segment.strip_prefix('+') {
            (Direction::Asc, rest.trim_start())
        } else {
            (Direction::Asc, segment)
        };

        if column.is_empty() {
            return Err(FilterError::syntax(format!(
                "missing field name in order segment '{}'",
                segment
            )));
        }
        if column.contains(char::is_whitespace) {
            return Err(FilterError::syntax(format!(
                "invalid field name in order segment '{}'",
                segment
            )));
        }

        orders.push(OrderInstruction {
            column: column.to_string(),
            direction,
        });
    }

    Ok(orders)
}
