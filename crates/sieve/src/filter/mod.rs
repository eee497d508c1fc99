//! Filter expression lexer, parser and order-by parser.
//!
//! This module turns the textual filter grammar into an AST and the order-by
//! string into sort instructions. It knows nothing about fields or storage;
//! the backends resolve names through a [`FieldRegistry`](crate::FieldRegistry).
//!
//! # Supported Syntax
//!
//! ## Conditions
//! - `field co value` - contains
//! - `field eq value` / `field = value` - equals
//! - `field sw value` / `field ew value` - starts / ends with
//! - `field pt` / `field np` - absent or empty / present and non-empty
//! - `field in [a, b]` / `field nin [a, b]` - list membership
//! - `field > value`, `<`, `>=`, `<=` - comparisons
//!
//! ## Values
//! - `` `quoted literal` `` - required for strings and for anything with spaces
//! - `42`, `true` - bare words
//! - `[v1, v2]` - lists
//!
//! ## Boolean Operators
//! - `and`, `or` - no precedence between them, folded left to right
//! - `()` - grouping
//!
//! # Example
//!
//! ```
//! use sieve_rs::filter::{parse_order_by, FilterParser};
//!
//! let filter = FilterParser::parse("state eq `open` and (age > 30 or vip eq true)")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(filter.conditions().len(), 3);
//!
//! let orders = parse_order_by("-created_at,name").unwrap();
//! assert_eq!(orders.len(), 2);
//! ```

mod ast;
mod error;
mod lexer;
mod order;
mod parser;

pub use ast::{Condition, Connective, Expression, Filter, Literal, Operand, Operator};
pub use error::{FilterError, FilterResult};
pub use lexer::{check_balance, FilterToken, Lexer, PositionedToken};
pub use order::{parse_order_by, Direction, OrderInstruction};
pub use parser::FilterParser;

#[cfg(test)]
mod tests;
