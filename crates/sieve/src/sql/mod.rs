//! SQL backend.
//!
//! Compiles a parsed [`Filter`](crate::filter::Filter) into a `WHERE`
//! fragment with positional `?` arguments, and order instructions into an
//! `ORDER BY` list. Joins declared on the referenced registry fields are
//! collected so callers can splice them into their `FROM` clause.
//!
//! The `and`/`or` chain is emitted as written. SQL gives `AND` precedence
//! over `OR`, while the in-memory evaluator folds left to right, so mixed
//! chains should be parenthesized when both backends must agree.
//!
//! `NULL` columns also differ. The in-memory evaluator reads a missing value
//! as the field type's zero value, but in SQL `NULL = ''`, `NULL IN (...)`
//! and `NULL NOT IN (...)` are never true. Only `pt` and `np` test for
//! `NULL` explicitly, so an `eq` against the empty string or any `nin` list
//! skips `NULL` rows here while matching them in memory.

mod compiler;

pub use compiler::{compile, SqlCompiler, SqlFilter, SqlOrder, SqlQuery};

#[cfg(test)]
mod tests;
