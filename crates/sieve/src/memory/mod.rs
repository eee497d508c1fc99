//! In-memory backend.
//!
//! Evaluates filters, sorts and paginates plain Rust collections. Records are
//! read through a caller-supplied [`FieldAccessor`], so any record type works
//! without reflection; [`JsonAccessor`] covers `serde_json::Value` objects.
//!
//! # Example
//!
//! ```
//! use sieve_rs::filter::{parse_order_by, FilterParser};
//! use sieve_rs::memory::{JsonAccessor, Query};
//! use sieve_rs::registry::{FieldDescriptor, FieldRegistry, FieldType};
//! use serde_json::json;
//!
//! let registry = FieldRegistry::new()
//!     .with_sortable_field("age", FieldDescriptor::new("age", FieldType::Int));
//! let records = vec![json!({"age": 10}), json!({"age": 35}), json!({"age": 40})];
//!
//! let query = Query::new()
//!     .filter(FilterParser::parse("age > 30").unwrap())
//!     .orders(parse_order_by("-age").unwrap())
//!     .with_total(true);
//! let page = query.run(records, &registry, &JsonAccessor::new(&registry)).unwrap();
//!
//! assert_eq!(page.records, vec![json!({"age": 40}), json!({"age": 35})]);
//! assert_eq!(page.total, Some(2));
//! ```

mod accessor;
mod evaluator;
mod paginate;
mod query;
mod sorter;

pub use accessor::{FieldAccessor, JsonAccessor};
pub use evaluator::{evaluate, FilterEvaluator};
pub use paginate::{paginate, paginate_vec};
pub use query::{query_records, Page, Query};
pub use sorter::sort_records;
