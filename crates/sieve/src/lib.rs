//! Filter and order expressions for list endpoints.
//!
//! Clients send a compact filter string such as
//! ``state eq `open` and (age > 30 or vip eq true)`` and an order string such
//! as `-created_at,name`. This crate parses both, checks them against a
//! [`FieldRegistry`] of exposed fields, and runs them either as a
//! parameterized SQL `WHERE`/`ORDER BY` ([`sql`]) or directly over in-memory
//! records ([`memory`]). Both backends share one operator table, so the same
//! filter selects the same records in either.

pub mod filter;
pub mod memory;
pub mod registry;
pub mod request;
pub mod sql;
pub mod value;

mod predicate;

pub use filter::{parse_order_by, Filter, FilterError, FilterParser, FilterResult, OrderInstruction};
pub use registry::{FieldDescriptor, FieldRegistry, FieldType, OrderField, RegistryError};
pub use request::{FilterRequest, ParsedRequest, RequestError};
pub use value::Value;
