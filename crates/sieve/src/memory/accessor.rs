//! Field access for in-memory records.

use chrono::{NaiveDateTime, NaiveTime};
use serde_json::Value as JsonValue;

use crate::filter::{FilterError, FilterResult};
use crate::registry::{FieldRegistry, FieldType};
use crate::value::{Value, DATETIME_FORMAT, TIME_FORMAT};

/// Reads a logical field from a record.
///
/// Return `Value::Null` for a missing value; the evaluator coerces it to the
/// field type's zero value. Any closure `Fn(&T, &str) -> FilterResult<Value>`
/// is an accessor.
///
/// # Example
///
/// ```
/// use sieve_rs::memory::FieldAccessor;
/// use sieve_rs::{FilterError, FilterResult, Value};
///
/// struct User {
///     age: i64,
/// }
///
/// let accessor = |user: &User, field: &str| -> FilterResult<Value> {
///     match field {
///         "age" => Ok(Value::Int(user.age)),
///         other => Err(FilterError::unknown_column(other, None)),
///     }
/// };
/// assert_eq!(accessor.get(&User { age: 7 }, "age").unwrap(), Value::Int(7));
/// ```
pub trait FieldAccessor<T: ?Sized> {
    fn get(&self, record: &T, field: &str) -> FilterResult<Value>;
}

impl<T: ?Sized, F> FieldAccessor<T> for F
where
    F: Fn(&T, &str) -> FilterResult<Value>,
{
    fn get(&self, record: &T, field: &str) -> FilterResult<Value> {
        self(record, field)
    }
}

/// Reads fields from JSON objects keyed by logical field name.
///
/// Values are converted using the registry's declared type. Fields that are
/// only sortable have no declared type, so their JSON scalar type is used.
#[derive(Debug, Clone, Copy)]
pub struct JsonAccessor<'r> {
    registry: &'r FieldRegistry,
}

impl<'r> JsonAccessor<'r> {
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self { registry }
    }
}

impl FieldAccessor<JsonValue> for JsonAccessor<'_> {
    fn get(&self, record: &JsonValue, field: &str) -> FilterResult<Value> {
        let object = record
            .as_object()
            .ok_or_else(|| FilterError::invalid_value(field, "record is not a JSON object"))?;

        let raw = match object.get(field) {
            None | Some(JsonValue::Null) => return Ok(Value::Null),
            Some(raw) => raw,
        };

        match self.registry.field_type(field) {
            Some(field_type) => convert(field, field_type, raw),
            None => infer(field, raw),
        }
    }
}

fn convert(field: &str, field_type: FieldType, raw: &JsonValue) -> FilterResult<Value> {
    let converted = match (field_type, raw) {
        (FieldType::String, JsonValue::String(s)) => Some(Value::String(s.clone())),
        (FieldType::Int, JsonValue::Number(n)) => n.as_i64().map(Value::Int),
        (FieldType::Bool, JsonValue::Bool(b)) => Some(Value::Bool(*b)),
        (FieldType::DateTime, JsonValue::String(s)) => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
            .ok()
            .map(Value::DateTime),
        (FieldType::Time, JsonValue::String(s)) => {
            NaiveTime::parse_from_str(s, TIME_FORMAT).ok().map(Value::Time)
        }
        _ => None,
    };

    converted.ok_or_else(|| {
        FilterError::invalid_value(field, format!("expected a {} value, got {}", field_type, raw))
    })
}

fn infer(field: &str, raw: &JsonValue) -> FilterResult<Value> {
    match raw {
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => n.as_i64().map(Value::Int).ok_or_else(|| {
            FilterError::invalid_value(field, format!("{} is not a 64-bit integer", n))
        }),
        other => Err(FilterError::invalid_value(
            field,
            format!("cannot compare {}", other),
        )),
    }
}
