//! Runtime values shared by the SQL and in-memory backends.

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::registry::FieldType;

/// Layout for `DateTime` literals.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Layout for `Time` literals.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A typed value: a bound SQL argument, or a field read from a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing / NULL.
    Null,
    /// Text.
    String(String),
    /// 64-bit integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// Date and time without timezone.
    DateTime(NaiveDateTime),
    /// Time of day.
    Time(NaiveTime),
}

impl Value {
    /// Returns the zero sentinel that `Null` is coerced to for a field type.
    pub fn zero(field_type: FieldType) -> Value {
        match field_type {
            FieldType::String => Value::String(String::new()),
            FieldType::Int => Value::Int(0),
            FieldType::Bool => Value::Bool(false),
            FieldType::DateTime => Value::DateTime(
                NaiveDate::from_ymd_opt(1970, 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .unwrap_or_default(),
            ),
            FieldType::Time => Value::Time(NaiveTime::MIN),
        }
    }

    /// Returns the field type this value belongs to, or `None` for `Null`.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::Null => None,
            Value::String(_) => Some(FieldType::String),
            Value::Int(_) => Some(FieldType::Int),
            Value::Bool(_) => Some(FieldType::Bool),
            Value::DateTime(_) => Some(FieldType::DateTime),
            Value::Time(_) => Some(FieldType::Time),
        }
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the text of a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Total order used for sorting.
    ///
    /// Values of the same type compare natively; `Null` sorts first; values
    /// of different types compare by type so the order stays total.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Time(a), Value::Time(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::String(_) => 3,
            Value::DateTime(_) => 4,
            Value::Time(_) => 5,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Time(t) => write!(f, "{}", t.format(TIME_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinels() {
        assert_eq!(Value::zero(FieldType::String), Value::String(String::new()));
        assert_eq!(Value::zero(FieldType::Int), Value::Int(0));
        assert_eq!(Value::zero(FieldType::Bool), Value::Bool(false));
        assert_eq!(
            Value::zero(FieldType::Time),
            Value::Time(NaiveTime::from_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(
            Value::zero(FieldType::DateTime).to_string(),
            "1970-01-01 00:00:00"
        );
    }

    #[test]
    fn test_compare_same_type() {
        assert_eq!(Value::Int(1).compare(&Value::Int(2)), Ordering::Less);
        assert_eq!(Value::from("b").compare(&Value::from("a")), Ordering::Greater);
        assert_eq!(Value::Bool(false).compare(&Value::Bool(true)), Ordering::Less);
    }

    #[test]
    fn test_compare_null_sorts_first() {
        assert_eq!(Value::Null.compare(&Value::Int(-5)), Ordering::Less);
        assert_eq!(Value::from("").compare(&Value::Null), Ordering::Greater);
        assert_eq!(Value::Null.compare(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(3i64)), Value::Int(3));
    }

    #[test]
    fn test_serialize_untagged() {
        let values = vec![Value::Int(1), Value::from("x"), Value::Null, Value::Bool(true)];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[1,"x",null,true]"#
        );
    }
}
