//! Evaluates filters against in-memory records.

use std::cmp::Ordering;

use crate::filter::{Connective, Filter, FilterError, FilterResult};
use crate::predicate::{self, Predicate, Resolved, ResolvedCondition};
use crate::registry::{FieldRegistry, FieldType};
use crate::value::Value;

use super::accessor::FieldAccessor;

/// A filter resolved against a registry, ready to test records.
///
/// Field names, operators and values are checked once in [`new`](Self::new),
/// so a bad filter fails even when there are no records to test.
///
/// Sibling expressions fold strictly left to right: `a or b and c` is
/// `(a or b) and c`. Every sibling is evaluated, so an accessor error on a
/// later condition is reported even when the result is already decided.
#[derive(Debug, Clone)]
pub struct FilterEvaluator<'a> {
    resolved: Vec<Resolved<'a>>,
}

impl<'a> FilterEvaluator<'a> {
    /// Resolves `filter` against `registry`.
    pub fn new(filter: &'a Filter, registry: &'a FieldRegistry) -> FilterResult<Self> {
        Ok(Self {
            resolved: predicate::resolve(filter, registry)?,
        })
    }

    /// Returns whether a record matches.
    pub fn matches<T, A>(&self, record: &T, accessor: &A) -> FilterResult<bool>
    where
        T: ?Sized,
        A: FieldAccessor<T> + ?Sized,
    {
        eval_chain(&self.resolved, record, accessor)
    }

    /// Keeps the matching records, in their original order.
    ///
    /// The first error aborts the whole pass.
    pub fn filter_records<T, A>(&self, records: Vec<T>, accessor: &A) -> FilterResult<Vec<T>>
    where
        A: FieldAccessor<T> + ?Sized,
    {
        let before = records.len();
        let mut kept = Vec::with_capacity(before);
        for record in records {
            if self.matches(&record, accessor)? {
                kept.push(record);
            }
        }
        tracing::debug!(before, after = kept.len(), "filtered records");
        Ok(kept)
    }
}

/// Evaluates a filter against a single record.
pub fn evaluate<T, A>(
    filter: &Filter,
    record: &T,
    registry: &FieldRegistry,
    accessor: &A,
) -> FilterResult<bool>
where
    T: ?Sized,
    A: FieldAccessor<T> + ?Sized,
{
    FilterEvaluator::new(filter, registry)?.matches(record, accessor)
}

fn eval_chain<T, A>(chain: &[Resolved<'_>], record: &T, accessor: &A) -> FilterResult<bool>
where
    T: ?Sized,
    A: FieldAccessor<T> + ?Sized,
{
    let mut result: Option<bool> = None;
    let mut pending: Option<Connective> = None;

    for item in chain {
        let value = match item {
            Resolved::Connective(connective) => {
                pending = Some(*connective);
                continue;
            }
            Resolved::Test(condition) => eval_condition(condition, record, accessor)?,
            Resolved::Group(inner) => eval_chain(inner, record, accessor)?,
        };
        result = Some(match (result, pending.take()) {
            (Some(left), Some(connective)) => connective.apply(left, value),
            (Some(left), None) => left && value,
            (None, _) => value,
        });
    }

    Ok(result.unwrap_or(true))
}

fn eval_condition<T, A>(
    condition: &ResolvedCondition<'_>,
    record: &T,
    accessor: &A,
) -> FilterResult<bool>
where
    T: ?Sized,
    A: FieldAccessor<T> + ?Sized,
{
    let field_type = condition.descriptor.field_type;
    let value = coerce(
        condition.field,
        field_type,
        accessor.get(record, condition.field)?,
    )?;

    let matched = match &condition.predicate {
        Predicate::Compare { op, value: expected } => op.holds(value.compare(expected)),
        Predicate::Range { low, high } => {
            value.compare(low) != Ordering::Less && value.compare(high) != Ordering::Greater
        }
        Predicate::Like { pattern, needle } => predicate::like_matches(
            &pattern.like_argument(needle),
            value.as_str().unwrap_or_default(),
        ),
        Predicate::Absent => value == Value::zero(field_type),
        Predicate::Present => value != Value::zero(field_type),
        Predicate::InList { values, negated } => values.contains(&value) != *negated,
        Predicate::Raw { values, .. } => values.contains(&value),
    };

    Ok(matched)
}

/// Replaces `Null` with the zero value and rejects values of another type.
fn coerce(field: &str, field_type: FieldType, value: Value) -> FilterResult<Value> {
    match value {
        Value::Null => Ok(Value::zero(field_type)),
        value if value.field_type() == Some(field_type) => Ok(value),
        other => Err(FilterError::invalid_value(
            field,
            format!("expected a {} value, got {}", field_type, other),
        )),
    }
}
