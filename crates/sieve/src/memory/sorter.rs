//! Multi-key sorting of in-memory records.

use std::cmp::Ordering;

use crate::filter::{Direction, FilterResult, OrderInstruction};
use crate::registry::FieldRegistry;
use crate::value::Value;

use super::accessor::FieldAccessor;

/// Sorts records by the given instructions, in priority order.
///
/// Each key is read once per record. Later keys only break ties of earlier
/// ones; `Desc` inverts a key's comparison. The sort is stable.
///
/// # Errors
///
/// Returns `FilterError::UnknownOrderColumn` for a field missing from the
/// order registry, checked before any record is read, or the first accessor
/// error.
pub fn sort_records<T, A>(
    records: Vec<T>,
    orders: &[OrderInstruction],
    registry: &FieldRegistry,
    accessor: &A,
) -> FilterResult<Vec<T>>
where
    A: FieldAccessor<T> + ?Sized,
{
    for order in orders {
        registry.order_field(&order.column)?;
    }
    if orders.is_empty() || records.len() < 2 {
        return Ok(records);
    }

    let mut keyed = records
        .into_iter()
        .map(|record| -> FilterResult<(Vec<Value>, T)> {
            let keys = orders
                .iter()
                .map(|order| accessor.get(&record, &order.column))
                .collect::<FilterResult<Vec<Value>>>()?;
            Ok((keys, record))
        })
        .collect::<FilterResult<Vec<_>>>()?;

    keyed.sort_by(|(left, _), (right, _)| compare_keys(orders, left, right));

    tracing::trace!(records = keyed.len(), keys = orders.len(), "sorted records");
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

fn compare_keys(orders: &[OrderInstruction], left: &[Value], right: &[Value]) -> Ordering {
    orders
        .iter()
        .zip(left.iter().zip(right))
        .map(|(order, (l, r))| match order.direction {
            Direction::Asc => l.compare(r),
            Direction::Desc => r.compare(l),
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
