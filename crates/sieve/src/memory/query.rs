//! Filter, sort and paginate in one call.

use serde::Serialize;

use crate::filter::{Filter, FilterResult, OrderInstruction};
use crate::registry::FieldRegistry;

use super::accessor::FieldAccessor;
use super::evaluator::FilterEvaluator;
use super::paginate::paginate_vec;
use super::sorter::sort_records;

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub records: Vec<T>,
    /// Number of matches before pagination, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

/// What to select from a record list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Filter>,
    pub orders: Vec<OrderInstruction>,
    pub offset: i64,
    /// Page size; zero or less returns everything from `offset`.
    pub limit: i64,
    /// Count matches before paginating.
    pub with_total: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<Option<Filter>>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn orders(mut self, orders: Vec<OrderInstruction>) -> Self {
        self.orders = orders;
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_total(mut self, with_total: bool) -> Self {
        self.with_total = with_total;
        self
    }

    /// Runs the query over `records`.
    ///
    /// Order: filter, count, sort, paginate. The filter and order fields are
    /// checked against the registry even when `records` is empty.
    pub fn run<T, A>(
        &self,
        records: Vec<T>,
        registry: &FieldRegistry,
        accessor: &A,
    ) -> FilterResult<Page<T>>
    where
        A: FieldAccessor<T> + ?Sized,
    {
        let matched = match &self.filter {
            Some(filter) => FilterEvaluator::new(filter, registry)?.filter_records(records, accessor)?,
            None => records,
        };

        let total = self.with_total.then_some(matched.len());
        let sorted = sort_records(matched, &self.orders, registry, accessor)?;
        let records = paginate_vec(sorted, self.offset, self.limit);

        tracing::debug!(
            returned = records.len(),
            total = ?total,
            offset = self.offset,
            limit = self.limit,
            "produced query page"
        );
        Ok(Page { records, total })
    }
}

/// Shorthand for [`Query::run`].
pub fn query_records<T, A>(
    records: Vec<T>,
    registry: &FieldRegistry,
    accessor: &A,
    query: &Query,
) -> FilterResult<Page<T>>
where
    A: FieldAccessor<T> + ?Sized,
{
    query.run(records, registry, accessor)
}
