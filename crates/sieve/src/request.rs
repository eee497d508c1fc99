//! Filter requests as they arrive over the wire.
//!
//! A request carries the raw `filters` and `sorters` strings plus paging
//! parameters, either as URL query parameters or as a JSON body:
//!
//! ```text
//! GET /people?filters=age%20%3E%2030&sorters=-age&offset=0&limit=20&count=true
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{parse_order_by, Filter, FilterParser, FilterResult, OrderInstruction};
use crate::memory::Query;

/// Errors decoding a request before any filter parsing happens.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid query string: {0}")]
    Query(#[from] serde_urlencoded::de::Error),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRequest {
    /// Filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,

    /// Comma-separated order-by list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorters: Option<String>,

    pub offset: i64,

    /// Page size; zero or less means no limit.
    pub limit: i64,

    /// Whether the total match count should be returned.
    pub count: bool,
}

impl FilterRequest {
    /// Decodes a URL query string such as `filters=...&limit=10`.
    pub fn from_query_string(query: &str) -> Result<Self, RequestError> {
        Ok(serde_urlencoded::from_str(query.trim_start_matches('?'))?)
    }

    /// Decodes a JSON body.
    pub fn from_json(body: &str) -> Result<Self, RequestError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Parses the filter and order strings.
    ///
    /// Missing or blank strings mean "no filter" and "no ordering".
    pub fn parse(&self) -> FilterResult<ParsedRequest> {
        let filter = match &self.filters {
            Some(filters) => FilterParser::parse(filters)?,
            None => None,
        };
        let orders = match &self.sorters {
            Some(sorters) => parse_order_by(sorters)?,
            None => Vec::new(),
        };

        Ok(ParsedRequest {
            filter,
            orders,
            offset: self.offset,
            limit: self.limit,
            count: self.count,
        })
    }
}

/// A request whose filter and order strings have been parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRequest {
    pub filter: Option<Filter>,
    pub orders: Vec<OrderInstruction>,
    pub offset: i64,
    pub limit: i64,
    pub count: bool,
}

impl ParsedRequest {
    /// Converts into an in-memory [`Query`].
    pub fn into_query(self) -> Query {
        Query {
            filter: self.filter,
            orders: self.orders,
            offset: self.offset,
            limit: self.limit,
            with_total: self.count,
        }
    }
}
