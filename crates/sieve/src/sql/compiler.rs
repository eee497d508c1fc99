//! Compiles filters and order instructions into parameterized SQL.

use serde::Serialize;

use crate::filter::{Connective, Filter, FilterResult, OrderInstruction};
use crate::predicate::{self, Predicate, Resolved, ResolvedCondition};
use crate::registry::{FieldRegistry, FieldType};
use crate::value::Value;

/// A compiled `WHERE` fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SqlFilter {
    /// The boolean expression, without the `WHERE` keyword.
    pub clause: String,
    /// Positional arguments, one per `?` in `clause`.
    pub args: Vec<Value>,
    /// Join clauses required by the referenced fields, deduplicated.
    pub joins: Vec<String>,
}

/// A compiled `ORDER BY` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SqlOrder {
    /// `col ASC, col2 DESC`, without the `ORDER BY` keywords.
    pub clause: String,
    pub joins: Vec<String>,
}

/// Filter and order compiled together, with merged joins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SqlQuery {
    pub where_clause: Option<String>,
    pub args: Vec<Value>,
    pub joins: Vec<String>,
    pub order_by: Option<String>,
}

impl SqlQuery {
    /// Renders ` WHERE ...`, or an empty string when there is no filter.
    pub fn where_sql(&self) -> String {
        self.where_clause
            .as_ref()
            .map(|clause| format!(" WHERE {}", clause))
            .unwrap_or_default()
    }

    /// Renders ` ORDER BY ...`, or an empty string when there is no order.
    pub fn order_by_sql(&self) -> String {
        self.order_by
            .as_ref()
            .map(|clause| format!(" ORDER BY {}", clause))
            .unwrap_or_default()
    }

    /// Renders the join clauses separated by spaces, with a leading space.
    pub fn joins_sql(&self) -> String {
        self.joins.iter().map(|join| format!(" {}", join)).collect()
    }
}

/// Compiles filters against a registry.
///
/// All values are emitted as `?` placeholders with positional arguments;
/// nothing from the filter text is interpolated into the SQL.
///
/// # Example
///
/// ```
/// use sieve_rs::filter::FilterParser;
/// use sieve_rs::registry::{FieldDescriptor, FieldRegistry, FieldType};
/// use sieve_rs::sql::SqlCompiler;
/// use sieve_rs::Value;
///
/// let registry = FieldRegistry::new()
///     .with_field("a", FieldDescriptor::new("a", FieldType::Int))
///     .with_field("b", FieldDescriptor::new("b", FieldType::String));
/// let filter = FilterParser::parse("a = 1 and b co `test`").unwrap().unwrap();
///
/// let sql = SqlCompiler::new(&registry).compile(&filter).unwrap();
/// assert_eq!(sql.clause, "a = ? AND b LIKE ?");
/// assert_eq!(sql.args, vec![Value::Int(1), Value::from("%test%")]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SqlCompiler<'r> {
    registry: &'r FieldRegistry,
}

impl<'r> SqlCompiler<'r> {
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self { registry }
    }

    /// Compiles a filter into a `WHERE` fragment.
    ///
    /// # Errors
    ///
    /// Fails on unknown fields, operators not allowed for a field's type,
    /// and values that do not parse for the field's type.
    pub fn compile(&self, filter: &Filter) -> FilterResult<SqlFilter> {
        let resolved = predicate::resolve(filter, self.registry)?;

        let mut out = SqlFilter::default();
        write_chain(&resolved, &mut out);

        tracing::debug!(
            clause = %out.clause,
            args = out.args.len(),
            joins = out.joins.len(),
            "compiled filter to SQL"
        );
        Ok(out)
    }

    /// Compiles order instructions into an `ORDER BY` list.
    pub fn compile_order(&self, orders: &[OrderInstruction]) -> FilterResult<SqlOrder> {
        let mut out = SqlOrder::default();
        let mut terms = Vec::with_capacity(orders.len());

        for order in orders {
            let field = self.registry.order_field(&order.column)?;
            terms.push(format!("{} {}", field.column, order.direction.as_sql()));
            push_join(&mut out.joins, field.join.as_deref());
        }

        out.clause = terms.join(", ");
        Ok(out)
    }

    /// Compiles an optional filter and an order list together.
    pub fn compile_query(
        &self,
        filter: Option<&Filter>,
        orders: &[OrderInstruction],
    ) -> FilterResult<SqlQuery> {
        let mut query = SqlQuery::default();

        if let Some(filter) = filter {
            let compiled = self.compile(filter)?;
            query.where_clause = Some(compiled.clause);
            query.args = compiled.args;
            query.joins = compiled.joins;
        }

        let order = self.compile_order(orders)?;
        for join in &order.joins {
            push_join(&mut query.joins, Some(join));
        }
        if !order.clause.is_empty() {
            query.order_by = Some(order.clause);
        }

        Ok(query)
    }
}

/// Shorthand for `SqlCompiler::new(registry).compile(filter)`.
pub fn compile(filter: &Filter, registry: &FieldRegistry) -> FilterResult<SqlFilter> {
    SqlCompiler::new(registry).compile(filter)
}

fn write_chain(chain: &[Resolved<'_>], out: &mut SqlFilter) {
    for item in chain {
        match item {
            Resolved::Test(condition) => write_condition(condition, out),
            Resolved::Connective(Connective::And) => out.clause.push_str(" AND "),
            Resolved::Connective(Connective::Or) => out.clause.push_str(" OR "),
            Resolved::Group(inner) => {
                out.clause.push('(');
                write_chain(inner, out);
                out.clause.push(')');
            }
        }
    }
}

fn write_condition(condition: &ResolvedCondition<'_>, out: &mut SqlFilter) {
    let descriptor = condition.descriptor;
    let column = descriptor.column.as_str();
    push_join(&mut out.joins, descriptor.join.as_deref());

    let fragment = match &condition.predicate {
        Predicate::Compare { op, value } => {
            out.args.push(value.clone());
            format!("{} {} ?", column, op.as_sql())
        }
        Predicate::Range { low, high } => {
            out.args.push(low.clone());
            out.args.push(high.clone());
            format!("({} >= ? AND {} <= ?)", column, column)
        }
        Predicate::Like { pattern, needle } => {
            out.args.push(Value::String(pattern.like_argument(needle)));
            format!("{} LIKE ?", column)
        }
        Predicate::Absent => format!(
            "({} IS NULL OR {} = {})",
            column,
            column,
            empty_literal(descriptor.field_type)
        ),
        Predicate::Present => format!(
            "({} IS NOT NULL AND {} <> {})",
            column,
            column,
            empty_literal(descriptor.field_type)
        ),
        Predicate::InList { values, negated } => {
            out.args.extend(values.iter().cloned());
            let placeholders = vec!["?"; values.len()].join(", ");
            let keyword = if *negated { "NOT IN" } else { "IN" };
            format!("{} {} ({})", column, keyword, placeholders)
        }
        Predicate::Raw { template, values } => {
            out.args.extend(values.iter().cloned());
            template.clone()
        }
    };

    out.clause.push_str(&fragment);
}

/// The literal that `pt`/`np` treat as empty for a field type.
fn empty_literal(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Int => "0",
        _ => "''",
    }
}

fn push_join(joins: &mut Vec<String>, join: Option<&str>) {
    if let Some(join) = join {
        if !joins.iter().any(|existing| existing == join) {
            joins.push(join.to_string());
        }
    }
}
