//! Resolution of parsed conditions into typed predicates.
//!
//! Both backends walk the same resolved tree, so the operator/type table and
//! the literal parsing rules live here and nowhere else.

use chrono::{NaiveDateTime, NaiveTime};

use crate::filter::{
    Condition, Connective, Expression, Filter, FilterError, FilterResult, Literal, Operand,
    Operator,
};
use crate::registry::{FieldDescriptor, FieldRegistry, FieldType};
use crate::value::{Value, DATETIME_FORMAT, TIME_FORMAT};

/// Scalar comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Comparison {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl Comparison {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Gt => ">",
            Comparison::Lt => "<",
            Comparison::Gte => ">=",
            Comparison::Lte => "<=",
        }
    }

    pub(crate) fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Comparison::Eq => ordering == Equal,
            Comparison::Gt => ordering == Greater,
            Comparison::Lt => ordering == Less,
            Comparison::Gte => ordering != Less,
            Comparison::Lte => ordering != Greater,
        }
    }
}

/// Substring match kind for `co`, `sw`, `ew`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pattern {
    Contains,
    StartsWith,
    EndsWith,
}

impl Pattern {
    /// The `LIKE` pattern bound for `needle`. The needle is not escaped.
    pub(crate) fn like_argument(&self, needle: &str) -> String {
        match self {
            Pattern::Contains => format!("%{}%", needle),
            Pattern::StartsWith => format!("{}%", needle),
            Pattern::EndsWith => format!("%{}", needle),
        }
    }
}

/// Matches `text` against a SQL `LIKE` pattern the way SQLite does.
///
/// `%` matches any run of characters and `_` matches exactly one. Case is
/// folded for ASCII letters only.
pub(crate) fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Last `%` seen, and the text position it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '_' || c.eq_ignore_ascii_case(&text[t]) => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    t = absorbed + 1;
                    backtrack = Some((star, t));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '%')
}

/// A condition with its value parsed for the field's type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    Compare { op: Comparison, value: Value },
    /// Closed range, used for date/time equality.
    Range { low: Value, high: Value },
    /// `co`/`sw`/`ew`. Both backends match with `LIKE` semantics, so `%`
    /// and `_` in the needle are wildcards and only ASCII case is folded.
    Like { pattern: Pattern, needle: String },
    Absent,
    Present,
    InList { values: Vec<Value>, negated: bool },
    /// Raw SQL template; in memory it behaves like `in`.
    Raw { template: String, values: Vec<Value> },
}

/// A condition bound to its registry entry.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedCondition<'r> {
    pub field: &'r str,
    pub descriptor: &'r FieldDescriptor,
    pub predicate: Predicate,
}

/// One sibling of a resolved chain.
#[derive(Debug, Clone)]
pub(crate) enum Resolved<'r> {
    Test(ResolvedCondition<'r>),
    Connective(Connective),
    Group(Vec<Resolved<'r>>),
}

/// Resolves every condition of a filter against the registry.
pub(crate) fn resolve<'r>(
    filter: &'r Filter,
    registry: &'r FieldRegistry,
) -> FilterResult<Vec<Resolved<'r>>> {
    resolve_chain(filter.expressions(), registry)
}

fn resolve_chain<'r>(
    expressions: &'r [Expression],
    registry: &'r FieldRegistry,
) -> FilterResult<Vec<Resolved<'r>>> {
    expressions
        .iter()
        .map(|expression| match expression {
            Expression::Condition(condition) => {
                resolve_condition(condition, registry).map(Resolved::Test)
            }
            Expression::Connective(connective) => Ok(Resolved::Connective(*connective)),
            Expression::Group(inner) => resolve_chain(inner, registry).map(Resolved::Group),
        })
        .collect()
}

/// Applies the per-type operator table to one condition.
pub(crate) fn resolve_condition<'r>(
    condition: &'r Condition,
    registry: &'r FieldRegistry,
) -> FilterResult<ResolvedCondition<'r>> {
    let field = condition.column.as_str();
    let descriptor = registry.field(field)?;
    let field_type = descriptor.field_type;
    let unknown_operator = || FilterError::unknown_operator(field, condition.operator.as_str());

    if let Some(template) = &descriptor.raw_sql {
        if condition.operator != Operator::In {
            return Err(unknown_operator());
        }
        let values = parse_list(field, field_type, operand(condition)?)?;
        let placeholders = template.matches('?').count();
        if placeholders != values.len() {
            return Err(FilterError::invalid_value(
                field,
                format!(
                    "expected {} values for the field's template, got {}",
                    placeholders,
                    values.len()
                ),
            ));
        }
        return Ok(ResolvedCondition {
            field,
            descriptor,
            predicate: Predicate::Raw {
                template: template.clone(),
                values,
            },
        });
    }

    let predicate = match (field_type, condition.operator) {
        (FieldType::String, Operator::Contains) => like(condition, Pattern::Contains)?,
        (FieldType::String, Operator::StartsWith) => like(condition, Pattern::StartsWith)?,
        (FieldType::String, Operator::EndsWith) => like(condition, Pattern::EndsWith)?,

        (FieldType::String | FieldType::Int | FieldType::Bool, Operator::Eq) => {
            Predicate::Compare {
                op: Comparison::Eq,
                value: parse_single(field, field_type, operand(condition)?)?,
            }
        }

        (FieldType::String | FieldType::Int, Operator::Absent) => Predicate::Absent,
        (FieldType::String | FieldType::Int, Operator::Present) => Predicate::Present,

        (
            FieldType::String | FieldType::Int | FieldType::Bool,
            op @ (Operator::In | Operator::NotIn),
        ) => Predicate::InList {
            values: parse_list(field, field_type, operand(condition)?)?,
            negated: op == Operator::NotIn,
        },

        (
            FieldType::Int | FieldType::DateTime | FieldType::Time,
            op @ (Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte),
        ) => Predicate::Compare {
            op: match op {
                Operator::Gt => Comparison::Gt,
                Operator::Lt => Comparison::Lt,
                Operator::Gte => Comparison::Gte,
                _ => Comparison::Lte,
            },
            value: parse_single(field, field_type, operand(condition)?)?,
        },

        (FieldType::DateTime | FieldType::Time, Operator::Eq) => {
            let value = parse_single(field, field_type, operand(condition)?)?;
            Predicate::Range {
                low: value.clone(),
                high: value,
            }
        }

        _ => return Err(unknown_operator()),
    };

    Ok(ResolvedCondition {
        field,
        descriptor,
        predicate,
    })
}

fn operand(condition: &Condition) -> FilterResult<&Operand> {
    condition.value.as_ref().ok_or_else(|| {
        FilterError::invalid_value(
            condition.column.as_str(),
            format!("operator '{}' requires a value", condition.operator),
        )
    })
}

fn like(condition: &Condition, pattern: Pattern) -> FilterResult<Predicate> {
    let field = condition.column.as_str();
    match parse_single(field, FieldType::String, operand(condition)?)? {
        Value::String(needle) => Ok(Predicate::Like { pattern, needle }),
        _ => Err(FilterError::invalid_value(field, "expected a string")),
    }
}

/// Parses an operand that must be a single literal.
fn parse_single(field: &str, field_type: FieldType, operand: &Operand) -> FilterResult<Value> {
    match operand {
        Operand::Single(literal) => parse_literal(field, field_type, literal),
        Operand::List(_) => Err(FilterError::invalid_value(
            field,
            "expected a single value, got a list",
        )),
    }
}

/// Parses a list operand; a single literal is a list of one.
fn parse_list(field: &str, field_type: FieldType, operand: &Operand) -> FilterResult<Vec<Value>> {
    let literals = operand.literals();
    if literals.is_empty() {
        return Err(FilterError::invalid_value(field, "empty list"));
    }
    literals
        .iter()
        .map(|literal| parse_literal(field, field_type, literal))
        .collect()
}

/// Parses one literal according to the field type.
///
/// Strings must be backtick-quoted; every other type accepts either form.
pub(crate) fn parse_literal(
    field: &str,
    field_type: FieldType,
    literal: &Literal,
) -> FilterResult<Value> {
    let text = literal.text();
    match field_type {
        FieldType::String => match literal {
            Literal::Quoted(text) => Ok(Value::String(text.clone())),
            Literal::Bare(text) => Err(FilterError::invalid_value(
                field,
                format!("string value '{}' must be quoted with backticks", text),
            )),
        },
        FieldType::Int => text.trim().parse::<i64>().map(Value::Int).map_err(|_| {
            FilterError::invalid_value(field, format!("'{}' is not an integer", text))
        }),
        FieldType::Bool => match text {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(FilterError::invalid_value(
                field,
                format!("'{}' is not 'true' or 'false'", text),
            )),
        },
        FieldType::DateTime => NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .map(Value::DateTime)
            .map_err(|_| {
                FilterError::invalid_value(
                    field,
                    format!("'{}' does not match 'YYYY-MM-DD HH:MM:SS'", text),
                )
            }),
        FieldType::Time => NaiveTime::parse_from_str(text, TIME_FORMAT)
            .map(Value::Time)
            .map_err(|_| {
                FilterError::invalid_value(field, format!("'{}' does not match 'HH:MM:SS'", text))
            }),
    }
}
