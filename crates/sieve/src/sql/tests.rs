//! Tests for the SQL compiler.

use super::*;
use crate::filter::{parse_order_by, FilterError, FilterParser};
use crate::registry::{FieldDescriptor, FieldRegistry, FieldType, OrderField};
use crate::value::Value;

fn registry() -> FieldRegistry {
    FieldRegistry::new()
        .with_field("a", FieldDescriptor::new("a", FieldType::Int))
        .with_field("b", FieldDescriptor::new("b", FieldType::String))
        .with_field("flag", FieldDescriptor::new("t.flag", FieldType::Bool))
        .with_field(
            "created",
            FieldDescriptor::new("t.created_at", FieldType::DateTime),
        )
        .with_field("opens", FieldDescriptor::new("opens", FieldType::Time))
        .with_field(
            "owner",
            FieldDescriptor::new("u.name", FieldType::String)
                .with_join("JOIN users u ON u.id = t.owner_id"),
        )
        .with_field(
            "owner_email",
            FieldDescriptor::new("u.email", FieldType::String)
                .with_join("JOIN users u ON u.id = t.owner_id"),
        )
        .with_field(
            "full_name",
            FieldDescriptor::new("full_name", FieldType::String)
                .with_raw_sql("(first || ' ' || last) IN (?, ?)"),
        )
        .with_sortable_field("a", FieldDescriptor::new("a", FieldType::Int))
        .with_order(
            "team",
            OrderField::new("g.name").with_join("JOIN teams g ON g.id = t.team_id"),
        )
        .with_order(
            "owner",
            OrderField::new("u.name").with_join("JOIN users u ON u.id = t.owner_id"),
        )
}

fn compile_str(input: &str) -> Result<SqlFilter, FilterError> {
    let filter = FilterParser::parse(input).unwrap().unwrap();
    compile(&filter, &registry())
}

// ==================== Scalar Operators ====================

#[test]
fn test_compile_eq_and_contains() {
    let sql = compile_str("a = 1 and b co `test`").unwrap();
    assert_eq!(sql.clause, "a = ? AND b LIKE ?");
    assert_eq!(sql.args, vec![Value::Int(1), Value::from("%test%")]);
    assert!(sql.joins.is_empty());
}

#[test]
fn test_compile_like_patterns() {
    assert_eq!(compile_str("b sw `ab`").unwrap().args, vec![Value::from("ab%")]);
    assert_eq!(compile_str("b ew `ab`").unwrap().args, vec![Value::from("%ab")]);
}

#[test]
fn test_compile_comparisons() {
    for (op, sql_op) in [(">", ">"), ("<", "<"), (">=", ">="), ("<=", "<=")] {
        let sql = compile_str(&format!("a {} 5", op)).unwrap();
        assert_eq!(sql.clause, format!("a {} ?", sql_op));
        assert_eq!(sql.args, vec![Value::Int(5)]);
    }
}

#[test]
fn test_compile_bool_eq() {
    let sql = compile_str("flag eq false").unwrap();
    assert_eq!(sql.clause, "t.flag = ?");
    assert_eq!(sql.args, vec![Value::Bool(false)]);
}

#[test]
fn test_compile_datetime_equality_range() {
    let sql = compile_str("created eq `2024-03-01 12:00:00`").unwrap();
    assert_eq!(sql.clause, "(t.created_at >= ? AND t.created_at <= ?)");
    assert_eq!(sql.args.len(), 2);
    assert_eq!(sql.args[0], sql.args[1]);
}

#[test]
fn test_compile_time_comparison() {
    let sql = compile_str("opens < `09:30:00`").unwrap();
    assert_eq!(sql.clause, "opens < ?");
    assert_eq!(sql.args[0].to_string(), "09:30:00");
}

#[test]
fn test_compile_absent_and_present() {
    assert_eq!(compile_str("b pt").unwrap().clause, "(b IS NULL OR b = '')");
    assert_eq!(
        compile_str("b np").unwrap().clause,
        "(b IS NOT NULL AND b <> '')"
    );
    assert_eq!(compile_str("a pt").unwrap().clause, "(a IS NULL OR a = 0)");
    assert!(compile_str("a np").unwrap().args.is_empty());
}

#[test]
fn test_compile_in_lists() {
    let sql = compile_str("a in [1, 2, 3]").unwrap();
    assert_eq!(sql.clause, "a IN (?, ?, ?)");
    assert_eq!(sql.args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    let sql = compile_str("b nin [`x`]").unwrap();
    assert_eq!(sql.clause, "b NOT IN (?)");
}

#[test]
fn test_compile_raw_sql_template() {
    let sql = compile_str("full_name in [`Ada Lovelace`, `Alan Turing`]").unwrap();
    assert_eq!(sql.clause, "(first || ' ' || last) IN (?, ?)");
    assert_eq!(
        sql.args,
        vec![Value::from("Ada Lovelace"), Value::from("Alan Turing")]
    );
}

// ==================== Chains and Groups ====================

#[test]
fn test_compile_chain_is_literal() {
    let sql = compile_str("a = 1 or a = 2 and b pt").unwrap();
    assert_eq!(sql.clause, "a = ? OR a = ? AND (b IS NULL OR b = '')");
}

#[test]
fn test_compile_groups_are_parenthesized() {
    let sql = compile_str("(a = 1 or a = 2) and (b co `x` or (b sw `y`))").unwrap();
    assert_eq!(
        sql.clause,
        "(a = ? OR a = ?) AND (b LIKE ? OR (b LIKE ?))"
    );
    assert_eq!(sql.args.len(), 4);
}

#[test]
fn test_compile_args_follow_placeholder_order() {
    let sql = compile_str("b eq `first` and (a in [2, 3] or flag eq true)").unwrap();
    assert_eq!(
        sql.args,
        vec![
            Value::from("first"),
            Value::Int(2),
            Value::Int(3),
            Value::Bool(true)
        ]
    );
    assert_eq!(sql.clause.matches('?').count(), sql.args.len());
}

#[test]
fn test_compile_joins_deduplicated() {
    let sql = compile_str("owner eq `ada` or owner_email co `@x` or owner sw `a`").unwrap();
    assert_eq!(sql.joins, vec!["JOIN users u ON u.id = t.owner_id"]);
}

// ==================== Errors ====================

#[test]
fn test_compile_unknown_column_suggests() {
    let err = compile_str("owner_emial co `x`").unwrap_err();
    assert_eq!(
        err,
        FilterError::unknown_column("owner_emial", Some("owner_email".to_string()))
    );
}

#[test]
fn test_compile_rejects_operator_for_type() {
    assert!(matches!(
        compile_str("flag > true").unwrap_err(),
        FilterError::UnknownOperator { .. }
    ));
}

#[test]
fn test_compile_error_aborts_whole_filter() {
    assert!(matches!(
        compile_str("a = 1 and a = x").unwrap_err(),
        FilterError::InvalidValue { .. }
    ));
}

// ==================== Order By ====================

#[test]
fn test_compile_order() {
    let registry = registry();
    let compiler = SqlCompiler::new(&registry);
    let orders = parse_order_by("-team,a").unwrap();
    let order = compiler.compile_order(&orders).unwrap();
    assert_eq!(order.clause, "g.name DESC, a ASC");
    assert_eq!(order.joins, vec!["JOIN teams g ON g.id = t.team_id"]);
}

#[test]
fn test_compile_order_unknown_field() {
    let registry = registry();
    let orders = parse_order_by("b").unwrap();
    let err = SqlCompiler::new(&registry)
        .compile_order(&orders)
        .unwrap_err();
    assert!(matches!(err, FilterError::UnknownOrderColumn { .. }));
}

#[test]
fn test_compile_query_merges_joins() {
    let registry = registry();
    let filter = FilterParser::parse("owner eq `ada`").unwrap().unwrap();
    let orders = parse_order_by("owner,-team").unwrap();

    let query = SqlCompiler::new(&registry)
        .compile_query(Some(&filter), &orders)
        .unwrap();

    assert_eq!(query.where_sql(), " WHERE u.name = ?");
    assert_eq!(query.order_by_sql(), " ORDER BY u.name ASC, g.name DESC");
    assert_eq!(
        query.joins,
        vec![
            "JOIN users u ON u.id = t.owner_id",
            "JOIN teams g ON g.id = t.team_id"
        ]
    );
}

#[test]
fn test_compile_query_without_filter_or_order() {
    let registry = registry();
    let query = SqlCompiler::new(&registry).compile_query(None, &[]).unwrap();
    assert_eq!(query.where_sql(), "");
    assert_eq!(query.order_by_sql(), "");
    assert_eq!(query.joins_sql(), "");
    assert!(query.args.is_empty());
}
