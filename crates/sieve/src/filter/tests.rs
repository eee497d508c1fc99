//! Tests for the filter parser.

use super::*;

fn parse(input: &str) -> Filter {
    FilterParser::parse(input).unwrap().unwrap()
}

fn bare(s: &str) -> Option<Operand> {
    Some(Operand::Single(Literal::Bare(s.to_string())))
}

fn quoted(s: &str) -> Option<Operand> {
    Some(Operand::Single(Literal::Quoted(s.to_string())))
}

// ==================== Simple Conditions ====================

#[test]
fn test_parse_single_condition() {
    let filter = parse("age > 30");
    assert_eq!(
        filter.expressions(),
        &[Expression::condition("age", Operator::Gt, bare("30"))]
    );
}

#[test]
fn test_parse_with_surrounding_whitespace() {
    assert_eq!(parse("  age > 30\n"), parse("age > 30"));
}

#[test]
fn test_parse_eq_and_equals_sign_are_the_same_operator() {
    assert_eq!(parse("a = 1"), parse("a eq 1"));
}

#[test]
fn test_parse_all_operators() {
    for (token, op) in [
        ("co", Operator::Contains),
        ("eq", Operator::Eq),
        ("=", Operator::Eq),
        ("sw", Operator::StartsWith),
        ("ew", Operator::EndsWith),
        ("in", Operator::In),
        ("nin", Operator::NotIn),
        (">", Operator::Gt),
        ("<", Operator::Lt),
        (">=", Operator::Gte),
        ("<=", Operator::Lte),
    ] {
        let filter = parse(&format!("f {} 1", token));
        assert_eq!(
            filter.expressions(),
            &[Expression::condition("f", op, bare("1"))],
            "operator {token}"
        );
    }
}

#[test]
fn test_parse_no_value_operators() {
    let filter = parse("name pt and email np");
    assert_eq!(
        filter.expressions(),
        &[
            Expression::condition("name", Operator::Absent, None),
            Expression::Connective(Connective::And),
            Expression::condition("email", Operator::Present, None),
        ]
    );
}

#[test]
fn test_parse_quoted_value() {
    let filter = parse("name eq `Ada Lovelace`");
    assert_eq!(
        filter.expressions(),
        &[Expression::condition("name", Operator::Eq, quoted("Ada Lovelace"))]
    );
}

#[test]
fn test_parse_list_value() {
    let filter = parse("state in [`open`, `closed`]");
    assert_eq!(
        filter.expressions(),
        &[Expression::condition(
            "state",
            Operator::In,
            Some(Operand::List(vec![
                Literal::Quoted("open".to_string()),
                Literal::Quoted("closed".to_string()),
            ]))
        )]
    );
}

#[test]
fn test_parse_connective_keyword_as_value() {
    let filter = parse("word eq and");
    assert_eq!(
        filter.expressions(),
        &[Expression::condition("word", Operator::Eq, bare("and"))]
    );
}

// ==================== Chains and Groups ====================

#[test]
fn test_parse_flat_chain_has_no_precedence() {
    let filter = parse("a eq 1 or b eq 2 and c eq 3");
    assert_eq!(
        filter.expressions(),
        &[
            Expression::condition("a", Operator::Eq, bare("1")),
            Expression::Connective(Connective::Or),
            Expression::condition("b", Operator::Eq, bare("2")),
            Expression::Connective(Connective::And),
            Expression::condition("c", Operator::Eq, bare("3")),
        ]
    );
}

#[test]
fn test_parse_connectives_case_insensitive() {
    assert_eq!(parse("a eq 1 AND b eq 2"), parse("a eq 1 and b eq 2"));
    assert_eq!(parse("a eq 1 Or b eq 2"), parse("a eq 1 or b eq 2"));
}

#[test]
fn test_parse_group() {
    let filter = parse("a eq 1 and (b eq 2 or c eq 3)");
    assert_eq!(
        filter.expressions(),
        &[
            Expression::condition("a", Operator::Eq, bare("1")),
            Expression::Connective(Connective::And),
            Expression::Group(vec![
                Expression::condition("b", Operator::Eq, bare("2")),
                Expression::Connective(Connective::Or),
                Expression::condition("c", Operator::Eq, bare("3")),
            ]),
        ]
    );
}

#[test]
fn test_parse_nested_groups_mirror_source_structure() {
    let filter = parse("((a eq 1) or (b eq 2 and (c pt)))");
    let [Expression::Group(outer)] = filter.expressions() else {
        panic!("expected a single group");
    };
    assert_eq!(outer.len(), 3);
    assert!(matches!(&outer[0], Expression::Group(g) if g.len() == 1));
    assert!(matches!(&outer[1], Expression::Connective(Connective::Or)));
    let Expression::Group(right) = &outer[2] else {
        panic!("expected right group");
    };
    assert_eq!(right.len(), 3);
    assert!(matches!(&right[2], Expression::Group(g) if g.len() == 1));
}

#[test]
fn test_parse_conditions_depth_first() {
    let filter = parse("a eq 1 and (b eq 2 or c eq 3) and d pt");
    let columns: Vec<&str> = filter
        .conditions()
        .iter()
        .map(|c| c.column.as_str())
        .collect();
    assert_eq!(columns, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_display_roundtrip() {
    for input in [
        "a eq 1",
        "name co `x y` and (age > 3 or tags in [`a`,`b`])",
        "n pt or n np",
        "((a < 1))",
    ] {
        let filter = parse(input);
        let rendered = filter.to_string();
        assert_eq!(parse(&rendered), filter, "roundtrip of {input}");
    }
}

// ==================== Empty Input ====================

#[test]
fn test_parse_empty_is_no_filter() {
    assert_eq!(FilterParser::parse("").unwrap(), None);
    assert_eq!(FilterParser::parse("  \t").unwrap(), None);
}

// ==================== Errors ====================

#[test]
fn test_parse_unbalanced_parenthesis() {
    let err = FilterParser::parse("a = 1 and (a = 20").unwrap_err();
    assert!(matches!(err, FilterError::Syntax { .. }));
}

#[test]
fn test_parse_tokens_unbalanced_parenthesis() {
    // Tokens assembled by hand skip the lexer's balance check.
    let tokens: Vec<PositionedToken> = [
        FilterToken::Word("a".into()),
        FilterToken::Word("=".into()),
        FilterToken::Word("1".into()),
        FilterToken::Word("and".into()),
        FilterToken::OpenParen,
        FilterToken::Word("a".into()),
        FilterToken::Word("=".into()),
        FilterToken::Word("20".into()),
    ]
    .into_iter()
    .enumerate()
    .map(|(position, token)| PositionedToken { token, position })
    .collect();

    let err = FilterParser::parse_tokens(&tokens).unwrap_err();
    assert!(matches!(err, FilterError::Syntax { .. }));
}

#[test]
fn test_parse_trailing_connective_is_invalid_operator() {
    let err = FilterParser::parse("a eq 1 and").unwrap_err();
    assert_eq!(err, FilterError::invalid_operator("and", 7));
}

#[test]
fn test_parse_trailing_connective_inside_group() {
    let err = FilterParser::parse("(a eq 1 or) and b eq 2").unwrap_err();
    assert!(matches!(err, FilterError::InvalidOperator { .. }));
}

#[test]
fn test_parse_double_connective_is_syntax_error() {
    let err = FilterParser::parse("a eq 1 and or b eq 2").unwrap_err();
    assert!(matches!(err, FilterError::Syntax { .. }));
}

#[test]
fn test_parse_leading_connective_is_syntax_error() {
    let err = FilterParser::parse("and a eq 1").unwrap_err();
    assert!(matches!(err, FilterError::Syntax { .. }));
}

#[test]
fn test_parse_missing_connective_is_syntax_error() {
    let err = FilterParser::parse("a eq 1 b eq 2").unwrap_err();
    assert!(matches!(err, FilterError::Syntax { .. }));
}

#[test]
fn test_parse_unknown_operator() {
    let err = FilterParser::parse("a like `x`").unwrap_err();
    assert_eq!(err, FilterError::unknown_operator("a", "like"));
}

#[test]
fn test_parse_operators_are_case_sensitive() {
    assert!(matches!(
        FilterParser::parse("a EQ 1").unwrap_err(),
        FilterError::UnknownOperator { .. }
    ));
}

#[test]
fn test_parse_missing_operator() {
    assert!(matches!(
        FilterParser::parse("a").unwrap_err(),
        FilterError::Syntax { .. }
    ));
}

#[test]
fn test_parse_missing_value() {
    assert!(matches!(
        FilterParser::parse("a eq").unwrap_err(),
        FilterError::Syntax { .. }
    ));
    assert!(matches!(
        FilterParser::parse("(a eq)").unwrap_err(),
        FilterError::Syntax { .. }
    ));
}

#[test]
fn test_parse_empty_group() {
    assert!(matches!(
        FilterParser::parse("a eq 1 and ()").unwrap_err(),
        FilterError::Syntax { .. }
    ));
}

#[test]
fn test_parse_value_where_field_expected() {
    assert!(matches!(
        FilterParser::parse("`a` eq 1").unwrap_err(),
        FilterError::Syntax { .. }
    ));
}
