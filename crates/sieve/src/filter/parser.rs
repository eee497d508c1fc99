//! Parser for filter expressions.

use super::ast::{Condition, Connective, Expression, Filter, Literal, Operand, Operator};
use super::error::{FilterError, FilterResult};
use super::lexer::{FilterToken, Lexer, PositionedToken};

/// Parser for filter expressions.
///
/// Unlike a precedence-climbing parser, this one performs a flat left-to-right
/// scan: `and` and `or` have no precedence relative to each other, so
/// `a eq 1 or b eq 2 and c eq 3` parses into the five-element chain
/// `[a eq 1, or, b eq 2, and, c eq 3]` and backends fold it left to right.
/// Parenthesized groups are the only way to change evaluation order.
///
/// # Grammar
///
/// ```text
/// chain      ::= expr (CONNECTIVE expr)*
/// expr       ::= leaf | "(" chain ")"
/// leaf       ::= FIELD OP VALUE | FIELD ("pt" | "np")
/// CONNECTIVE ::= "and" | "or"
/// OP         ::= "co" | "eq" | "sw" | "ew" | "in" | "nin"
///              | ">" | "<" | ">=" | "<=" | "="
/// VALUE      ::= `quoted` | bareword | "[" VALUE ("," VALUE)* "]"
/// ```
///
/// # Example
///
/// ```
/// use sieve_rs::filter::{Expression, FilterParser};
///
/// let filter = FilterParser::parse("age > 30 and name co `ada`").unwrap().unwrap();
/// assert_eq!(filter.expressions().len(), 3);
/// assert!(matches!(filter.expressions()[1], Expression::Connective(_)));
///
/// // Empty input is not an error, it is "no filter".
/// assert!(FilterParser::parse("   ").unwrap().is_none());
/// ```
pub struct FilterParser;

impl FilterParser {
    /// Parses a filter expression string.
    ///
    /// Returns `Ok(None)` for empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Syntax` for unbalanced brackets, unterminated
    /// quotes, missing operators or values, and misplaced connectives;
    /// `FilterError::UnknownOperator` for an operator outside the operator
    /// set; `FilterError::InvalidOperator` for a trailing connective.
    pub fn parse(input: &str) -> FilterResult<Option<Filter>> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let tokens = Lexer::new(trimmed).tokenize()?;
        if tokens.is_empty() {
            return Ok(None);
        }

        let filter = Self::parse_tokens(&tokens)?;
        tracing::trace!(filter = %filter, "parsed filter expression");
        Ok(Some(filter))
    }

    /// Parses an already-tokenized expression.
    ///
    /// Parenthesis matching is checked again here, so a token stream that
    /// did not come from [`Lexer::tokenize`] is still validated.
    pub fn parse_tokens(tokens: &[PositionedToken]) -> FilterResult<Filter> {
        if tokens.is_empty() {
            return Err(FilterError::syntax("empty expression"));
        }
        Ok(Filter::new(parse_chain(tokens)?))
    }
}

/// Parses a sibling chain, recursing into parenthesized groups.
fn parse_chain(tokens: &[PositionedToken]) -> FilterResult<Vec<Expression>> {
    let mut expressions = Vec::new();
    let mut expect_operand = true;
    let mut i = 0;

    while i < tokens.len() {
        let current = &tokens[i];

        if expect_operand {
            match &current.token {
                FilterToken::OpenParen => {
                    let close = find_closing_paren(tokens, i)?;
                    let inner = &tokens[i + 1..close];
                    if inner.is_empty() {
                        return Err(FilterError::syntax(format!(
                            "empty group at position {}",
                            current.position
                        )));
                    }
                    expressions.push(Expression::Group(parse_chain(inner)?));
                    i = close + 1;
                }
                FilterToken::Word(word) if Connective::from_keyword(word).is_some() => {
                    return Err(FilterError::syntax(format!(
                        "unexpected connective '{}' at position {}",
                        word, current.position
                    )));
                }
                FilterToken::Word(column) => {
                    let (condition, consumed) = parse_condition(column, &tokens[i..])?;
                    expressions.push(Expression::Condition(condition));
                    i += consumed;
                }
                FilterToken::CloseParen => {
                    return Err(FilterError::syntax(format!(
                        "unmatched ')' at position {}",
                        current.position
                    )));
                }
                other => {
                    return Err(FilterError::syntax(format!(
                        "expected a field name at position {}, found '{}'",
                        current.position, other
                    )));
                }
            }
            expect_operand = false;
        } else {
            let connective = match &current.token {
                FilterToken::Word(word) => Connective::from_keyword(word),
                _ => None,
            };
            let Some(connective) = connective else {
                return Err(FilterError::syntax(format!(
                    "expected 'and' or 'or' at position {}, found '{}'",
                    current.position, current.token
                )));
            };
            if i + 1 == tokens.len() {
                return Err(FilterError::invalid_operator(
                    current.token.to_string(),
                    current.position,
                ));
            }
            expressions.push(Expression::Connective(connective));
            expect_operand = true;
            i += 1;
        }
    }

    Ok(expressions)
}

/// Parses `column operator [value]` starting at `tokens[0]`.
///
/// Returns the condition and the number of tokens consumed.
fn parse_condition(column: &str, tokens: &[PositionedToken]) -> FilterResult<(Condition, usize)> {
    let field = &tokens[0];

    let Some(op_token) = tokens.get(1) else {
        return Err(FilterError::syntax(format!(
            "missing operator after '{}' at position {}",
            column, field.position
        )));
    };
    let FilterToken::Word(op_text) = &op_token.token else {
        return Err(FilterError::syntax(format!(
            "expected an operator after '{}' at position {}, found '{}'",
            column, op_token.position, op_token.token
        )));
    };
    let operator = Operator::from_token(op_text)
        .ok_or_else(|| FilterError::unknown_operator(column, op_text.as_str()))?;

    if !operator.takes_value() {
        return Ok((Condition::new(column, operator, None), 2));
    }

    let Some(value_token) = tokens.get(2) else {
        return Err(FilterError::syntax(format!(
            "missing value for '{} {}' at position {}",
            column, operator, op_token.position
        )));
    };
    let operand = match &value_token.token {
        FilterToken::Word(word) => Operand::Single(Literal::Bare(word.clone())),
        FilterToken::Quoted(text) => Operand::Single(Literal::Quoted(text.clone())),
        FilterToken::List(items) => Operand::List(items.clone()),
        other => {
            return Err(FilterError::syntax(format!(
                "expected a value for '{} {}' at position {}, found '{}'",
                column, operator, value_token.position, other
            )));
        }
    };

    Ok((Condition::new(column, operator, Some(operand)), 3))
}

/// Finds the index of the `)` matching the `(` at `open`.
fn find_closing_paren(tokens: &[PositionedToken], open: usize) -> FilterResult<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.token {
            FilterToken::OpenParen => depth += 1,
            FilterToken::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(FilterError::syntax(format!(
        "unclosed '(' at position {}",
        tokens[open].position
    )))
}
