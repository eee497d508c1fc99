//! Abstract Syntax Tree (AST) for filter expressions.
//!
//! A parsed filter is a flat chain of siblings that alternates operands
//! (conditions or parenthesized groups) with connectives. The chain carries
//! no precedence: backends fold it strictly left to right.

use std::fmt;

/// A parsed filter expression: the top-level sibling chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    expressions: Vec<Expression>,
}

impl Filter {
    /// Creates a filter from a sibling chain.
    pub fn new(expressions: Vec<Expression>) -> Self {
        Self { expressions }
    }

    /// Returns the top-level sibling chain.
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// Returns every condition in the tree, depth first, in source order.
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        collect_conditions(&self.expressions, &mut out);
        out
    }
}

fn collect_conditions<'a>(expressions: &'a [Expression], out: &mut Vec<&'a Condition>) {
    for expression in expressions {
        match expression {
            Expression::Condition(condition) => out.push(condition),
            Expression::Group(inner) => collect_conditions(inner, out),
            Expression::Connective(_) => {}
        }
    }
}

/// One sibling in a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A single `column operator value` predicate.
    Condition(Condition),

    /// The `and` / `or` joining two operands.
    Connective(Connective),

    /// A parenthesized sub-chain.
    Group(Vec<Expression>),
}

impl Expression {
    /// Creates a condition sibling.
    pub fn condition(column: impl Into<String>, operator: Operator, value: Option<Operand>) -> Self {
        Expression::Condition(Condition::new(column, operator, value))
    }
}

/// A leaf predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Logical field name, resolved through the field registry.
    pub column: String,
    /// The comparison operator.
    pub operator: Operator,
    /// The operand; `None` only for `pt` and `np`.
    pub value: Option<Operand>,
}

impl Condition {
    /// Creates a new condition.
    pub fn new(column: impl Into<String>, operator: Operator, value: Option<Operand>) -> Self {
        Self {
            column: column.into(),
            operator,
            value,
        }
    }
}

/// Logical connective between siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    /// `and`
    And,
    /// `or`
    Or,
}

impl Connective {
    /// Parses a connective keyword (case-insensitive).
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Connective::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Connective::Or)
        } else {
            None
        }
    }

    /// Folds `right` into `left`.
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Connective::And => left && right,
            Connective::Or => left || right,
        }
    }
}

/// The fixed operator set.
///
/// `eq` and `=` are the same operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `co` - contains
    Contains,
    /// `eq` / `=` - equals
    Eq,
    /// `sw` - starts with
    StartsWith,
    /// `ew` - ends with
    EndsWith,
    /// `pt` - absent or empty
    Absent,
    /// `np` - present and non-empty
    Present,
    /// `in` - member of a list
    In,
    /// `nin` - not a member of a list
    NotIn,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Gte,
    /// `<=`
    Lte,
}

impl Operator {
    /// Parses an operator token. Tokens are case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "co" => Operator::Contains,
            "eq" | "=" => Operator::Eq,
            "sw" => Operator::StartsWith,
            "ew" => Operator::EndsWith,
            "pt" => Operator::Absent,
            "np" => Operator::Present,
            "in" => Operator::In,
            "nin" => Operator::NotIn,
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            ">=" => Operator::Gte,
            "<=" => Operator::Lte,
            _ => return None,
        };
        Some(op)
    }

    /// Returns the canonical token for this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Contains => "co",
            Operator::Eq => "eq",
            Operator::StartsWith => "sw",
            Operator::EndsWith => "ew",
            Operator::Absent => "pt",
            Operator::Present => "np",
            Operator::In => "in",
            Operator::NotIn => "nin",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }

    /// Returns false for `pt` and `np`, which consume no value token.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Operator::Absent | Operator::Present)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single literal as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// An unquoted word, e.g. `42` or `true`.
    Bare(String),
    /// A backtick-quoted literal; holds the content without the backticks.
    Quoted(String),
}

impl Literal {
    /// Returns the literal's text without any quoting.
    pub fn text(&self) -> &str {
        match self {
            Literal::Bare(text) | Literal::Quoted(text) => text,
        }
    }

    /// Returns true if the literal was backtick-quoted.
    pub fn is_quoted(&self) -> bool {
        matches!(self, Literal::Quoted(_))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bare(text) => f.write_str(text),
            Literal::Quoted(text) => write!(f, "`{}`", text),
        }
    }
}

/// The value side of a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A single literal.
    Single(Literal),
    /// A bracketed list of literals.
    List(Vec<Literal>),
}

impl Operand {
    /// Returns the literals in this operand; a single literal is a list of one.
    pub fn literals(&self) -> &[Literal] {
        match self {
            Operand::Single(literal) => std::slice::from_ref(literal),
            Operand::List(items) => items,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Single(literal) => write!(f, "{}", literal),
            Operand::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.operator)?;
        if let Some(value) = &self.value {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Condition(condition) => write!(f, "{}", condition),
            Expression::Connective(Connective::And) => f.write_str("and"),
            Expression::Connective(Connective::Or) => f.write_str("or"),
            Expression::Group(inner) => {
                f.write_str("(")?;
                write_chain(f, inner)?;
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Filter {
    /// Renders the filter back into the textual grammar.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_chain(f, &self.expressions)
    }
}

fn write_chain(f: &mut fmt::Formatter<'_>, chain: &[Expression]) -> fmt::Result {
    for (i, expression) in chain.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", expression)?;
    }
    Ok(())
}
