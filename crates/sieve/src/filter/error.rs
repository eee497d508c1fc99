//! Error types for filter parsing, compilation and evaluation.

use thiserror::Error;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while parsing, compiling or evaluating a filter.
///
/// Every error is caused by caller input, so none of them are retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The expression is malformed: unbalanced brackets, an unterminated
    /// quote, a missing operator or value, or a misplaced connective.
    #[error("syntax error: {message}")]
    Syntax {
        /// Description of what went wrong and where.
        message: String,
    },

    /// The filter references a field the registry does not know.
    #[error("unknown column '{column}'{}", did_you_mean(.suggestion))]
    UnknownColumn {
        /// The logical field name from the expression.
        column: String,
        /// The closest registered name, if any is close enough.
        suggestion: Option<String>,
    },

    /// The operator is not in the operator set, or not allowed for the
    /// field's type.
    #[error("unknown operator '{operator}' for column '{column}'")]
    UnknownOperator {
        /// The field the operator was applied to.
        column: String,
        /// The operator token.
        operator: String,
    },

    /// A connective appears where it cannot (e.g. as the last token).
    #[error("invalid operator '{operator}' at position {position}")]
    InvalidOperator {
        /// The connective token.
        operator: String,
        /// Byte offset of the token in the input.
        position: usize,
    },

    /// A value failed type-specific parsing.
    #[error("invalid value for column '{column}': {message}")]
    InvalidValue {
        /// The field the value belongs to.
        column: String,
        /// Why the value was rejected.
        message: String,
    },

    /// An order-by instruction references a field the order registry does
    /// not know.
    #[error("unknown order column '{column}'{}", did_you_mean(.suggestion))]
    UnknownOrderColumn {
        /// The logical field name from the order-by string.
        column: String,
        /// The closest registered name, if any is close enough.
        suggestion: Option<String>,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{}'?)", name),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>) -> Self {
        FilterError::Syntax {
            message: message.into(),
        }
    }

    /// Creates an unknown column error.
    pub fn unknown_column(column: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownColumn {
            column: column.into(),
            suggestion,
        }
    }

    /// Creates an unknown operator error.
    pub fn unknown_operator(column: impl Into<String>, operator: impl Into<String>) -> Self {
        FilterError::UnknownOperator {
            column: column.into(),
            operator: operator.into(),
        }
    }

    /// Creates an invalid operator error.
    pub fn invalid_operator(operator: impl Into<String>, position: usize) -> Self {
        FilterError::InvalidOperator {
            operator: operator.into(),
            position,
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(column: impl Into<String>, message: impl Into<String>) -> Self {
        FilterError::InvalidValue {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown order column error.
    pub fn unknown_order_column(column: impl Into<String>, suggestion: Option<String>) -> Self {
        FilterError::UnknownOrderColumn {
            column: column.into(),
            suggestion,
        }
    }

    /// Returns a stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterError::Syntax { .. } => "SYNTAX_ERROR",
            FilterError::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            FilterError::UnknownOperator { .. } => "UNKNOWN_OPERATOR",
            FilterError::InvalidOperator { .. } => "INVALID_OPERATOR",
            FilterError::InvalidValue { .. } => "INVALID_VALUE",
            FilterError::UnknownOrderColumn { .. } => "UNKNOWN_ORDER_COLUMN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_message_with_suggestion() {
        let err = FilterError::unknown_column("nmae", Some("name".to_string()));
        assert_eq!(
            err.to_string(),
            "unknown column 'nmae' (did you mean 'name'?)"
        );
    }

    #[test]
    fn test_unknown_column_message_without_suggestion() {
        let err = FilterError::unknown_column("zzz", None);
        assert_eq!(err.to_string(), "unknown column 'zzz'");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(FilterError::syntax("x").kind(), "SYNTAX_ERROR");
        assert_eq!(
            FilterError::unknown_operator("a", "~").kind(),
            "UNKNOWN_OPERATOR"
        );
        assert_eq!(
            FilterError::invalid_operator("and", 7).kind(),
            "INVALID_OPERATOR"
        );
        assert_eq!(
            FilterError::invalid_value("a", "not a number").kind(),
            "INVALID_VALUE"
        );
        assert_eq!(
            FilterError::unknown_order_column("a", None).kind(),
            "UNKNOWN_ORDER_COLUMN"
        );
    }
}
