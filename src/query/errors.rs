//! # Query Errors
//!
//! Error types for query construction and custom query parsing.

use thiserror::Error;

use super::kind::QueryKind;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Operand count does not match the kind's shape
    #[error("{kind} expects {expected}, got {found}")]
    Arity {
        kind: QueryKind,
        expected: &'static str,
        found: usize,
    },

    /// Operand has the wrong type for the kind
    #[error("{kind}: {reason}")]
    InvalidOperand { kind: QueryKind, reason: String },

    /// Kind requires an attribute but none (or a blank one) was given
    #[error("{0} requires an attribute")]
    MissingAttribute(QueryKind),

    /// Kind does not take an attribute
    #[error("{0} does not take an attribute")]
    UnexpectedAttribute(QueryKind),

    /// Structured query collection could not be read
    #[error("Invalid query collection: {0}")]
    InvalidCollection(String),

    /// A custom query line could not be turned into an expression
    #[error("Invalid query on line {line}: {text}. {fault}")]
    InvalidLine {
        line: usize,
        text: String,
        fault: LineFault,
    },
}

impl QueryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Arity { .. } => "APPWRITE_QUERY_ARITY",
            QueryError::InvalidOperand { .. } => "APPWRITE_QUERY_OPERAND",
            QueryError::MissingAttribute(_) | QueryError::UnexpectedAttribute(_) => {
                "APPWRITE_QUERY_ATTRIBUTE"
            }
            QueryError::InvalidCollection(_) => "APPWRITE_QUERY_COLLECTION",
            QueryError::InvalidLine { .. } => "APPWRITE_QUERY_SYNTAX",
        }
    }
}

/// Why a custom query line was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineFault {
    #[error("Unknown query method '{0}'")]
    UnknownMethod(String),

    #[error("Unterminated string literal starting at column {0}")]
    UnterminatedString(usize),

    #[error("Expected {expected} at column {column}")]
    Expected {
        expected: &'static str,
        column: usize,
    },

    #[error("Invalid literal '{0}'")]
    InvalidLiteral(String),

    #[error("Unexpected trailing input at column {0}")]
    TrailingInput(usize),

    /// Statement parsed but does not form a valid expression
    #[error("{0}")]
    Shape(Box<QueryError>),
}
