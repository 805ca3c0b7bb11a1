//! # Node Errors
//!
//! Record-scoped failures raised while resolving or executing one input record.

use thiserror::Error;

use crate::client::BackendError;
use crate::query::QueryError;

/// Result type for node execution
pub type NodeResult<T> = Result<T, NodeError>;

/// Record-scoped execution errors.
///
/// `Display` renders the bare message so it can be surfaced verbatim; the
/// offending record is available through [`NodeError::item_index`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// Malformed input: bad custom query line, arity mismatch, non-mapping
    /// document data, malformed permissions
    #[error("{message}")]
    Validation { item_index: usize, message: String },

    /// The backend rejected the call or could not be reached
    #[error("{source}")]
    Backend {
        item_index: usize,
        #[source]
        source: BackendError,
    },

    /// A required parameter for the selected operation is missing or unusable
    #[error("{message}")]
    Configuration { item_index: usize, message: String },
}

impl NodeError {
    pub fn validation(item_index: usize, message: impl Into<String>) -> Self {
        NodeError::Validation {
            item_index,
            message: message.into(),
        }
    }

    pub fn configuration(item_index: usize, message: impl Into<String>) -> Self {
        NodeError::Configuration {
            item_index,
            message: message.into(),
        }
    }

    pub fn backend(item_index: usize, source: BackendError) -> Self {
        NodeError::Backend { item_index, source }
    }

    /// Wrap a query construction failure as a validation error
    pub fn query(item_index: usize, err: QueryError) -> Self {
        Self::validation(item_index, err.to_string())
    }

    /// Index of the input record that failed
    pub fn item_index(&self) -> usize {
        match self {
            NodeError::Validation { item_index, .. }
            | NodeError::Backend { item_index, .. }
            | NodeError::Configuration { item_index, .. } => *item_index,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            NodeError::Validation { .. } => "APPWRITE_VALIDATION_ERROR",
            NodeError::Backend { .. } => "APPWRITE_BACKEND_ERROR",
            NodeError::Configuration { .. } => "APPWRITE_CONFIGURATION_ERROR",
        }
    }
}
