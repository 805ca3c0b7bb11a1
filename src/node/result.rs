//! Per-record results and their flattening into output rows

use serde_json::{Map, Value};

use crate::client::Document;

/// Outcome of one input record
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    /// One row: a document or a list envelope
    Document(Document),
    /// One row per document, in response order
    Documents(Vec<Document>),
    /// One `{error}` row (continue-on-fail)
    Error { error: String },
}

impl OperationResult {
    pub fn error(message: impl Into<String>) -> Self {
        OperationResult::Error {
            error: message.into(),
        }
    }

    /// Number of output rows this result expands to
    pub fn row_count(&self) -> usize {
        match self {
            OperationResult::Documents(docs) => docs.len(),
            _ => 1,
        }
    }
}

/// Concatenates results in record order. No reordering, no deduplication.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    rows: Vec<Document>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: OperationResult) {
        match result {
            OperationResult::Document(doc) => self.rows.push(doc),
            OperationResult::Documents(docs) => self.rows.extend(docs),
            OperationResult::Error { error } => {
                let mut row = Map::new();
                row.insert("error".to_string(), Value::String(error));
                self.rows.push(row);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn into_rows(self) -> Vec<Document> {
        self.rows
    }
}
