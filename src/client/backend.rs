//! # Document Backend Trait
//!
//! The remote databases API as seen by the execution loop. The HTTP
//! implementation lives in [`super::http`]; tests substitute in-memory doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::BackendResult;
use crate::query::QueryExpression;

/// A document as returned by the service, system attributes (`$id`, ...) included
pub type Document = Map<String, Value>;

/// Response envelope of a list call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    /// Total matching documents, independent of any limit
    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub documents: Vec<Document>,

    /// Any further pagination metadata the service returns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DocumentList {
    /// The whole envelope as one mapping
    pub fn into_envelope(self) -> Document {
        let mut envelope = self.extra;
        envelope.insert("total".to_string(), Value::from(self.total));
        envelope.insert(
            "documents".to_string(),
            Value::Array(self.documents.into_iter().map(Value::Object).collect()),
        );
        envelope
    }
}

/// Document operations consumed from the databases API.
///
/// Implementations hold no per-call state and may be reused across records.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Fetch one document by ID
    async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> BackendResult<Document>;

    /// List documents matching `queries`, sent in the given order
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[QueryExpression],
    ) -> BackendResult<DocumentList>;

    /// Create a document. `None` permissions means the service defaults.
    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Document,
        permissions: Option<&[String]>,
    ) -> BackendResult<Document>;

    /// Liveness check
    async fn health(&self) -> BackendResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_keeps_extra_metadata() {
        let list: DocumentList = serde_json::from_value(json!({
            "total": 12,
            "documents": [{"$id": "a"}],
            "cursor": "a"
        }))
        .unwrap();
        assert_eq!(list.total, 12);
        assert_eq!(list.documents.len(), 1);

        let envelope = list.into_envelope();
        assert_eq!(envelope["total"], json!(12));
        assert_eq!(envelope["cursor"], json!("a"));
        assert_eq!(envelope["documents"], json!([{"$id": "a"}]));
    }
}
