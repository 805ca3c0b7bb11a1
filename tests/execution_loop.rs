//! Execution loop tests against an in-memory backend
//!
//! Covers record ordering, the continue-on-fail policy, list flattening,
//! limit placement and create-time ID generation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use appwrite_connector::client::{
    BackendError, BackendResult, Document, DocumentBackend, DocumentList,
};
use appwrite_connector::node::{DocumentExecutor, JsonContext, NodeError};
use appwrite_connector::query::QueryExpression;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Get(String),
    List(Vec<String>),
    Create {
        id: String,
        data: Document,
        permissions: Option<Vec<String>>,
    },
}

/// Backend double: fixed documents, a fixed listing, and a call log
#[derive(Default)]
struct MemoryBackend {
    documents: HashMap<String, Document>,
    listing: Vec<Document>,
    calls: Mutex<Vec<Call>>,
}

impl MemoryBackend {
    fn with_documents(ids: &[&str]) -> Self {
        let documents = ids.iter().map(|id| (id.to_string(), doc(id))).collect();
        Self {
            documents,
            listing: ids.iter().map(|id| doc(id)).collect(),
            ..Default::default()
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn get_document(
        &self,
        _database_id: &str,
        _collection_id: &str,
        document_id: &str,
    ) -> BackendResult<Document> {
        self.record(Call::Get(document_id.to_string()));
        self.documents
            .get(document_id)
            .cloned()
            .ok_or_else(|| BackendError::Api {
                status: 404,
                kind: Some("document_not_found".to_string()),
                message: "Document with the requested ID could not be found.".to_string(),
            })
    }

    async fn list_documents(
        &self,
        _database_id: &str,
        _collection_id: &str,
        queries: &[QueryExpression],
    ) -> BackendResult<DocumentList> {
        self.record(Call::List(queries.iter().map(QueryExpression::encode).collect()));
        Ok(DocumentList {
            total: self.listing.len() as u64,
            documents: self.listing.clone(),
            extra: Map::new(),
        })
    }

    async fn create_document(
        &self,
        _database_id: &str,
        _collection_id: &str,
        document_id: &str,
        data: &Document,
        permissions: Option<&[String]>,
    ) -> BackendResult<Document> {
        self.record(Call::Create {
            id: document_id.to_string(),
            data: data.clone(),
            permissions: permissions.map(<[String]>::to_vec),
        });
        let mut created = data.clone();
        created.insert("$id".to_string(), json!(document_id));
        Ok(created)
    }

    async fn health(&self) -> BackendResult<Value> {
        Ok(json!({"status": "pass"}))
    }
}

fn doc(id: &str) -> Document {
    let mut d = Map::new();
    d.insert("$id".to_string(), json!(id));
    d
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn context(base: Value, items: Vec<Value>) -> JsonContext {
    JsonContext::new(object(base)).with_items(items.into_iter().map(object).collect())
}

fn rows(rows: Vec<Document>) -> Vec<Value> {
    rows.into_iter().map(Value::Object).collect()
}

// =============================================================================
// CONTINUE-ON-FAIL
// =============================================================================

/// Test: a failing record becomes an error row in its own position.
#[tokio::test]
async fn test_continue_on_fail_keeps_record_order() {
    let backend = MemoryBackend::with_documents(&["a", "c"]);
    let ctx = context(
        json!({"operation": "get", "collectionId": "orders"}),
        vec![
            json!({"documentId": "a"}),
            json!({"documentId": "missing"}),
            json!({"documentId": "c"}),
        ],
    )
    .with_continue_on_fail(true);

    let mut executor = DocumentExecutor::new(&backend, "main");
    let output = executor.run(&ctx).await.unwrap();

    assert_eq!(
        rows(output),
        vec![
            json!({"$id": "a"}),
            json!({"error": "Document with the requested ID could not be found."}),
            json!({"$id": "c"}),
        ]
    );
    assert_eq!(backend.calls().len(), 3);
}

/// Test: without continue-on-fail the first failure aborts the run.
#[tokio::test]
async fn test_first_failure_aborts_run() {
    let backend = MemoryBackend::with_documents(&["a", "c"]);
    let ctx = context(
        json!({"operation": "get", "collectionId": "orders"}),
        vec![
            json!({"documentId": "a"}),
            json!({"documentId": "missing"}),
            json!({"documentId": "c"}),
        ],
    );

    let mut executor = DocumentExecutor::new(&backend, "main");
    let err = executor.run(&ctx).await.unwrap_err();

    assert_eq!(err.item_index(), 1);
    assert!(matches!(err, NodeError::Backend { .. }));
    assert_eq!(
        err.to_string(),
        "Document with the requested ID could not be found."
    );
    assert_eq!(
        backend.calls(),
        vec![Call::Get("a".to_string()), Call::Get("missing".to_string())]
    );
}

/// Test: parameter errors are record failures and never reach the backend.
#[tokio::test]
async fn test_validation_failure_becomes_error_row() {
    let backend = MemoryBackend::with_documents(&["a"]);
    let ctx = context(
        json!({"operation": "get"}),
        vec![
            json!({"documentId": "a"}),
            json!({"documentId": "a", "collectionId": "orders"}),
        ],
    )
    .with_continue_on_fail(true);

    let mut executor = DocumentExecutor::new(&backend, "main");
    let output = rows(executor.run(&ctx).await.unwrap());

    assert_eq!(output.len(), 2);
    assert!(output[0]["error"]
        .as_str()
        .unwrap()
        .contains("collectionId"));
    assert_eq!(output[1], json!({"$id": "a"}));
    assert_eq!(backend.calls(), vec![Call::Get("a".to_string())]);
}

// =============================================================================
// LIST
// =============================================================================

/// Test: returnAll flattens documents into rows and sends no limit.
#[tokio::test]
async fn test_return_all_flattens_in_order() {
    let backend = MemoryBackend::with_documents(&["a", "b", "c"]);
    let ctx = context(
        json!({
            "collectionId": "orders",
            "returnAll": true,
            "limit": 2,
            "queries": {"query": [{"queryType": "orderAsc", "attribute": "name"}]}
        }),
        vec![json!({}), json!({})],
    );

    let mut executor = DocumentExecutor::new(&backend, "main");
    let output = rows(executor.run(&ctx).await.unwrap());

    let ids: Vec<&str> = output.iter().map(|r| r["$id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "a", "b", "c"]);

    for call in backend.calls() {
        assert_eq!(call, Call::List(vec![r#"orderAsc("name")"#.to_string()]));
    }
}

/// Test: a limited list yields one envelope row with the limit sent last.
#[tokio::test]
async fn test_limited_list_returns_envelope() {
    let backend = MemoryBackend::with_documents(&["a", "b"]);
    let ctx = context(
        json!({
            "collectionId": "orders",
            "queries": {"query": [
                {"queryType": "equal", "attribute": "status", "value": "open"},
                {"queryType": "orderDesc", "attribute": "createdAt"}
            ]}
        }),
        vec![json!({})],
    );

    let mut executor = DocumentExecutor::new(&backend, "main");
    let output = rows(executor.run(&ctx).await.unwrap());

    assert_eq!(output.len(), 1);
    assert_eq!(output[0]["total"], json!(2));
    assert_eq!(output[0]["documents"], json!([{"$id": "a"}, {"$id": "b"}]));
    assert_eq!(
        backend.calls(),
        vec![Call::List(vec![
            r#"equal("status", ["open"])"#.to_string(),
            r#"orderDesc("createdAt")"#.to_string(),
            "limit(50)".to_string(),
        ])]
    );
}

/// Test: an empty listing under returnAll contributes no rows.
#[tokio::test]
async fn test_empty_listing_contributes_nothing() {
    let backend = MemoryBackend::default();
    let ctx = context(
        json!({"collectionId": "orders", "returnAll": true}),
        vec![json!({}), json!({"operation": "get", "documentId": "x"})],
    )
    .with_continue_on_fail(true);

    let mut executor = DocumentExecutor::new(&backend, "main");
    let output = rows(executor.run(&ctx).await.unwrap());

    assert_eq!(output.len(), 1);
    assert!(output[0].get("error").is_some());
}

// =============================================================================
// CREATE
// =============================================================================

/// Test: blank IDs are generated, distinct, and empty permissions are omitted.
#[tokio::test]
async fn test_create_generates_distinct_ids() {
    let backend = MemoryBackend::default();
    let ctx = context(
        json!({"operation": "create", "collectionId": "orders", "documentId": ""}),
        vec![
            json!({"documentData": {"total": 1}}),
            json!({"documentData": "{\"total\": 2}"}),
            json!({"documentData": {"total": 3}, "documentId": "order-3",
                   "permissions": ["read(\"any\")"]}),
        ],
    );

    let mut executor = DocumentExecutor::new(&backend, "main");
    let output = rows(executor.run(&ctx).await.unwrap());
    assert_eq!(output.len(), 3);

    let calls = backend.calls();
    let (first, second) = match (&calls[0], &calls[1]) {
        (
            Call::Create {
                id: a,
                permissions: None,
                ..
            },
            Call::Create {
                id: b,
                permissions: None,
                data,
            },
        ) => {
            assert_eq!(data["total"], json!(2));
            (a.clone(), b.clone())
        }
        other => panic!("unexpected calls: {:?}", other),
    };
    assert_ne!(first, second);
    assert_eq!(first.len(), 20);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(
        calls[2],
        Call::Create {
            id: "order-3".to_string(),
            data: object(json!({"total": 3})),
            permissions: Some(vec![r#"read("any")"#.to_string()]),
        }
    );
    assert_eq!(output[2]["$id"], json!("order-3"));
}

/// Test: malformed document data fails the record, not the run.
#[tokio::test]
async fn test_invalid_document_data() {
    let backend = MemoryBackend::default();
    let ctx = context(
        json!({"operation": "create", "collectionId": "orders"}),
        vec![json!({"documentData": "{not json"}), json!({"documentData": {"ok": true}})],
    )
    .with_continue_on_fail(true);

    let mut executor = DocumentExecutor::new(&backend, "main");
    let output = rows(executor.run(&ctx).await.unwrap());

    assert_eq!(
        output[0],
        json!({"error": "Document Data must be valid JSON or an object"})
    );
    assert_eq!(output[1]["ok"], json!(true));
    assert_eq!(backend.calls().len(), 1);
}
