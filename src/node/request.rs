//! # Operation Requests
//!
//! Resolves one input record's parameters into an [`OperationRequest`].
//! Everything that can fail without touching the backend fails here.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::NodeContext;
use super::errors::{NodeError, NodeResult};
use crate::client::{Document, IdGenerator};
use crate::query::{CustomQueryParser, QueryBuilder, QueryExpression};

/// Page size used when the limit parameter is not set
pub const DEFAULT_LIMIT: u64 = 50;

/// The only resource this connector exposes
pub const DOCUMENT_RESOURCE: &str = "document";

/// Document operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Get,
    List,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::List => "list",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Operation::Create),
            "get" => Some(Operation::Get),
            "list" => Some(Operation::List),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How list queries are authored. Exactly one mode applies per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Builder,
    Custom,
}

impl QueryMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "builder" => Some(QueryMode::Builder),
            "custom" => Some(QueryMode::Custom),
            _ => None,
        }
    }
}

/// A fully resolved request for one input record
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRequest {
    pub operation: Operation,
    pub collection_id: String,
    pub document_id: Option<String>,
    pub document_data: Option<Document>,
    /// Empty means the backend's default permissions
    pub permissions: Vec<String>,
    /// Final query sequence for list, limit included
    pub queries: Vec<QueryExpression>,
    pub return_all: bool,
    pub limit: Option<u64>,
}

impl OperationRequest {
    fn empty(operation: Operation, collection_id: String) -> Self {
        Self {
            operation,
            collection_id,
            document_id: None,
            document_data: None,
            permissions: Vec::new(),
            queries: Vec::new(),
            return_all: false,
            limit: None,
        }
    }

    /// Resolve record `item_index`. Blank create IDs are filled from `ids`.
    pub fn resolve<C: NodeContext + ?Sized>(
        ctx: &C,
        item_index: usize,
        ids: &mut IdGenerator,
    ) -> NodeResult<Self> {
        let resource = ctx
            .string_parameter("resource", item_index)?
            .unwrap_or_else(|| DOCUMENT_RESOURCE.to_string());
        if resource != DOCUMENT_RESOURCE {
            return Err(NodeError::configuration(
                item_index,
                format!("Unsupported resource: {}", resource),
            ));
        }

        let operation = match ctx.string_parameter("operation", item_index)? {
            None => Operation::List,
            Some(op) => Operation::parse(op.trim()).ok_or_else(|| {
                NodeError::configuration(item_index, format!("Unsupported operation: {}", op))
            })?,
        };

        let collection_id = required_string(ctx, "collectionId", item_index)?;
        let mut request = Self::empty(operation, collection_id);

        match operation {
            Operation::Get => {
                request.document_id = Some(required_string(ctx, "documentId", item_index)?);
            }
            Operation::List => {
                request.return_all = ctx
                    .boolean_parameter("returnAll", item_index)?
                    .unwrap_or(false);
                request.queries = resolve_queries(ctx, item_index)?;
                if !request.return_all {
                    let limit = resolve_limit(ctx, item_index)?;
                    request.limit = Some(limit);
                    append_limit(&mut request.queries, limit);
                }
            }
            Operation::Create => {
                let data = ctx
                    .json_parameter("documentData", item_index)
                    .ok_or_else(|| {
                        NodeError::configuration(item_index, "Missing required parameter: documentData")
                    })?;
                request.document_data = Some(parse_document_data(data, item_index)?);
                request.permissions =
                    parse_permissions(ctx.json_parameter("permissions", item_index), item_index)?;

                let document_id = ctx
                    .string_parameter("documentId", item_index)?
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| ids.unique());
                request.document_id = Some(document_id);
            }
        }

        Ok(request)
    }

    /// Permissions as sent to the backend: `None` when empty
    pub fn permissions_for_backend(&self) -> Option<&[String]> {
        if self.permissions.is_empty() {
            None
        } else {
            Some(&self.permissions)
        }
    }
}

fn required_string<C: NodeContext + ?Sized>(
    ctx: &C,
    name: &str,
    item_index: usize,
) -> NodeResult<String> {
    ctx.string_parameter(name, item_index)?
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            NodeError::configuration(item_index, format!("Missing required parameter: {}", name))
        })
}

/// Build user queries from whichever mode is selected
fn resolve_queries<C: NodeContext + ?Sized>(
    ctx: &C,
    item_index: usize,
) -> NodeResult<Vec<QueryExpression>> {
    let mode = match ctx.string_parameter("queryMode", item_index)? {
        None => QueryMode::Builder,
        Some(mode) => QueryMode::parse(mode.trim()).ok_or_else(|| {
            NodeError::configuration(item_index, format!("Unsupported query mode: {}", mode))
        })?,
    };

    match mode {
        QueryMode::Custom => {
            let text = ctx
                .string_parameter("customQueries", item_index)?
                .unwrap_or_default();
            CustomQueryParser::parse(&text).map_err(|e| NodeError::query(item_index, e))
        }
        QueryMode::Builder => {
            let collection = match ctx.json_parameter("queries", item_index) {
                Some(value) => value,
                None => return Ok(Vec::new()),
            };
            let tuples = QueryBuilder::tuples_from_parameter(&collection)
                .map_err(|e| NodeError::query(item_index, e))?;
            QueryBuilder::build(&tuples).map_err(|e| NodeError::query(item_index, e))
        }
    }
}

/// Page size for a non-return-all list: a positive integer
/// Largest limit an `f64` parameter carries exactly (2^53)
const MAX_LIMIT: f64 = 9_007_199_254_740_992.0;

fn resolve_limit<C: NodeContext + ?Sized>(ctx: &C, item_index: usize) -> NodeResult<u64> {
    let limit = match ctx.number_parameter("limit", item_index)? {
        None => return Ok(DEFAULT_LIMIT),
        Some(limit) => limit,
    };

    if limit < 1.0 || limit.fract() != 0.0 || !limit.is_finite() {
        return Err(NodeError::validation(
            item_index,
            format!("Limit must be a positive integer, got {}", limit),
        ));
    }
    if limit > MAX_LIMIT {
        return Err(NodeError::validation(
            item_index,
            format!("Limit must not exceed {}, got {}", MAX_LIMIT, limit),
        ));
    }
    Ok(limit as u64)
}

/// Append the pagination limit after all user expressions.
///
/// A limit already present in the user's queries is kept; both are sent and
/// the backend decides precedence.
pub fn append_limit(queries: &mut Vec<QueryExpression>, limit: u64) {
    queries.push(QueryExpression::limit(limit));
}

/// Document data must be a mapping, given either structured or as JSON text
pub fn parse_document_data(value: Value, item_index: usize) -> NodeResult<Document> {
    let invalid = || NodeError::validation(item_index, "Document Data must be valid JSON or an object");

    match value {
        Value::Object(map) => Ok(map),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => Ok(map),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

/// Permissions must be a list of strings, given structured or as JSON text.
/// Absent or blank means no explicit permissions.
pub fn parse_permissions(value: Option<Value>, item_index: usize) -> NodeResult<Vec<String>> {
    let not_array = || NodeError::validation(item_index, "Permissions must be a valid JSON array");

    let items = match value {
        None => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(Vec::new()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            _ => return Err(not_array()),
        },
        Some(_) => return Err(not_array()),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(NodeError::validation(
                item_index,
                "Permissions must be an array of strings",
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::context::JsonContext;
    use crate::query::QueryKind;
    use serde_json::{json, Map};

    fn ctx(params: Value) -> JsonContext {
        match params {
            Value::Object(m) => JsonContext::new(m),
            _ => panic!("expected object"),
        }
    }

    fn resolve(params: Value) -> NodeResult<OperationRequest> {
        OperationRequest::resolve(&ctx(params), 0, &mut IdGenerator::new())
    }

    #[test]
    fn test_defaults_to_list_with_limit() {
        let req = resolve(json!({"collectionId": "orders"})).unwrap();
        assert_eq!(req.operation, Operation::List);
        assert_eq!(req.limit, Some(DEFAULT_LIMIT));
        assert_eq!(req.queries.len(), 1);
        assert_eq!(req.queries[0].encode(), "limit(50)");
    }

    #[test]
    fn test_missing_collection_is_configuration_error() {
        let err = resolve(json!({"operation": "get", "documentId": "x"})).unwrap_err();
        assert!(matches!(err, NodeError::Configuration { .. }));
        assert!(err.to_string().contains("collectionId"));
    }

    #[test]
    fn test_get_requires_document_id() {
        let err = resolve(json!({"operation": "get", "collectionId": "c", "documentId": "  "}))
            .unwrap_err();
        assert!(matches!(err, NodeError::Configuration { .. }));
    }

    #[test]
    fn test_unsupported_resource_and_operation() {
        let err = resolve(json!({"resource": "bucket", "collectionId": "c"})).unwrap_err();
        assert!(matches!(err, NodeError::Configuration { .. }));

        let err = resolve(json!({"operation": "delete", "collectionId": "c"})).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported operation: delete");
    }

    #[test]
    fn test_return_all_sends_no_limit() {
        let req = resolve(json!({
            "collectionId": "c",
            "returnAll": true,
            "queries": {"query": [{"queryType": "orderAsc", "attribute": "name"}]}
        }))
        .unwrap();
        assert_eq!(req.limit, None);
        assert!(req.queries.iter().all(|q| q.kind() != QueryKind::Limit));
    }

    #[test]
    fn test_limit_must_be_positive_integer() {
        for limit in [json!(0), json!(-3), json!(2.5)] {
            let err = resolve(json!({"collectionId": "c", "limit": limit})).unwrap_err();
            assert!(matches!(err, NodeError::Validation { .. }));
        }
    }

    #[test]
    fn test_limit_out_of_range_rejected() {
        for limit in [json!(1e30), json!(18_014_398_509_481_984u64)] {
            let err = resolve(json!({"collectionId": "c", "limit": limit})).unwrap_err();
            assert!(matches!(err, NodeError::Validation { .. }));
            assert!(err.to_string().contains("must not exceed"));
        }

        let req = resolve(json!({"collectionId": "c", "limit": 9_007_199_254_740_992u64})).unwrap();
        assert_eq!(req.limit, Some(9_007_199_254_740_992));
    }

    #[test]
    fn test_custom_mode_ignores_builder_rows() {
        let req = resolve(json!({
            "collectionId": "c",
            "queryMode": "custom",
            "customQueries": "Query.isNull(\"deletedAt\")",
            "queries": {"query": [{"queryType": "orderAsc", "attribute": "name"}]},
            "limit": 5
        }))
        .unwrap();
        let encoded: Vec<String> = req.queries.iter().map(|q| q.encode()).collect();
        assert_eq!(encoded, vec![r#"isNull("deletedAt")"#, "limit(5)"]);
    }

    #[test]
    fn test_create_generates_id_for_blank_input() {
        let req = resolve(json!({
            "operation": "create",
            "collectionId": "c",
            "documentId": " ",
            "documentData": "{\"name\": \"Ada\"}"
        }))
        .unwrap();
        let id = req.document_id.unwrap();
        assert!(!id.trim().is_empty());
        assert_eq!(req.document_data.unwrap()["name"], json!("Ada"));
        assert!(req.permissions.is_empty());
    }

    #[test]
    fn test_create_keeps_explicit_id() {
        let req = resolve(json!({
            "operation": "create",
            "collectionId": "c",
            "documentId": "order-1",
            "documentData": {"total": 3},
            "permissions": "[\"read(\\\"any\\\")\"]"
        }))
        .unwrap();
        assert_eq!(req.document_id.as_deref(), Some("order-1"));
        assert_eq!(req.permissions, vec![r#"read("any")"#.to_string()]);
        assert!(req.permissions_for_backend().is_some());
    }

    #[test]
    fn test_document_data_must_be_mapping() {
        assert!(parse_document_data(json!({"a": 1}), 0).is_ok());
        assert!(parse_document_data(json!("{\"a\": 1}"), 0).is_ok());
        assert!(parse_document_data(json!("[1, 2]"), 0).is_err());
        assert!(parse_document_data(json!("not json"), 0).is_err());
        assert!(parse_document_data(json!(7), 0).is_err());
    }

    #[test]
    fn test_permissions_parsing() {
        assert_eq!(parse_permissions(None, 0).unwrap(), Vec::<String>::new());
        assert_eq!(parse_permissions(Some(json!("[]")), 0).unwrap(), Vec::<String>::new());
        assert_eq!(
            parse_permissions(Some(json!(["read(\"any\")"])), 0).unwrap(),
            vec!["read(\"any\")".to_string()]
        );
        assert!(parse_permissions(Some(json!("{\"a\": 1}")), 0).is_err());
        assert!(parse_permissions(Some(json!([1, 2])), 0).is_err());
        assert!(parse_permissions(Some(json!({"a": 1})), 0).is_err());
    }

    #[test]
    fn test_item_index_is_reported() {
        let ctx = ctx(json!({"collectionId": "c", "operation": "create"}))
            .with_items(vec![Map::new(), Map::new(), Map::new()]);
        let err = OperationRequest::resolve(&ctx, 2, &mut IdGenerator::new()).unwrap_err();
        assert_eq!(err.item_index(), 2);
    }
}
