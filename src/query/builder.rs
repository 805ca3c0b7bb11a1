//! # Query Builder
//!
//! Turns structured query rows, as authored in the node's "Queries" collection,
//! into query expressions.
//!
//! Rows whose `queryType` is not in the kind table are skipped. New query
//! types can appear in the UI before this crate knows them, and an unknown row
//! must not fail the record. Custom query text deliberately behaves the other
//! way round (see [`super::parser`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::expression::QueryExpression;
use super::kind::{QueryKind, Shape};
use super::value::{QueryValue, Scalar};

/// One row of the structured query collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTuple {
    #[serde(default)]
    pub query_type: String,

    #[serde(default)]
    pub attribute: String,

    #[serde(default)]
    pub value: Option<Value>,

    /// Comma separated attribute names (select only)
    #[serde(default)]
    pub select_attributes: Option<String>,

    #[serde(default)]
    pub start_value: Option<Value>,

    #[serde(default)]
    pub end_value: Option<Value>,
}

impl QueryTuple {
    pub fn new(query_type: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            query_type: query_type.into(),
            attribute: attribute.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_range(mut self, start: Value, end: Value) -> Self {
        self.start_value = Some(start);
        self.end_value = Some(end);
        self
    }

    pub fn with_select(mut self, attributes: impl Into<String>) -> Self {
        self.select_attributes = Some(attributes.into());
        self
    }
}

/// Collection wrapper in the shape the UI stores it: `{"query": [...]}`
#[derive(Debug, Clone, Default, Deserialize)]
struct QueryCollection {
    #[serde(default)]
    query: Vec<QueryTuple>,
}

/// Structured query builder
pub struct QueryBuilder;

impl QueryBuilder {
    /// Read tuples out of the resolved `queries` parameter.
    ///
    /// An absent collection, or one whose `query` entry is not a list,
    /// yields no tuples.
    pub fn tuples_from_parameter(value: &Value) -> QueryResult<Vec<QueryTuple>> {
        let has_list = value
            .get("query")
            .map(Value::is_array)
            .unwrap_or(false);
        if !has_list {
            return Ok(Vec::new());
        }

        let collection: QueryCollection = serde_json::from_value(value.clone())
            .map_err(|e| QueryError::InvalidCollection(e.to_string()))?;
        Ok(collection.query)
    }

    /// Build one expression per recognized tuple, preserving input order
    pub fn build(tuples: &[QueryTuple]) -> QueryResult<Vec<QueryExpression>> {
        let mut expressions = Vec::with_capacity(tuples.len());
        for tuple in tuples {
            if let Some(expr) = Self::build_one(tuple)? {
                expressions.push(expr);
            }
        }
        Ok(expressions)
    }

    /// Build a single tuple; `Ok(None)` for an unrecognized query type
    pub fn build_one(tuple: &QueryTuple) -> QueryResult<Option<QueryExpression>> {
        let kind = match QueryKind::from_method(tuple.query_type.trim()) {
            Some(kind) => kind,
            None => return Ok(None),
        };

        let attribute = Some(tuple.attribute.clone());

        let expr = match kind.shape() {
            Shape::Single => QueryExpression::new(
                kind,
                attribute,
                vec![operand(kind, tuple.value.as_ref())?],
            )?,
            Shape::AttributeOnly => QueryExpression::new(kind, attribute, Vec::new())?,
            Shape::Range => QueryExpression::new(
                kind,
                attribute,
                vec![
                    operand(kind, tuple.start_value.as_ref())?,
                    operand(kind, tuple.end_value.as_ref())?,
                ],
            )?,
            Shape::Projection => {
                let raw = tuple.select_attributes.as_deref().unwrap_or("");
                QueryExpression::select(raw.split(','))?
            }
            Shape::Count => QueryExpression::limit(count(kind, tuple.value.as_ref())?),
        };

        Ok(Some(expr))
    }
}

/// Extract a scalar operand; an absent field is the UI default, an empty string
fn operand(kind: QueryKind, value: Option<&Value>) -> QueryResult<QueryValue> {
    match value {
        None | Some(Value::Null) => Ok(QueryValue::Scalar(Scalar::String(String::new()))),
        Some(v) => Scalar::from_json(v)
            .map(QueryValue::Scalar)
            .ok_or_else(|| QueryError::InvalidOperand {
                kind,
                reason: "values must be strings, numbers or booleans".to_string(),
            }),
    }
}

/// Extract a count from a number or a string of digits
fn count(kind: QueryKind, value: Option<&Value>) -> QueryResult<u64> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| QueryError::InvalidOperand {
        kind,
        reason: "value must be a non-negative integer".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builds_in_input_order() {
        let tuples = vec![
            QueryTuple::new("equal", "status").with_value(json!("active")),
            QueryTuple::new("orderDesc", "price"),
            QueryTuple::new("orderAsc", "name"),
        ];
        let exprs = QueryBuilder::build(&tuples).unwrap();
        let encoded: Vec<String> = exprs.iter().map(|e| e.encode()).collect();
        assert_eq!(
            encoded,
            vec![
                r#"equal("status", ["active"])"#,
                r#"orderDesc("price")"#,
                r#"orderAsc("name")"#,
            ]
        );
    }

    #[test]
    fn test_unknown_query_type_is_skipped() {
        let tuples = vec![
            QueryTuple::new("contains", "tags").with_value(json!("x")),
            QueryTuple::new("isNotNull", "email"),
        ];
        let exprs = QueryBuilder::build(&tuples).unwrap();
        assert_eq!(exprs.len(), 1);
        assert_eq!(exprs[0].kind(), QueryKind::IsNotNull);
    }

    #[test]
    fn test_select_splits_and_trims() {
        let tuple = QueryTuple::new("select", "").with_select("name, email,, createdAt ");
        let expr = QueryBuilder::build_one(&tuple).unwrap().unwrap();
        assert_eq!(expr.encode(), r#"select(["name","email","createdAt"])"#);
    }

    #[test]
    fn test_between_reads_start_and_end() {
        let tuple = QueryTuple::new("between", "price").with_range(json!(10), json!(100));
        let expr = QueryBuilder::build_one(&tuple).unwrap().unwrap();
        assert_eq!(expr.kind(), QueryKind::Between);
        assert_eq!(expr.attribute(), Some("price"));
        assert_eq!(expr.encode(), r#"between("price", 10, 100)"#);
    }

    #[test]
    fn test_values_pass_through_uncoerced() {
        let tuple = QueryTuple::new("equal", "zip").with_value(json!("02134"));
        let expr = QueryBuilder::build_one(&tuple).unwrap().unwrap();
        assert_eq!(expr.encode(), r#"equal("zip", ["02134"])"#);
    }

    #[test]
    fn test_missing_value_defaults_to_empty_string() {
        let tuple = QueryTuple::new("search", "title");
        let expr = QueryBuilder::build_one(&tuple).unwrap().unwrap();
        assert_eq!(expr.encode(), r#"search("title", [""])"#);
    }

    #[test]
    fn test_blank_attribute_is_an_error() {
        let tuple = QueryTuple::new("equal", " ").with_value(json!("x"));
        assert_eq!(
            QueryBuilder::build_one(&tuple).unwrap_err(),
            QueryError::MissingAttribute(QueryKind::Equal)
        );
    }

    #[test]
    fn test_tuples_from_parameter() {
        let param = json!({
            "query": [
                {"queryType": "equal", "attribute": "status", "value": "active"},
                {"queryType": "between", "attribute": "price", "startValue": "10", "endValue": "100"}
            ]
        });
        let tuples = QueryBuilder::tuples_from_parameter(&param).unwrap();
        assert_eq!(tuples.len(), 2);
        assert_eq!(tuples[1].start_value, Some(json!("10")));

        assert!(QueryBuilder::tuples_from_parameter(&json!({})).unwrap().is_empty());
        assert!(QueryBuilder::tuples_from_parameter(&json!({"query": "x"}))
            .unwrap()
            .is_empty());
    }
}
