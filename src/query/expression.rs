//! # Query Expression
//!
//! A single validated filter, sort, projection or pagination directive and
//! its wire encoding.

use std::fmt;

use super::errors::{QueryError, QueryResult};
use super::kind::{QueryKind, Shape};
use super::value::{encode_list, encode_string, QueryValue, Scalar};

/// A validated query expression.
///
/// Construction checks the operand shape against the kind table, so every
/// value of this type encodes to a well-formed backend query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryExpression {
    kind: QueryKind,
    attribute: Option<String>,
    operands: Vec<QueryValue>,
}

impl QueryExpression {
    /// Create an expression, validating attribute and operands for `kind`.
    ///
    /// Select lists are normalised: entries are trimmed and empty ones dropped.
    pub fn new(
        kind: QueryKind,
        attribute: Option<String>,
        operands: Vec<QueryValue>,
    ) -> QueryResult<Self> {
        let shape = kind.shape();

        let attribute = match (kind.takes_attribute(), attribute) {
            (true, Some(attr)) if !attr.trim().is_empty() => Some(attr),
            (true, _) => return Err(QueryError::MissingAttribute(kind)),
            (false, Some(_)) => return Err(QueryError::UnexpectedAttribute(kind)),
            (false, None) => None,
        };

        if operands.len() != shape.operand_count() {
            return Err(QueryError::Arity {
                kind,
                expected: shape.describe(),
                found: operands.len(),
            });
        }

        let operands = match shape {
            Shape::Single | Shape::Range => {
                if operands.iter().any(|op| op.as_scalar().is_none()) {
                    return Err(QueryError::InvalidOperand {
                        kind,
                        reason: "values must be strings, numbers or booleans".to_string(),
                    });
                }
                operands
            }
            Shape::AttributeOnly => operands,
            Shape::Projection => vec![normalize_projection(kind, operands)?],
            Shape::Count => {
                if operands[0].as_scalar().and_then(Scalar::as_u64).is_none() {
                    return Err(QueryError::InvalidOperand {
                        kind,
                        reason: "value must be a non-negative integer".to_string(),
                    });
                }
                operands
            }
        };

        Ok(Self {
            kind,
            attribute,
            operands,
        })
    }

    pub fn equal(attribute: impl Into<String>, value: impl Into<Scalar>) -> QueryResult<Self> {
        Self::single(QueryKind::Equal, attribute, value)
    }

    pub fn not_equal(attribute: impl Into<String>, value: impl Into<Scalar>) -> QueryResult<Self> {
        Self::single(QueryKind::NotEqual, attribute, value)
    }

    pub fn greater_than(
        attribute: impl Into<String>,
        value: impl Into<Scalar>,
    ) -> QueryResult<Self> {
        Self::single(QueryKind::GreaterThan, attribute, value)
    }

    pub fn less_than(attribute: impl Into<String>, value: impl Into<Scalar>) -> QueryResult<Self> {
        Self::single(QueryKind::LessThan, attribute, value)
    }

    /// Create an expression with an attribute and exactly one value
    pub fn single(
        kind: QueryKind,
        attribute: impl Into<String>,
        value: impl Into<Scalar>,
    ) -> QueryResult<Self> {
        Self::new(
            kind,
            Some(attribute.into()),
            vec![QueryValue::Scalar(value.into())],
        )
    }

    pub fn between(
        attribute: impl Into<String>,
        start: impl Into<Scalar>,
        end: impl Into<Scalar>,
    ) -> QueryResult<Self> {
        Self::new(
            QueryKind::Between,
            Some(attribute.into()),
            vec![QueryValue::Scalar(start.into()), QueryValue::Scalar(end.into())],
        )
    }

    pub fn is_null(attribute: impl Into<String>) -> QueryResult<Self> {
        Self::new(QueryKind::IsNull, Some(attribute.into()), Vec::new())
    }

    pub fn order_asc(attribute: impl Into<String>) -> QueryResult<Self> {
        Self::new(QueryKind::OrderAsc, Some(attribute.into()), Vec::new())
    }

    pub fn order_desc(attribute: impl Into<String>) -> QueryResult<Self> {
        Self::new(QueryKind::OrderDesc, Some(attribute.into()), Vec::new())
    }

    /// Projection over the given attribute names
    pub fn select<I, S>(attributes: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = attributes
            .into_iter()
            .map(|a| Scalar::String(a.into()))
            .collect();
        Self::new(QueryKind::Select, None, vec![QueryValue::List(list)])
    }

    /// Page size limit. Infallible: any `u64` is a valid count.
    pub fn limit(limit: u64) -> Self {
        Self {
            kind: QueryKind::Limit,
            attribute: None,
            operands: vec![QueryValue::Scalar(Scalar::from(limit))],
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn operands(&self) -> &[QueryValue] {
        &self.operands
    }

    /// Encode into the backend's call-like query grammar.
    ///
    /// ```text
    /// equal("status", ["active"])
    /// between("price", 10, 100)
    /// isNull("deletedAt")
    /// select(["name","email"])
    /// limit(25)
    /// ```
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(32);
        out.push_str(self.kind.method());
        out.push('(');

        if let Some(attr) = &self.attribute {
            encode_string(attr, &mut out);
        }

        match self.kind.shape() {
            Shape::Single => {
                out.push_str(", [");
                self.operands[0].encode_into(&mut out);
                out.push(']');
            }
            Shape::Range => {
                for op in &self.operands {
                    out.push_str(", ");
                    op.encode_into(&mut out);
                }
            }
            Shape::AttributeOnly => {}
            Shape::Projection => match &self.operands[0] {
                QueryValue::List(items) => encode_list(items, &mut out),
                QueryValue::Scalar(s) => encode_list(std::slice::from_ref(s), &mut out),
            },
            Shape::Count => self.operands[0].encode_into(&mut out),
        }

        out.push(')');
        out
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Collapse a select operand into a trimmed list of non-empty attribute names
fn normalize_projection(kind: QueryKind, mut operands: Vec<QueryValue>) -> QueryResult<QueryValue> {
    let items = match operands.remove(0) {
        QueryValue::List(items) => items,
        QueryValue::Scalar(s) => vec![s],
    };

    let mut names = Vec::with_capacity(items.len());
    for item in items {
        let name = item.as_str().ok_or_else(|| QueryError::InvalidOperand {
            kind,
            reason: "attribute names must be strings".to_string(),
        })?;
        let name = name.trim();
        if !name.is_empty() {
            names.push(Scalar::String(name.to_string()));
        }
    }

    if names.is_empty() {
        return Err(QueryError::InvalidOperand {
            kind,
            reason: "at least one attribute is required".to_string(),
        });
    }

    Ok(QueryValue::List(names))
}
