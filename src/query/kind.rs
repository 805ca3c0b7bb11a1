//! Query kind table
//!
//! The closed vocabulary of query methods understood by the databases API,
//! together with the operand shape each method requires.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Query methods supported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QueryKind {
    Equal,
    NotEqual,
    LessThan,
    #[serde(rename = "lessThanEqual")]
    LessThanOrEqual,
    GreaterThan,
    #[serde(rename = "greaterThanEqual")]
    GreaterThanOrEqual,
    Search,
    IsNull,
    IsNotNull,
    Between,
    StartsWith,
    EndsWith,
    Select,
    OrderAsc,
    OrderDesc,
    Limit,
}

/// Operand shape required by a query kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Attribute plus exactly one scalar value
    Single,
    /// Attribute only
    AttributeOnly,
    /// Attribute plus a start and an end value
    Range,
    /// No attribute; one list of attribute names
    Projection,
    /// No attribute; one non-negative integer
    Count,
}

impl Shape {
    /// Human readable operand requirement, used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Shape::Single => "exactly one value",
            Shape::AttributeOnly => "no values",
            Shape::Range => "exactly two values",
            Shape::Projection => "one list of attributes",
            Shape::Count => "one non-negative integer",
        }
    }

    /// Number of operands this shape takes (excluding the attribute)
    pub fn operand_count(&self) -> usize {
        match self {
            Shape::AttributeOnly => 0,
            Shape::Single | Shape::Projection | Shape::Count => 1,
            Shape::Range => 2,
        }
    }
}

impl QueryKind {
    /// Every kind, in the order the builder UI lists them
    pub const ALL: [QueryKind; 16] = [
        QueryKind::Equal,
        QueryKind::NotEqual,
        QueryKind::LessThan,
        QueryKind::LessThanOrEqual,
        QueryKind::GreaterThan,
        QueryKind::GreaterThanOrEqual,
        QueryKind::Search,
        QueryKind::IsNull,
        QueryKind::IsNotNull,
        QueryKind::Between,
        QueryKind::StartsWith,
        QueryKind::EndsWith,
        QueryKind::Select,
        QueryKind::OrderAsc,
        QueryKind::OrderDesc,
        QueryKind::Limit,
    ];

    /// Method name as it appears on the wire
    pub fn method(&self) -> &'static str {
        match self {
            QueryKind::Equal => "equal",
            QueryKind::NotEqual => "notEqual",
            QueryKind::LessThan => "lessThan",
            QueryKind::LessThanOrEqual => "lessThanEqual",
            QueryKind::GreaterThan => "greaterThan",
            QueryKind::GreaterThanOrEqual => "greaterThanEqual",
            QueryKind::Search => "search",
            QueryKind::IsNull => "isNull",
            QueryKind::IsNotNull => "isNotNull",
            QueryKind::Between => "between",
            QueryKind::StartsWith => "startsWith",
            QueryKind::EndsWith => "endsWith",
            QueryKind::Select => "select",
            QueryKind::OrderAsc => "orderAsc",
            QueryKind::OrderDesc => "orderDesc",
            QueryKind::Limit => "limit",
        }
    }

    /// Look up a kind by its method name (case-sensitive)
    pub fn from_method(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.method() == name)
    }

    /// Operand shape for this kind
    pub fn shape(&self) -> Shape {
        match self {
            QueryKind::Equal
            | QueryKind::NotEqual
            | QueryKind::LessThan
            | QueryKind::LessThanOrEqual
            | QueryKind::GreaterThan
            | QueryKind::GreaterThanOrEqual
            | QueryKind::Search
            | QueryKind::StartsWith
            | QueryKind::EndsWith => Shape::Single,
            QueryKind::IsNull | QueryKind::IsNotNull | QueryKind::OrderAsc | QueryKind::OrderDesc => {
                Shape::AttributeOnly
            }
            QueryKind::Between => Shape::Range,
            QueryKind::Select => Shape::Projection,
            QueryKind::Limit => Shape::Count,
        }
    }

    /// Whether expressions of this kind name an attribute
    pub fn takes_attribute(&self) -> bool {
        !matches!(self.shape(), Shape::Projection | Shape::Count)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}
