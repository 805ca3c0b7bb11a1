//! # Query Construction
//!
//! Builds the ordered list of query expressions sent with a list request,
//! from either of two mutually exclusive inputs:
//!
//! - structured builder rows ([`QueryBuilder`])
//! - free-text custom query lines ([`CustomQueryParser`])
//!
//! Both map onto the same closed [`QueryKind`] table and produce
//! [`QueryExpression`]s that encode to the backend's query grammar.

mod builder;
mod errors;
mod expression;
mod kind;
mod parser;
mod value;

pub use builder::{QueryBuilder, QueryTuple};
pub use errors::{LineFault, QueryError, QueryResult};
pub use expression::QueryExpression;
pub use kind::{QueryKind, Shape};
pub use parser::CustomQueryParser;
pub use value::{QueryValue, Scalar};
