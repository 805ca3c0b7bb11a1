//! # Document Node
//!
//! The per-record execution loop that a host workflow engine drives:
//! parameter resolution, query construction, dispatch of create/get/list to
//! a [`DocumentBackend`](crate::client::DocumentBackend), and flattening of
//! results into output rows under the continue-on-fail policy.

mod context;
mod errors;
mod executor;
mod request;
mod result;

pub use context::{JsonContext, NodeContext};
pub use errors::{NodeError, NodeResult};
pub use executor::DocumentExecutor;
pub use request::{
    append_limit, parse_document_data, parse_permissions, Operation, OperationRequest, QueryMode,
    DEFAULT_LIMIT, DOCUMENT_RESOURCE,
};
pub use result::{OperationResult, ResultAggregator};
