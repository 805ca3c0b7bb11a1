//! appwrite-connector - document CRUD against an Appwrite-style databases API
//!
//! The crate is organized the way a record flows through it:
//!
//! - [`query`]: typed query expressions, the structured builder and the
//!   custom query text parser, all producing the backend's wire strings
//! - [`client`]: credentials, the `DocumentBackend` seam and its HTTP
//!   implementation, and document ID generation
//! - [`node`]: per-record parameter resolution and the execution loop with
//!   its continue-on-fail policy
//! - [`observability`]: tracing subscriber setup
//! - [`cli`]: a command-line host for running the node outside a workflow
//!   engine

pub mod cli;
pub mod client;
pub mod node;
pub mod observability;
pub mod query;
