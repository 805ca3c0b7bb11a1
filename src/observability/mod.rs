//! Observability for the connector
//!
//! Logging goes through `tracing`; this module only installs the subscriber.
//! The library never installs one itself, so an embedding host keeps control.

mod logger;

pub use logger::{build_filter, init, LogFormat};
