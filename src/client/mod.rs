//! # Backend Client
//!
//! Everything needed to talk to the databases API:
//!
//! - [`CredentialSet`]: endpoint, project, database and API key
//! - [`DocumentBackend`]: the get/list/create/health contract
//! - [`HttpBackend`]: the REST implementation of that contract
//! - [`IdGenerator`]: client-side unique document IDs

mod backend;
mod credentials;
mod errors;
mod http;
mod id;

pub use backend::{Document, DocumentBackend, DocumentList};
pub use credentials::{CredentialSet, DEFAULT_ENDPOINT};
pub use errors::{BackendError, BackendResult};
pub use http::{HttpBackend, DEFAULT_TIMEOUT};
pub use id::{IdGenerator, ID_PADDING};
