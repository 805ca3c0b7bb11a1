//! # Backend Errors
//!
//! Failures talking to the databases API.

use serde::Deserialize;
use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// Non-2xx response; `message` is the service's own message
    #[error("{message}")]
    Api {
        status: u16,
        kind: Option<String>,
        message: String,
    },

    /// Request never produced a response (connect, TLS, timeout)
    #[error("Request failed: {0}")]
    Transport(String),

    /// 2xx response whose body could not be decoded
    #[error("Invalid response from backend: {0}")]
    Decode(String),

    /// Credentials cannot be used to build a client
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
}

/// Error body returned by the service
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl BackendError {
    /// Build from a non-2xx status and the raw response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(parsed) => BackendError::Api {
                status,
                kind: parsed.kind,
                message: parsed.message,
            },
            Err(_) => BackendError::Api {
                status,
                kind: None,
                message: format!("HTTP {}", status),
            },
        }
    }

    /// HTTP status, if the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::Api { .. } => "APPWRITE_BACKEND_API",
            BackendError::Transport(_) => "APPWRITE_BACKEND_TRANSPORT",
            BackendError::Decode(_) => "APPWRITE_BACKEND_DECODE",
            BackendError::InvalidCredentials(_) => "APPWRITE_BACKEND_CREDENTIALS",
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}
