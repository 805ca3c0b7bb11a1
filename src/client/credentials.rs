//! Credential set for the databases API

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{BackendError, BackendResult};

/// Public cloud endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

/// Connection credentials, supplied once per run and read-only afterwards
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSet {
    #[serde(default = "default_endpoint")]
    pub api_endpoint: String,

    pub project_id: String,

    pub database_id: String,

    pub api_key: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl CredentialSet {
    pub fn new(
        api_endpoint: impl Into<String>,
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            api_endpoint: api_endpoint.into(),
            project_id: project_id.into(),
            database_id: database_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Endpoint without a trailing slash
    pub fn endpoint(&self) -> &str {
        self.api_endpoint.trim_end_matches('/')
    }

    /// Check that every field is usable
    pub fn validate(&self) -> BackendResult<()> {
        let endpoint = self.endpoint();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(BackendError::InvalidCredentials(format!(
                "apiEndpoint must be an http(s) URL, got '{}'",
                self.api_endpoint
            )));
        }

        for (name, value) in [
            ("projectId", &self.project_id),
            ("databaseId", &self.database_id),
            ("apiKey", &self.api_key),
        ] {
            if value.trim().is_empty() {
                return Err(BackendError::InvalidCredentials(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("api_endpoint", &self.api_endpoint)
            .field("project_id", &self.project_id)
            .field("database_id", &self.database_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_default_endpoint() {
        let creds: CredentialSet = serde_json::from_str(
            r#"{"projectId": "p1", "databaseId": "main", "apiKey": "secret"}"#,
        )
        .unwrap();
        assert_eq!(creds.api_endpoint, DEFAULT_ENDPOINT);
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let creds = CredentialSet::new("ftp://example.com", "p", "d", "k");
        assert!(creds.validate().is_err());

        let creds = CredentialSet::new("https://example.com/v1/", "p", " ", "k");
        let err = creds.validate().unwrap_err();
        assert!(err.to_string().contains("databaseId"));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let creds = CredentialSet::new("https://example.com/v1/", "p", "d", "k");
        assert_eq!(creds.endpoint(), "https://example.com/v1");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let creds = CredentialSet::new(DEFAULT_ENDPOINT, "p", "d", "super-secret");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
