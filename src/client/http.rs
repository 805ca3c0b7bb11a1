//! # HTTP Backend
//!
//! [`DocumentBackend`] over the databases REST API. The project ID and API
//! key travel as `X-Appwrite-Project` / `X-Appwrite-Key` headers on every call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::backend::{Document, DocumentBackend, DocumentList};
use super::credentials::CredentialSet;
use super::errors::{BackendError, BackendResult};
use crate::query::QueryExpression;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const PROJECT_HEADER: &str = "x-appwrite-project";
const KEY_HEADER: &str = "x-appwrite-key";

/// Create-document request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentBody<'a> {
    document_id: &'a str,
    data: &'a Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<&'a [String]>,
}

/// HTTP client for the databases API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    endpoint: Url,
}

impl HttpBackend {
    /// Build a client from validated credentials
    pub fn new(credentials: &CredentialSet, timeout: Duration) -> BackendResult<Self> {
        credentials.validate()?;

        let endpoint = Url::parse(credentials.endpoint())
            .map_err(|e| BackendError::InvalidCredentials(format!("apiEndpoint: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(PROJECT_HEADER, header_value("projectId", &credentials.project_id)?);
        let mut key = header_value("apiKey", &credentials.api_key)?;
        key.set_sensitive(true);
        headers.insert(KEY_HEADER, key);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self { http, endpoint })
    }

    /// Endpoint URL with `segments` appended as path segments
    fn url(&self, segments: &[&str]) -> BackendResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| {
                BackendError::InvalidCredentials(format!(
                    "apiEndpoint cannot be a base URL: {}",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn documents_url(&self, database_id: &str, collection_id: &str) -> BackendResult<Url> {
        self.url(&[
            "databases",
            database_id,
            "collections",
            collection_id,
            "documents",
        ])
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        let response = request.send().await?;
        let status = response.status();

        tracing::debug!(
            event = "BACKEND_RESPONSE",
            url = %response.url().path(),
            status = status.as_u16()
        );

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| BackendError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(BackendError::from_response(status.as_u16(), &body))
    }
}

fn header_value(name: &str, value: &str) -> BackendResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        BackendError::InvalidCredentials(format!("{} contains invalid header characters", name))
    })
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> BackendResult<Document> {
        let mut url = self.documents_url(database_id, collection_id)?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Transport("invalid document URL".to_string()))?
            .push(document_id);

        tracing::debug!(event = "BACKEND_REQUEST", method = "GET", url = %url.path());
        self.send(self.http.get(url)).await
    }

    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[QueryExpression],
    ) -> BackendResult<DocumentList> {
        let url = self.documents_url(database_id, collection_id)?;
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.encode()))
            .collect();

        tracing::debug!(
            event = "BACKEND_REQUEST",
            method = "GET",
            url = %url.path(),
            queries = params.len()
        );
        self.send(self.http.get(url).query(&params)).await
    }

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Document,
        permissions: Option<&[String]>,
    ) -> BackendResult<Document> {
        let url = self.documents_url(database_id, collection_id)?;
        let body = CreateDocumentBody {
            document_id,
            data,
            permissions,
        };

        tracing::debug!(event = "BACKEND_REQUEST", method = "POST", url = %url.path());
        self.send(self.http.post(url).json(&body)).await
    }

    async fn health(&self) -> BackendResult<Value> {
        let url = self.url(&["health"])?;
        tracing::debug!(event = "BACKEND_REQUEST", method = "GET", url = %url.path());
        self.send(self.http.get(url)).await
    }
}
