//! Authenticated HTTP transport shared by every client operation.

use crate::error::ClientError;
use crate::validation::normalize_base_url;
use reqwest::{Client, Method, StatusCode, multipart::Form};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

/// Body attached to a request.
#[derive(Debug, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON-encoded body.
    Json(Value),
    /// `multipart/form-data` body used by uploads.
    Multipart(Form),
}

/// Lightweight HTTP client that attaches credentials and classifies responses.
///
/// Credentials are fixed at construction. No retries happen at this layer.
#[derive(Clone)]
pub struct Transport {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    api_key: String,
}

impl Transport {
    /// Build a transport for `base_url`, authenticating with a bearer token.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(base_url)?;
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let api_key = api_key.into();

        tracing::debug!(
            url = %base_url,
            has_api_key = !api_key.is_empty(),
            timeout_ms = ?timeout.map(|value| value.as_millis()),
            "Initialized API transport"
        );

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Base URL every path is resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and decode a 2xx JSON body into `T`.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: RequestBody,
    ) -> Result<T, ClientError> {
        let mut request = self.request(method.clone(), path);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        tracing::debug!(method = %method, path, "Sending API request");
        let response = request.send().await.map_err(|error| {
            tracing::warn!(method = %method, path, error = %error, "API request did not complete");
            ClientError::Network(error)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error = classify_error(status, &text);
            tracing::error!(method = %method, path, error = %error, "API request failed");
            return Err(error);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|error| {
            tracing::error!(method = %method, path, error = %error, "Undecodable API response");
            ClientError::MalformedResponse {
                path: path.to_string(),
                reason: error.to_string(),
            }
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format_endpoint(&self.base_url, path);
        let mut req = self.client.request(method, url);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        req
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Build an [`ClientError::Api`] from a non-2xx response body.
///
/// The body is decoded once; anything that is not JSON yields an empty object and the status
/// text stands in for the detail message.
pub(crate) fn classify_error(status: StatusCode, text: &str) -> ClientError {
    let body = serde_json::from_str::<Value>(text).unwrap_or_else(|_| Value::Object(Map::new()));
    let message = match body.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.trim().to_string(),
        Some(Value::Null) | None => status_text(status),
        Some(Value::String(_)) => status_text(status),
        Some(other) => other.to_string(),
    };
    ClientError::Api {
        status,
        message,
        body,
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
