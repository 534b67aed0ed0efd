//! Public façade over transport, submission, lifecycle, and mapping.

use crate::config::Config;
use crate::deletion::{DeletionResult, map_deletion};
use crate::error::{ClientError, ValidationError};
use crate::lifecycle::{
    self, AwaitOptions, ChunkQuery, JobBackend, PollingPolicy, ProgressEvent, UploadOptions,
};
use crate::schema::wire::{
    WireCancelResponse, WireChunkPage, WireDeletionResponse, WireUploadResponse,
    WireVariantStatus,
};
use crate::schema::{
    CancelResult, ChunkPage, JobHandle, ProcessingResult, UploadResult, VariantStatus,
};
use crate::submission::{SubmissionConfig, UploadSource, build_submission};
use crate::transport::{RequestBody, Transport};
use crate::validation::{validate_limit, validate_uuid};
use async_trait::async_trait;
use futures_core::Stream;
use reqwest::Method;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("docproc-client/", env!("CARGO_PKG_VERSION"));

/// Client for the document-processing API.
///
/// Cheap to clone; clones share the connection pool and credentials. Independent uploads may
/// run concurrently on the same client.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    transport: Transport,
    polling: PollingPolicy,
}

/// Builder for [`DocumentClient`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: String,
    polling: PollingPolicy,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            polling: PollingPolicy::default(),
        }
    }
}

impl ClientBuilder {
    /// Start from the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bearer token attached to every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// API base URL, including any version prefix.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `User-Agent` header value.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Default polling policy for [`DocumentClient::upload_options`].
    pub fn polling(mut self, polling: PollingPolicy) -> Self {
        self.polling = polling;
        self
    }

    /// Validate settings and build the client.
    pub fn build(self) -> Result<DocumentClient, ClientError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ValidationError::Missing("api_key"))?;
        self.polling.validate()?;
        let transport = Transport::new(&self.base_url, api_key, self.timeout, &self.user_agent)?;
        Ok(DocumentClient {
            transport,
            polling: self.polling,
        })
    }
}

impl DocumentClient {
    /// Client with default settings for `api_key`.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Start a [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Client built from environment-derived configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let mut builder = ClientBuilder::new()
            .api_key(config.api_key.clone())
            .base_url(config.base_url.clone())
            .polling(config.polling);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Upload options pre-filled with this client's polling policy.
    pub fn upload_options(&self) -> UploadOptions {
        UploadOptions::default().with_polling(self.polling)
    }

    /// Upload a document and, unless `options.wait` is `false`, wait for its chunks.
    pub async fn upload(
        &self,
        source: &UploadSource,
        options: &UploadOptions,
    ) -> Result<ProcessingResult, ClientError> {
        lifecycle::run_to_completion(self, source, options).await
    }

    /// Upload a document and stream progress events until completion.
    pub fn upload_stream<'a>(
        &'a self,
        source: &'a UploadSource,
        options: &'a UploadOptions,
    ) -> impl Stream<Item = Result<ProgressEvent, ClientError>> + Send + 'a {
        lifecycle::run_as_stream(self, source, options)
    }

    /// Wait for a job submitted earlier, e.g. with `wait = false`.
    pub async fn wait_for_job(
        &self,
        job: &JobHandle,
        options: AwaitOptions,
    ) -> Result<VariantStatus, ClientError> {
        validate_uuid("variant_id", job.as_str())?;
        lifecycle::await_job(self, job, options).await
    }

    /// Current status snapshot of a variant.
    pub async fn get_variant_status(&self, variant_id: &str) -> Result<VariantStatus, ClientError> {
        validate_uuid("variant_id", variant_id)?;
        let wire: WireVariantStatus = self
            .transport
            .send_json(
                Method::GET,
                &format!("documents/variants/{variant_id}"),
                &[],
                RequestBody::Empty,
            )
            .await?;
        Ok(wire.into())
    }

    /// One page of chunks for a variant.
    pub async fn list_chunks(
        &self,
        variant_id: &str,
        query: ChunkQuery,
    ) -> Result<ChunkPage, ClientError> {
        validate_uuid("variant_id", variant_id)?;
        validate_limit(query.limit)?;
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        if query.include_full_metadata {
            params.push(("include_full_metadata", "true".to_string()));
        }
        let wire: WireChunkPage = self
            .transport
            .send_json(
                Method::GET,
                &format!("documents/variants/{variant_id}/chunks"),
                &params,
                RequestBody::Empty,
            )
            .await?;
        Ok(wire.into())
    }

    /// Ask the server to stop processing a variant. Never issued implicitly.
    pub async fn cancel_variant(&self, variant_id: &str) -> Result<CancelResult, ClientError> {
        validate_uuid("variant_id", variant_id)?;
        let wire: WireCancelResponse = self
            .transport
            .send_json(
                Method::DELETE,
                &format!("documents/variants/{variant_id}/cancel"),
                &[],
                RequestBody::Empty,
            )
            .await?;
        tracing::info!(variant = variant_id, status = %wire.status, "Cancellation requested");
        Ok(wire.into())
    }

    /// Delete one variant.
    pub async fn delete_variant(&self, variant_id: &str) -> Result<DeletionResult, ClientError> {
        validate_uuid("variant_id", variant_id)?;
        self.delete(&format!("documents/variants/{variant_id}")).await
    }

    /// Delete one version and its variants.
    pub async fn delete_version(&self, version_id: &str) -> Result<DeletionResult, ClientError> {
        validate_uuid("version_id", version_id)?;
        self.delete(&format!("documents/versions/{version_id}")).await
    }

    /// Delete a document with all of its versions.
    pub async fn delete_document(&self, document_id: &str) -> Result<DeletionResult, ClientError> {
        validate_uuid("document_id", document_id)?;
        self.delete(&format!("documents/{document_id}")).await
    }

    async fn delete(&self, path: &str) -> Result<DeletionResult, ClientError> {
        let wire: WireDeletionResponse = self
            .transport
            .send_json(Method::DELETE, path, &[], RequestBody::Empty)
            .await?;
        let result = map_deletion(wire);
        tracing::info!(
            id = %result.id,
            kind = ?result.kind,
            promoted = result.promoted.is_some(),
            cascaded = result.cascaded_total(),
            "Deleted resource"
        );
        Ok(result)
    }
}

#[async_trait]
impl JobBackend for DocumentClient {
    async fn submit(
        &self,
        source: &UploadSource,
        config: &SubmissionConfig,
    ) -> Result<UploadResult, ClientError> {
        let submission = build_submission(source, config).await?;
        let query = submission.query.clone();
        let filename = submission.file.filename.clone();
        let form = submission.into_form()?;
        tracing::debug!(filename = %filename, "Submitting document");
        let wire: WireUploadResponse = self
            .transport
            .send_json(Method::POST, "documents", &query, RequestBody::Multipart(form))
            .await?;
        Ok(wire.into())
    }

    async fn fetch_status(&self, job: &JobHandle) -> Result<VariantStatus, ClientError> {
        self.get_variant_status(job.as_str()).await
    }

    async fn fetch_chunks(
        &self,
        job: &JobHandle,
        query: ChunkQuery,
    ) -> Result<ChunkPage, ClientError> {
        self.list_chunks(job.as_str(), query).await
    }
}
