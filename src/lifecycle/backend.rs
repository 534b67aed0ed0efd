use crate::error::ClientError;
use crate::schema::{ChunkPage, JobHandle, UploadResult, VariantStatus};
use crate::submission::{SubmissionConfig, UploadSource};
use async_trait::async_trait;

/// Page selector for the chunk listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkQuery {
    /// Page size, `1..=1000`.
    pub limit: u32,
    /// Chunks to skip.
    pub offset: u64,
    /// Request the full per-chunk metadata object.
    pub include_full_metadata: bool,
}

impl Default for ChunkQuery {
    fn default() -> Self {
        Self {
            limit: super::policy::DEFAULT_CHUNK_PAGE_SIZE,
            offset: 0,
            include_full_metadata: false,
        }
    }
}

/// Remote operations the coordinator drives.
///
/// [`crate::DocumentClient`] implements this over HTTP.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Upload a document and return the submission response.
    async fn submit(
        &self,
        source: &UploadSource,
        config: &SubmissionConfig,
    ) -> Result<UploadResult, ClientError>;

    /// Fetch the current status snapshot of a job.
    async fn fetch_status(&self, job: &JobHandle) -> Result<VariantStatus, ClientError>;

    /// Fetch one page of chunks produced by a job.
    async fn fetch_chunks(
        &self,
        job: &JobHandle,
        query: ChunkQuery,
    ) -> Result<ChunkPage, ClientError>;
}
