//! Client-facing types: nested, strongly typed, serialized as camelCase.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque identifier of one asynchronous processing job (a document variant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    /// Wrap an identifier issued by the submission endpoint.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<JobHandle> for String {
    fn from(handle: JobHandle) -> Self {
        handle.0
    }
}

/// Server-reported lifecycle stage of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    /// Accepted, waiting for a worker.
    Pending,
    /// A worker is chunking the document.
    Processing,
    /// Chunks are available.
    Completed,
    /// Processing stopped with an error.
    Failed,
}

impl ProcessingState {
    /// `completed` and `failed` end a job; the server never leaves them.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of stored entity addressed by deletion and promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A whole document with all of its versions.
    Document,
    /// One version of a document.
    Version,
    /// One processed rendition of a version.
    Variant,
}

/// Outcome flags reported by the submission endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFlags {
    /// A new document record was created.
    pub is_new_document: bool,
    /// A new version was added to an existing document.
    pub is_new_version: bool,
    /// A new variant was created for the version.
    pub is_new_variant: bool,
    /// The upload matched previously stored content.
    pub existing_match: bool,
    /// The upload is byte-identical to an existing document.
    pub is_duplicate: bool,
}

/// Upload-time deduplication diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeduplicationInfo {
    /// Document whose content was reused.
    pub canonical_document_id: Option<String>,
    /// Processing cost avoided by reuse.
    pub cost_saved: Option<f64>,
    /// Whether the server could apply deduplication to this upload.
    pub available: Option<bool>,
}

/// Auto-link diagnostics: whether the upload was attached to a prior document as a new version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLinkInfo {
    /// Whether the server linked the upload.
    pub linked: Option<bool>,
    /// Match confidence in `[0.0, 1.0]`.
    pub confidence: Option<f64>,
    /// Heuristic that produced the match.
    pub method: Option<String>,
    /// Document the upload was linked to.
    pub parent_document_id: Option<String>,
}

/// Mapped response of the submission endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// Handle used to poll the job.
    pub job: JobHandle,
    /// Document the upload belongs to.
    pub document_id: String,
    /// Version the upload belongs to.
    pub version_id: String,
    /// State reported at submission time, when included.
    pub status: Option<ProcessingState>,
    /// Creation and match flags.
    pub flags: SubmissionFlags,
    /// Present when any deduplication field was reported.
    pub deduplication: Option<DeduplicationInfo>,
    /// Present when any auto-link field was reported.
    pub auto_link: Option<AutoLinkInfo>,
    /// Free-form server message.
    pub message: Option<String>,
}

/// Chunk reuse counters reported once processing completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupStats {
    /// Chunks reused from earlier versions.
    pub reused_chunks: u64,
    /// Chunks computed for this variant.
    pub new_chunks: u64,
    /// Share of reused chunks in `[0.0, 1.0]`.
    pub reuse_ratio: Option<f64>,
}

/// Timestamps and duration of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingTiming {
    /// RFC3339 creation time.
    pub created_at: Option<String>,
    /// RFC3339 time a worker picked the job up.
    pub started_at: Option<String>,
    /// RFC3339 completion time.
    pub completed_at: Option<String>,
    /// Server-side processing duration.
    pub processing_time_ms: Option<u64>,
}

/// Snapshot returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantStatus {
    /// Job the snapshot describes.
    pub job: JobHandle,
    /// Server-authoritative state.
    pub state: ProcessingState,
    /// Failure reason when `state` is `failed`.
    pub error: Option<String>,
    /// Number of chunks produced so far.
    pub chunks_count: Option<u64>,
    /// Tokens across all chunks.
    pub total_tokens: Option<u64>,
    /// Reuse counters.
    pub dedup_stats: Option<DedupStats>,
    /// Timestamps.
    pub timing: ProcessingTiming,
}

/// Location of a chunk inside the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPosition {
    /// First character offset.
    pub start_char: Option<u64>,
    /// One past the last character offset.
    pub end_char: Option<u64>,
    /// Page the chunk starts on.
    pub page_number: Option<u32>,
}

/// Descriptive metadata attached to a chunk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    /// Heading the chunk falls under.
    pub section_title: Option<String>,
    /// Structural type, e.g. `paragraph` or `table`.
    pub chunk_type: Option<String>,
    /// Extraction confidence in `[0.0, 1.0]`.
    pub confidence: Option<f64>,
    /// Content digest used for deduplication.
    pub content_hash: Option<String>,
    /// Whether the chunk was reused from an earlier version.
    pub reused: Option<bool>,
    /// Full metadata object, when requested.
    pub extra: Option<Map<String, Value>>,
}

/// One content chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Chunk identifier.
    pub id: String,
    /// Zero-based position in document order.
    pub index: u32,
    /// Chunk text.
    pub content: String,
    /// Token count, when computed.
    pub token_count: Option<u32>,
    /// Location in the source document.
    pub position: ChunkPosition,
    /// Descriptive metadata.
    pub metadata: ChunkMetadata,
}

/// One page of chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPage {
    /// Chunks in document order.
    pub chunks: Vec<Chunk>,
    /// Total chunks available for the variant.
    pub total: u64,
}

/// Mapped response of the cancel endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResult {
    /// Job the request addressed.
    pub job: JobHandle,
    /// Server-reported status after the request.
    pub status: String,
    /// Free-form server message.
    pub message: Option<String>,
}

/// Terminal typed payload of a processing lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    /// Handle of the job that produced the result.
    pub job: JobHandle,
    /// Document the upload belongs to.
    pub document_id: String,
    /// Version the upload belongs to.
    pub version_id: String,
    /// Submission-time flags.
    pub flags: SubmissionFlags,
    /// Submission-time deduplication diagnostics.
    pub deduplication: Option<DeduplicationInfo>,
    /// Submission-time auto-link diagnostics.
    pub auto_link: Option<AutoLinkInfo>,
    /// State reported by the server when the upload was accepted.
    pub submission_status: Option<ProcessingState>,
    /// Informational message returned with the upload, if any.
    pub message: Option<String>,
    /// Final status snapshot; `None` when the caller did not wait.
    pub status: Option<VariantStatus>,
    /// Chunks in document order; empty when the caller did not wait.
    pub chunks: Vec<Chunk>,
}

impl ProcessingResult {
    /// Result for a caller that only wanted the job handle.
    pub fn submitted(upload: UploadResult) -> Self {
        Self {
            job: upload.job,
            document_id: upload.document_id,
            version_id: upload.version_id,
            flags: upload.flags,
            deduplication: upload.deduplication,
            auto_link: upload.auto_link,
            submission_status: upload.status,
            message: upload.message,
            status: None,
            chunks: Vec::new(),
        }
    }

    /// Combine submission flags with the terminal status and fetched chunks.
    pub fn completed(upload: UploadResult, status: VariantStatus, chunks: Vec<Chunk>) -> Self {
        Self {
            status: Some(status),
            chunks,
            ..Self::submitted(upload)
        }
    }

    /// Whether the chunk sequence has been fetched.
    pub fn is_complete(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(|status| status.state == ProcessingState::Completed)
    }
}
