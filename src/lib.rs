#![deny(missing_docs)]

//! Async client for the document-processing API.
//!
//! Upload a document, poll the resulting job until it reaches a terminal state, and receive the
//! chunked result as typed values:
//!
//! ```no_run
//! use docproc::{DocumentClient, UploadSource};
//!
//! # async fn example() -> Result<(), docproc::ClientError> {
//! let client = DocumentClient::new("dp_live_key")?;
//! let options = client.upload_options();
//! let result = client.upload(&UploadSource::path("manual.pdf"), &options).await?;
//! for chunk in &result.chunks {
//!     println!("[{}] {}", chunk.index, chunk.content);
//! }
//! # Ok(())
//! # }
//! ```

/// Client façade and builder.
pub mod client;
/// Environment-driven configuration management.
pub mod config;
/// Deletion responses with promotion and cascade side effects.
pub mod deletion;
/// Error taxonomy.
pub mod error;
/// Processing-lifecycle coordinator.
pub mod lifecycle;
/// Structured logging and tracing setup.
pub mod logging;
/// Wire and client schemas.
pub mod schema;
/// Upload sources and request construction.
pub mod submission;
/// Authenticated HTTP transport.
pub mod transport;
/// Local input validation.
pub mod validation;

pub use client::{ClientBuilder, DocumentClient};
pub use deletion::{CascadeInfo, DeletionResult, PromotionInfo};
pub use error::{ClientError, TimeoutCeiling, ValidationError};
pub use lifecycle::{
    AwaitOptions, ChunkQuery, PollingPolicy, ProgressEvent, ProgressStage, UploadOptions,
};
pub use schema::{Chunk, JobHandle, ProcessingResult, ProcessingState, UploadResult, VariantStatus};
pub use submission::{ProcessingConfig, SubmissionConfig, UploadSource};
