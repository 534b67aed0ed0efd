//! Processing-lifecycle coordinator: submission, polling with dual ceilings, result fetch.

mod backend;
mod coordinator;
pub mod events;
pub mod policy;

pub use backend::{ChunkQuery, JobBackend};
pub use coordinator::{await_job, run_as_stream, run_to_completion};
pub use events::{ProgressEvent, ProgressStage};
pub use policy::{AwaitOptions, PollingPolicy, ProgressCallback, UploadOptions};
