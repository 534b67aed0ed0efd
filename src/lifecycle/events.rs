//! Progress events yielded by streaming uploads.

use crate::schema::{JobHandle, ProcessingResult};
use serde::Serialize;

/// Lifecycle stage announced by a [`ProgressEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStage {
    /// File transfer started or finished.
    Upload,
    /// Server reported `pending`.
    Queued,
    /// Server reported `processing`.
    Processing,
    /// Server reported `completed` and the result was fetched.
    Complete,
}

impl ProgressStage {
    /// Fixed percentage shown for the stage. The API reports no fractional progress, so the
    /// intermediate values are placeholders.
    pub const fn percent(self) -> u8 {
        match self {
            Self::Upload => 0,
            Self::Queued => 25,
            Self::Processing => 50,
            Self::Complete => 100,
        }
    }
}

/// One transition observed during a streaming upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    /// Stage reached.
    pub stage: ProgressStage,
    /// Illustrative completion percentage.
    pub percent: u8,
    /// Human-readable description.
    pub message: String,
    /// Job handle, once the upload has been accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobHandle>,
    /// Final result, carried by the `complete` event only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Box<ProcessingResult>>,
}

impl ProgressEvent {
    pub(crate) fn upload_started() -> Self {
        Self {
            stage: ProgressStage::Upload,
            percent: 0,
            message: "Uploading document".into(),
            job: None,
            result: None,
        }
    }

    pub(crate) fn upload_finished(job: JobHandle) -> Self {
        Self {
            stage: ProgressStage::Upload,
            percent: 100,
            message: "Upload complete".into(),
            job: Some(job),
            result: None,
        }
    }

    pub(crate) fn stage(stage: ProgressStage, job: &JobHandle, message: impl Into<String>) -> Self {
        Self {
            stage,
            percent: stage.percent(),
            message: message.into(),
            job: Some(job.clone()),
            result: None,
        }
    }

    pub(crate) fn complete(result: ProcessingResult) -> Self {
        Self {
            stage: ProgressStage::Complete,
            percent: ProgressStage::Complete.percent(),
            message: format!("Processing complete: {} chunks", result.chunks.len()),
            job: Some(result.job.clone()),
            result: Some(Box::new(result)),
        }
    }
}
