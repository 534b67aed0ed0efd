//! Error taxonomy surfaced by every client operation.

use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Input rejected before any network call was issued.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Identifier did not have the hyphenated UUID shape.
    #[error("Invalid {field}: '{value}' is not a UUID")]
    InvalidUuid {
        /// Name of the parameter that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// Pagination limit outside the accepted window.
    #[error(
        "Invalid limit {0}: must be between 1 and {max}",
        max = crate::validation::MAX_PAGE_SIZE
    )]
    Limit(u32),
    /// Score or confidence outside `[0.0, 1.0]`.
    #[error("Invalid {field}: {value} must be within [0.0, 1.0]")]
    OutOfUnitRange {
        /// Name of the parameter that failed validation.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Base URL failed to parse or used an unsupported scheme.
    #[error("Invalid base URL: {0}")]
    BaseUrl(String),
    /// Polling policy carried a zero bound.
    #[error("Invalid polling policy: {0}")]
    PollingPolicy(&'static str),
    /// Required client setting was never provided.
    #[error("Missing client setting: {0}")]
    Missing(&'static str),
}

/// Which client-side ceiling ended a polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutCeiling {
    /// The maximum number of status requests was reached.
    Attempts {
        /// Configured attempt ceiling.
        max: u32,
    },
    /// The maximum wall-clock wait was reached.
    Elapsed {
        /// Configured wall-clock ceiling.
        limit: Duration,
    },
}

impl std::fmt::Display for TimeoutCeiling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attempts { max } => write!(f, "max poll attempts ({max}) reached"),
            Self::Elapsed { limit } => {
                write!(f, "poll timeout ({} ms) exceeded", limit.as_millis())
            }
        }
    }
}

/// Errors returned by the document-processing client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input was rejected locally.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Path-based upload source could not be used.
    #[error("Invalid upload source {path}: {reason}")]
    InvalidSource {
        /// Path supplied by the caller.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },
    /// Resolved filename contained path-traversal sequences or was empty.
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
    /// HTTP layer failed before receiving a response.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// API responded with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status returned by the API.
        status: StatusCode,
        /// `detail` field of the error body, or the status text when absent.
        message: String,
        /// Decoded error body, or an empty object when decoding failed.
        body: Value,
    },
    /// 2xx response whose body could not be decoded into the expected shape.
    #[error("Malformed response from {path}: {reason}")]
    MalformedResponse {
        /// Request path that produced the body.
        path: String,
        /// Decoder diagnostic.
        reason: String,
    },
    /// Remote job reached the `failed` state.
    #[error("Processing failed for job {job_id}: {message}")]
    ProcessingFailed {
        /// Job that failed.
        job_id: String,
        /// Server-reported failure, or a generic message when none was given.
        message: String,
    },
    /// A client-side polling ceiling was reached; the remote job keeps running.
    #[error("Timed out waiting for job {job_id}: {ceiling} after {attempts} polls")]
    ProcessingTimeout {
        /// Job that was being awaited.
        job_id: String,
        /// Ceiling that triggered.
        ceiling: TimeoutCeiling,
        /// Status requests issued before giving up.
        attempts: u32,
        /// Wall-clock time spent in the polling loop.
        elapsed: Duration,
    },
    /// Caller abandoned the wait; the remote job keeps running.
    #[error("Wait for job {job_id} was cancelled")]
    Cancelled {
        /// Job whose wait was abandoned.
        job_id: String,
    },
}

impl ClientError {
    /// HTTP status carried by [`ClientError::Api`], if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error is a client-side polling timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ProcessingTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timeout_message_names_the_ceiling() {
        let error = ClientError::ProcessingTimeout {
            job_id: "job-1".into(),
            ceiling: TimeoutCeiling::Attempts { max: 2 },
            attempts: 2,
            elapsed: Duration::from_millis(20),
        };
        assert!(error.is_timeout());
        assert_eq!(
            error.to_string(),
            "Timed out waiting for job job-1: max poll attempts (2) reached after 2 polls"
        );

        let elapsed = TimeoutCeiling::Elapsed {
            limit: Duration::from_millis(1500),
        };
        assert_eq!(elapsed.to_string(), "poll timeout (1500 ms) exceeded");
    }

    #[test]
    fn api_error_exposes_status() {
        let error = ClientError::Api {
            status: StatusCode::NOT_FOUND,
            message: "Variant not found".into(),
            body: json!({ "detail": "Variant not found" }),
        };
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(error.to_string(), "API error (404 Not Found): Variant not found");
    }
}
