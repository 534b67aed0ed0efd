//! Polling policy and per-call options for the lifecycle coordinator.

use crate::error::ValidationError;
use crate::schema::VariantStatus;
use crate::submission::SubmissionConfig;
use crate::validation::validate_limit;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default delay between status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default ceiling on status requests per wait.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 150;
/// Default ceiling on wall-clock time per wait.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);
/// Default number of chunks requested per page when fetching results.
pub const DEFAULT_CHUNK_PAGE_SIZE: u32 = 100;

/// Interval plus the two independent ceilings governing a wait loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    /// Fixed delay between status requests.
    pub poll_interval: Duration,
    /// Maximum number of status requests.
    pub max_poll_attempts: u32,
    /// Maximum wall-clock time, measured from the first status request.
    pub poll_timeout: Duration,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

impl PollingPolicy {
    /// Both ceilings must be positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_poll_attempts == 0 {
            return Err(ValidationError::PollingPolicy(
                "max_poll_attempts must be greater than zero",
            ));
        }
        if self.poll_timeout.is_zero() {
            return Err(ValidationError::PollingPolicy(
                "poll_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Options for [`run_to_completion`](super::run_to_completion) and
/// [`run_as_stream`](super::run_as_stream).
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Query and multipart settings for the submission.
    pub submission: SubmissionConfig,
    /// When `false`, return right after submission without polling. Ignored by streams.
    pub wait: bool,
    /// Interval and ceilings for the polling loop.
    pub polling: PollingPolicy,
    /// Chunks requested per page when fetching the result.
    pub chunk_page_size: u32,
    /// Ask the server for the full per-chunk metadata object.
    pub include_full_metadata: bool,
    /// Abandons the client-side wait when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            submission: SubmissionConfig::default(),
            wait: true,
            polling: PollingPolicy::default(),
            chunk_page_size: DEFAULT_CHUNK_PAGE_SIZE,
            include_full_metadata: false,
            cancel: None,
        }
    }
}

impl UploadOptions {
    /// Return right after submission.
    pub fn no_wait(mut self) -> Self {
        self.wait = false;
        self
    }

    /// Replace the polling policy.
    pub fn with_polling(mut self, polling: PollingPolicy) -> Self {
        self.polling = polling;
        self
    }

    /// Replace the submission settings.
    pub fn with_submission(mut self, submission: SubmissionConfig) -> Self {
        self.submission = submission;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        self.polling.validate()?;
        validate_limit(self.chunk_page_size)
    }
}

/// Callback invoked with every observed status snapshot.
pub type ProgressCallback = Box<dyn FnMut(&VariantStatus) + Send>;

/// Options for [`await_job`](super::await_job): wall-clock ceiling only.
pub struct AwaitOptions {
    /// Maximum wall-clock time to wait.
    pub max_wait: Duration,
    /// Fixed delay between status requests.
    pub poll_interval: Duration,
    /// Invoked once per poll, before termination is evaluated.
    pub on_progress: Option<ProgressCallback>,
    /// Abandons the client-side wait when cancelled.
    pub cancel: Option<CancellationToken>,
}

impl Default for AwaitOptions {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_POLL_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            on_progress: None,
            cancel: None,
        }
    }
}

impl AwaitOptions {
    /// Wait at most `max_wait`, polling every `poll_interval`.
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Self {
        Self {
            max_wait,
            poll_interval,
            ..Self::default()
        }
    }

    /// Observe every status snapshot.
    pub fn on_progress(mut self, callback: impl FnMut(&VariantStatus) + Send + 'static) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl std::fmt::Debug for AwaitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwaitOptions")
            .field("max_wait", &self.max_wait)
            .field("poll_interval", &self.poll_interval)
            .field("on_progress", &self.on_progress.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}
