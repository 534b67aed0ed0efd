//! Submit → poll → fetch pipeline.
//!
//! Every wait carries its own attempt counter and start instant, so independent lifecycles can
//! run concurrently. Status requests for one job are strictly sequential. Ceilings are checked
//! before each status request; cancellation is observed before and during every request and
//! sleep. Abandoning a wait never cancels the remote job.

use async_stream::try_stream;
use futures_core::Stream;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::backend::{ChunkQuery, JobBackend};
use super::events::{ProgressEvent, ProgressStage};
use super::policy::{AwaitOptions, UploadOptions};
use crate::error::{ClientError, TimeoutCeiling, ValidationError};
use crate::schema::{Chunk, JobHandle, ProcessingResult, ProcessingState, VariantStatus};
use crate::submission::UploadSource;

const GENERIC_FAILURE: &str = "Processing failed without an error message";

/// Upload `source` and, unless `options.wait` is `false`, wait for the job and fetch its chunks.
pub async fn run_to_completion<B>(
    backend: &B,
    source: &UploadSource,
    options: &UploadOptions,
) -> Result<ProcessingResult, ClientError>
where
    B: JobBackend + ?Sized,
{
    options.validate()?;
    let upload = backend.submit(source, &options.submission).await?;
    tracing::info!(
        job = %upload.job,
        document = %upload.document_id,
        duplicate = upload.flags.is_duplicate,
        wait = options.wait,
        "Document submitted"
    );

    if !options.wait {
        return Ok(ProcessingResult::submitted(upload));
    }

    let mut poller = Poller::new(
        upload.job.clone(),
        Some(options.polling.max_poll_attempts),
        options.polling.poll_timeout,
        options.polling.poll_interval,
        options.cancel.clone(),
    );

    let status = loop {
        let status = poller.observe(backend).await?;
        match status.state {
            ProcessingState::Completed => break status,
            ProcessingState::Failed => return Err(processing_failed(&status)),
            ProcessingState::Pending | ProcessingState::Processing => poller.pause().await?,
        }
    };

    let chunks = fetch_all_chunks(
        backend,
        &upload.job,
        options.chunk_page_size,
        options.include_full_metadata,
        &poller,
    )
    .await?;
    tracing::info!(job = %upload.job, chunks = chunks.len(), "Processing complete");
    Ok(ProcessingResult::completed(upload, status, chunks))
}

/// Upload `source` and yield one [`ProgressEvent`] per lifecycle transition.
///
/// The stream is lazy and single-use: nothing happens until it is polled, and every call starts
/// a fresh submission. It ends after the `complete` event or the first error.
pub fn run_as_stream<'a, B>(
    backend: &'a B,
    source: &'a UploadSource,
    options: &'a UploadOptions,
) -> impl Stream<Item = Result<ProgressEvent, ClientError>> + Send + 'a
where
    B: JobBackend + ?Sized,
{
    try_stream! {
        options.validate()?;
        yield ProgressEvent::upload_started();

        let upload = backend.submit(source, &options.submission).await?;
        tracing::info!(job = %upload.job, document = %upload.document_id, "Document submitted");
        yield ProgressEvent::upload_finished(upload.job.clone());

        let mut poller = Poller::new(
            upload.job.clone(),
            Some(options.polling.max_poll_attempts),
            options.polling.poll_timeout,
            options.polling.poll_interval,
            options.cancel.clone(),
        );
        let mut announced: Option<ProcessingState> = None;

        loop {
            let status = poller.observe(backend).await?;
            match status.state {
                ProcessingState::Pending | ProcessingState::Processing => {
                    if announced != Some(status.state) {
                        announced = Some(status.state);
                        yield transition_event(&upload.job, status.state);
                    }
                    poller.pause().await?;
                }
                ProcessingState::Failed => {
                    Err(processing_failed(&status))?;
                }
                ProcessingState::Completed => {
                    let chunks = fetch_all_chunks(
                        backend,
                        &upload.job,
                        options.chunk_page_size,
                        options.include_full_metadata,
                        &poller,
                    )
                    .await?;
                    tracing::info!(job = %upload.job, chunks = chunks.len(), "Processing complete");
                    let result = ProcessingResult::completed(upload, status, chunks);
                    yield ProgressEvent::complete(result);
                    break;
                }
            }
        }
    }
}

/// Wait for a job obtained out-of-band, bounded by wall-clock time only.
///
/// `on_progress` sees every snapshot before it is classified, including the terminal one.
pub async fn await_job<B>(
    backend: &B,
    job: &JobHandle,
    options: AwaitOptions,
) -> Result<VariantStatus, ClientError>
where
    B: JobBackend + ?Sized,
{
    if options.max_wait.is_zero() {
        return Err(ValidationError::PollingPolicy("max_wait must be greater than zero").into());
    }

    let AwaitOptions {
        max_wait,
        poll_interval,
        mut on_progress,
        cancel,
    } = options;
    let mut poller = Poller::new(job.clone(), None, max_wait, poll_interval, cancel);

    loop {
        let status = poller.observe(backend).await?;
        if let Some(callback) = on_progress.as_mut() {
            callback(&status);
        }
        match status.state {
            ProcessingState::Completed => return Ok(status),
            ProcessingState::Failed => return Err(processing_failed(&status)),
            ProcessingState::Pending | ProcessingState::Processing => poller.pause().await?,
        }
    }
}

/// Per-wait polling state.
struct Poller {
    job: JobHandle,
    max_attempts: Option<u32>,
    timeout: Duration,
    interval: Duration,
    cancel: Option<CancellationToken>,
    attempts: u32,
    started: Instant,
}

impl Poller {
    fn new(
        job: JobHandle,
        max_attempts: Option<u32>,
        timeout: Duration,
        interval: Duration,
        cancel: Option<CancellationToken>,
    ) -> Self {
        Self {
            job,
            max_attempts,
            timeout,
            interval,
            cancel,
            attempts: 0,
            started: Instant::now(),
        }
    }

    /// Check both ceilings, then issue exactly one status request.
    async fn observe<B>(&mut self, backend: &B) -> Result<VariantStatus, ClientError>
    where
        B: JobBackend + ?Sized,
    {
        self.ensure_within_ceilings()?;
        let status = self.cancellable(backend.fetch_status(&self.job)).await?;
        self.attempts += 1;
        tracing::debug!(
            job = %self.job,
            attempt = self.attempts,
            state = %status.state,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "Polled job status"
        );
        Ok(status)
    }

    /// Sleep out the fixed interval unless a ceiling has already been reached.
    async fn pause(&self) -> Result<(), ClientError> {
        self.ensure_within_ceilings()?;
        self.cancellable(async {
            tokio::time::sleep(self.interval).await;
            Ok(())
        })
        .await
    }

    fn ensure_within_ceilings(&self) -> Result<(), ClientError> {
        let ceiling = match self.max_attempts {
            Some(max) if self.attempts >= max => Some(TimeoutCeiling::Attempts { max }),
            _ if self.started.elapsed() >= self.timeout => Some(TimeoutCeiling::Elapsed {
                limit: self.timeout,
            }),
            _ => None,
        };

        match ceiling {
            Some(ceiling) => {
                let elapsed = self.started.elapsed();
                tracing::warn!(
                    job = %self.job,
                    attempts = self.attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    %ceiling,
                    "Stopped waiting for job; remote processing continues"
                );
                Err(ClientError::ProcessingTimeout {
                    job_id: self.job.to_string(),
                    ceiling,
                    attempts: self.attempts,
                    elapsed,
                })
            }
            None => Ok(()),
        }
    }

    async fn cancellable<T, F>(&self, operation: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let Some(token) = &self.cancel else {
            return operation.await;
        };
        if token.is_cancelled() {
            return Err(self.cancelled());
        }
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(self.cancelled()),
            result = operation => result,
        }
    }

    fn cancelled(&self) -> ClientError {
        tracing::warn!(job = %self.job, attempts = self.attempts, "Wait cancelled by caller");
        ClientError::Cancelled {
            job_id: self.job.to_string(),
        }
    }
}

/// Page through the chunk listing until `total` chunks are collected or a page comes back empty.
async fn fetch_all_chunks<B>(
    backend: &B,
    job: &JobHandle,
    page_size: u32,
    include_full_metadata: bool,
    poller: &Poller,
) -> Result<Vec<Chunk>, ClientError>
where
    B: JobBackend + ?Sized,
{
    let mut chunks = Vec::new();
    loop {
        let query = ChunkQuery {
            limit: page_size,
            offset: chunks.len() as u64,
            include_full_metadata,
        };
        let page = poller.cancellable(backend.fetch_chunks(job, query)).await?;
        let received = page.chunks.len();
        chunks.extend(page.chunks);
        tracing::debug!(job = %job, received, total = page.total, "Fetched chunk page");

        if received == 0 || chunks.len() as u64 >= page.total {
            break;
        }
    }
    Ok(chunks)
}

fn transition_event(job: &JobHandle, state: ProcessingState) -> ProgressEvent {
    match state {
        ProcessingState::Pending => {
            ProgressEvent::stage(ProgressStage::Queued, job, "Waiting for a worker")
        }
        _ => ProgressEvent::stage(ProgressStage::Processing, job, "Processing document"),
    }
}

fn processing_failed(status: &VariantStatus) -> ClientError {
    let message = status
        .error
        .as_deref()
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .unwrap_or(GENERIC_FAILURE)
        .to_string();
    tracing::error!(job = %status.job, error = %message, "Processing failed");
    ClientError::ProcessingFailed {
        job_id: status.job.to_string(),
        message,
    }
}
