use std::time::Duration;

use docproc::{
    ClientError, DocumentClient, PollingPolicy, ProcessingConfig, ProcessingState, ProgressStage,
    SubmissionConfig, TimeoutCeiling, UploadOptions, UploadSource,
};
use futures_util::stream::StreamExt;
use httpmock::{Method::GET, Method::POST, Mock, MockServer};
use serde_json::json;

const VARIANT: &str = "9b1deb4d-3b7d-4bad-9bdd-2b0d7b3dcb6d";
const DOCUMENT: &str = "1b4e28ba-2fa1-41d2-883f-0016d3cca427";
const VERSION: &str = "6ec0bd7f-11c0-43da-975e-2a8ad9ebae0b";

fn client(server: &MockServer) -> DocumentClient {
    DocumentClient::builder()
        .api_key("integration-key")
        .base_url(server.base_url())
        .build()
        .expect("client")
}

fn fast_polling(max_poll_attempts: u32) -> PollingPolicy {
    PollingPolicy {
        poll_interval: Duration::from_millis(10),
        max_poll_attempts,
        poll_timeout: Duration::from_secs(5),
    }
}

fn source() -> UploadSource {
    UploadSource::bytes(b"# Title\n\nBody text.".to_vec(), "notes.md")
}

async fn mock_upload(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/documents")
                .header("authorization", "Bearer integration-key")
                .body_contains("name=\"file\"; filename=\"notes.md\"");
            then.status(201).json_body(json!({
                "variant_id": VARIANT,
                "document_id": DOCUMENT,
                "version_id": VERSION,
                "status": "pending",
                "is_new_document": true,
                "is_new_version": true,
                "is_new_variant": true,
                "existing_match": false,
                "is_duplicate": false,
                "deduplication_available": true,
                "message": "Queued for processing"
            }));
        })
        .await
}

async fn mock_status<'a>(server: &'a MockServer, state: &str, error: Option<&str>) -> Mock<'a> {
    let mut body = json!({
        "id": VARIANT,
        "status": state,
        "chunks_count": 2,
        "total_tokens": 12
    });
    if let Some(error) = error {
        body["error"] = json!(error);
    }
    server
        .mock_async(move |when, then| {
            when.method(GET).path(format!("/documents/variants/{VARIANT}"));
            then.status(200).json_body(body);
        })
        .await
}

async fn mock_chunks(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/documents/variants/{VARIANT}/chunks"))
                .query_param("offset", "0");
            then.status(200).json_body(json!({
                "chunks": [
                    { "id": "c-0", "chunk_index": 0, "content": "# Title", "chunk_type": "heading" },
                    { "id": "c-1", "chunk_index": 1, "content": "Body text.", "token_count": 3 }
                ],
                "total": 2
            }));
        })
        .await
}

#[tokio::test]
async fn upload_waits_and_fetches_chunks() {
    let server = MockServer::start_async().await;
    let upload = mock_upload(&server).await;
    let status = mock_status(&server, "completed", None).await;
    let chunks = mock_chunks(&server).await;

    let client = client(&server);
    let options = client.upload_options().with_polling(fast_polling(10));
    let result = client.upload(&source(), &options).await.expect("upload");

    upload.assert_async().await;
    status.assert_hits_async(1).await;
    chunks.assert_hits_async(1).await;

    assert_eq!(result.job.as_str(), VARIANT);
    assert_eq!(result.document_id, DOCUMENT);
    assert!(result.flags.is_new_document);
    assert_eq!(
        result.deduplication.as_ref().and_then(|info| info.available),
        Some(true)
    );
    assert_eq!(result.chunks.len(), 2);
    assert_eq!(result.chunks[0].metadata.chunk_type.as_deref(), Some("heading"));
    assert_eq!(result.status.as_ref().and_then(|s| s.total_tokens), Some(12));
}

#[tokio::test]
async fn no_wait_upload_never_polls() {
    let server = MockServer::start_async().await;
    let upload = mock_upload(&server).await;
    let status = mock_status(&server, "completed", None).await;
    let chunks = mock_chunks(&server).await;

    let client = client(&server);
    let options = client.upload_options().no_wait();
    let result = client.upload(&source(), &options).await.expect("upload");

    upload.assert_async().await;
    status.assert_hits_async(0).await;
    chunks.assert_hits_async(0).await;
    assert!(result.chunks.is_empty());
    assert!(result.status.is_none());
    assert_eq!(result.submission_status, Some(ProcessingState::Pending));
    assert_eq!(result.message.as_deref(), Some("Queued for processing"));
}

#[tokio::test]
async fn explicit_falsy_settings_reach_the_server() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/documents")
                .query_param("auto_link", "false")
                .query_param("auto_link_threshold", "0")
                .body_contains("name=\"chunk_overlap\"\r\n\r\n0\r\n")
                .body_contains("name=\"extract_tables\"\r\n\r\nfalse\r\n");
            then.status(201).json_body(json!({
                "variant_id": VARIANT,
                "document_id": DOCUMENT,
                "version_id": VERSION
            }));
        })
        .await;

    let client = client(&server);
    let options = UploadOptions::default()
        .no_wait()
        .with_submission(SubmissionConfig {
            processing: ProcessingConfig {
                chunk_overlap: Some(0),
                extract_tables: Some(false),
                ..ProcessingConfig::default()
            },
            auto_link: Some(false),
            auto_link_threshold: Some(0.0),
            ..SubmissionConfig::default()
        });

    client.upload(&source(), &options).await.expect("upload");
    upload.assert_async().await;
}

#[tokio::test]
async fn failed_status_surfaces_server_error() {
    let server = MockServer::start_async().await;
    mock_upload(&server).await;
    let status = mock_status(&server, "failed", Some("Unsupported encoding")).await;
    let chunks = mock_chunks(&server).await;

    let client = client(&server);
    let options = client.upload_options().with_polling(fast_polling(10));
    let error = client
        .upload(&source(), &options)
        .await
        .expect_err("failed job");

    match error {
        ClientError::ProcessingFailed { job_id, message } => {
            assert_eq!(job_id, VARIANT);
            assert_eq!(message, "Unsupported encoding");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    status.assert_hits_async(1).await;
    chunks.assert_hits_async(0).await;
}

#[tokio::test]
async fn attempt_ceiling_applies_over_http() {
    let server = MockServer::start_async().await;
    mock_upload(&server).await;
    let status = mock_status(&server, "processing", None).await;

    let client = client(&server);
    let options = client.upload_options().with_polling(fast_polling(2));
    let error = client
        .upload(&source(), &options)
        .await
        .expect_err("timeout");

    assert!(matches!(
        error,
        ClientError::ProcessingTimeout {
            ceiling: TimeoutCeiling::Attempts { max: 2 },
            attempts: 2,
            ..
        }
    ));
    status.assert_hits_async(2).await;
}

#[tokio::test]
async fn malformed_submission_body_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/documents");
            then.status(200)
                .header("content-type", "application/json")
                .body("{\"variant_id\": ");
        })
        .await;
    let status = mock_status(&server, "completed", None).await;

    let client = client(&server);
    let error = client
        .upload(&source(), &client.upload_options())
        .await
        .expect_err("malformed");

    assert!(matches!(error, ClientError::MalformedResponse { .. }));
    status.assert_hits_async(0).await;
}

#[tokio::test]
async fn structurally_unexpected_body_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/documents");
            then.status(200).json_body(json!({ "ok": true }));
        })
        .await;

    let client = client(&server);
    let error = client
        .upload(&source(), &client.upload_options())
        .await
        .expect_err("missing fields");
    assert!(matches!(error, ClientError::MalformedResponse { .. }));
}

#[tokio::test]
async fn rejected_upload_carries_status_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/documents");
            then.status(413).json_body(json!({ "detail": "File too large" }));
        })
        .await;

    let client = client(&server);
    let error = client
        .upload(&source(), &client.upload_options())
        .await
        .expect_err("413");

    assert_eq!(error.status().map(|status| status.as_u16()), Some(413));
    assert!(error.to_string().contains("File too large"));
}

#[tokio::test]
async fn stream_reports_upload_then_completion() {
    let server = MockServer::start_async().await;
    mock_upload(&server).await;
    mock_status(&server, "completed", None).await;
    mock_chunks(&server).await;

    let client = client(&server);
    let options = client.upload_options().with_polling(fast_polling(10));
    let source = source();
    let events: Vec<_> = client
        .upload_stream(&source, &options)
        .map(|event| event.expect("event"))
        .collect()
        .await;

    let stages: Vec<_> = events.iter().map(|event| (event.stage, event.percent)).collect();
    assert_eq!(
        stages,
        vec![
            (ProgressStage::Upload, 0),
            (ProgressStage::Upload, 100),
            (ProgressStage::Complete, 100),
        ]
    );
    let result = events[2].result.as_ref().expect("result");
    assert_eq!(result.chunks.len(), 2);
}

#[tokio::test]
async fn missing_file_fails_before_any_request() {
    let server = MockServer::start_async().await;
    let upload = mock_upload(&server).await;

    let client = client(&server);
    let error = client
        .upload(
            &UploadSource::path("/nonexistent/dir/report.pdf"),
            &client.upload_options(),
        )
        .await
        .expect_err("missing file");

    assert!(matches!(error, ClientError::InvalidSource { .. }));
    upload.assert_hits_async(0).await;
}
