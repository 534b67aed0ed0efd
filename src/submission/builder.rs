//! Construction of the multipart body and query string for `POST /documents`.
//!
//! Only fields the caller set are transmitted. Explicit `false`, `0`, and empty strings are sent
//! as-is; defaults are the server's job.

use crate::error::ClientError;
use crate::validation::{validate_unit_interval, validate_uuid};
use reqwest::multipart::{Form, Part};

use super::source::{SourcePayload, UploadSource, resolve_source};

/// Processing settings forwarded as multipart text fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingConfig {
    /// Target chunk size in tokens.
    pub chunk_size: Option<u32>,
    /// Token overlap between neighbouring chunks.
    pub chunk_overlap: Option<u32>,
    /// Server-side chunking strategy name.
    pub chunking_strategy: Option<String>,
    /// Smallest chunk the server should emit.
    pub min_chunk_size: Option<u32>,
    /// Largest chunk the server should emit.
    pub max_chunk_size: Option<u32>,
    /// Extract tables as dedicated chunks.
    pub extract_tables: Option<bool>,
    /// Extract embedded images.
    pub extract_images: Option<bool>,
    /// Run OCR on scanned pages.
    pub ocr_enabled: Option<bool>,
    /// Document language hint.
    pub language: Option<String>,
    /// Attach per-chunk metadata.
    pub include_metadata: Option<bool>,
    /// Run semantic analysis over chunks.
    pub semantic_analysis: Option<bool>,
    /// Reuse chunks from earlier versions.
    pub enable_deduplication: Option<bool>,
}

impl ProcessingConfig {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        push(&mut fields, "chunk_size", self.chunk_size);
        push(&mut fields, "chunk_overlap", self.chunk_overlap);
        push(&mut fields, "chunking_strategy", self.chunking_strategy.as_ref());
        push(&mut fields, "min_chunk_size", self.min_chunk_size);
        push(&mut fields, "max_chunk_size", self.max_chunk_size);
        push(&mut fields, "extract_tables", self.extract_tables);
        push(&mut fields, "extract_images", self.extract_images);
        push(&mut fields, "ocr_enabled", self.ocr_enabled);
        push(&mut fields, "language", self.language.as_ref());
        push(&mut fields, "include_metadata", self.include_metadata);
        push(&mut fields, "semantic_analysis", self.semantic_analysis);
        push(&mut fields, "enable_deduplication", self.enable_deduplication);
        fields
    }
}

/// Everything that shapes a submission besides the file itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionConfig {
    /// Multipart processing settings.
    pub processing: ProcessingConfig,
    /// Attach the upload as a new version of this document.
    pub parent_document_id: Option<String>,
    /// Label stored with the version.
    pub version_label: Option<String>,
    /// Let the server link the upload to a similar prior document.
    pub auto_link: Option<bool>,
    /// Minimum similarity in `[0.0, 1.0]` for auto-linking.
    pub auto_link_threshold: Option<f64>,
}

impl SubmissionConfig {
    /// Reject malformed identifiers and thresholds before any I/O.
    pub fn validate(&self) -> Result<(), ClientError> {
        if let Some(parent) = &self.parent_document_id {
            validate_uuid("parent_document_id", parent)?;
        }
        if let Some(threshold) = self.auto_link_threshold {
            validate_unit_interval("auto_link_threshold", threshold)?;
        }
        Ok(())
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push(&mut query, "parent_document_id", self.parent_document_id.as_ref());
        push(&mut query, "version_label", self.version_label.as_ref());
        push(&mut query, "auto_link", self.auto_link);
        push(&mut query, "auto_link_threshold", self.auto_link_threshold);
        query
    }
}

/// Request representation produced by [`build_submission`].
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// File part.
    pub file: SourcePayload,
    /// Multipart text fields in transmission order.
    pub fields: Vec<(&'static str, String)>,
    /// Query string pairs.
    pub query: Vec<(&'static str, String)>,
}

impl Submission {
    /// Convert into a multipart form with the file under the `file` field.
    pub fn into_form(self) -> Result<Form, ClientError> {
        let SourcePayload {
            data,
            filename,
            content_type,
        } = self.file;
        let part = Part::bytes(data)
            .file_name(filename)
            .mime_str(&content_type)?;
        let form = self
            .fields
            .into_iter()
            .fold(Form::new().part("file", part), |form, (name, value)| {
                form.text(name, value)
            });
        Ok(form)
    }
}

/// Validate the configuration, read the source, and lay out body fields and query pairs.
pub async fn build_submission(
    source: &UploadSource,
    config: &SubmissionConfig,
) -> Result<Submission, ClientError> {
    config.validate()?;
    let file = resolve_source(source).await?;
    Ok(Submission {
        file,
        fields: config.processing.fields(),
        query: config.query(),
    })
}

fn push<T: ToString>(
    target: &mut Vec<(&'static str, String)>,
    name: &'static str,
    value: Option<T>,
) {
    if let Some(value) = value {
        target.push((name, value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> UploadSource {
        UploadSource::bytes(b"hello".to_vec(), "hello.txt")
    }

    #[tokio::test]
    async fn omitted_fields_are_not_sent() {
        let submission = build_submission(&blob(), &SubmissionConfig::default())
            .await
            .expect("submission");
        assert!(submission.fields.is_empty());
        assert!(submission.query.is_empty());
        assert_eq!(submission.file.content_type, "text/plain");
    }

    #[tokio::test]
    async fn falsy_values_are_transmitted() {
        let config = SubmissionConfig {
            processing: ProcessingConfig {
                chunk_overlap: Some(0),
                extract_tables: Some(false),
                language: Some(String::new()),
                ..Default::default()
            },
            auto_link: Some(false),
            auto_link_threshold: Some(0.0),
            version_label: Some(String::new()),
            ..Default::default()
        };

        let submission = build_submission(&blob(), &config).await.expect("submission");
        assert_eq!(
            submission.fields,
            vec![
                ("chunk_overlap", "0".to_string()),
                ("extract_tables", "false".to_string()),
                ("language", String::new()),
            ]
        );
        assert_eq!(
            submission.query,
            vec![
                ("version_label", String::new()),
                ("auto_link", "false".to_string()),
                ("auto_link_threshold", "0".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn invalid_parent_fails_before_reading_source() {
        let config = SubmissionConfig {
            parent_document_id: Some("doc-1".into()),
            ..Default::default()
        };
        let error = build_submission(&UploadSource::path("/definitely/not/here.pdf"), &config)
            .await
            .expect_err("invalid parent id");
        assert!(matches!(error, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn out_of_range_threshold_is_rejected() {
        let config = SubmissionConfig {
            auto_link_threshold: Some(1.5),
            ..Default::default()
        };
        let error = build_submission(&blob(), &config)
            .await
            .expect_err("threshold above one");
        assert!(matches!(error, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn form_is_built_from_submission() {
        let submission = build_submission(&blob(), &SubmissionConfig::default())
            .await
            .expect("submission");
        assert!(submission.into_form().is_ok());
    }
}
