//! Upload sources and the byte payload resolved from them.

use crate::error::ClientError;
use std::path::{Path, PathBuf};

/// Bytes to upload, either read from disk or supplied in memory.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// Regular file on the local filesystem.
    Path {
        /// File to read.
        path: PathBuf,
        /// Overrides extension-based MIME detection.
        content_type: Option<String>,
    },
    /// In-memory blob.
    Bytes {
        /// File contents.
        data: Vec<u8>,
        /// Name reported to the server; MIME type is sniffed from its extension.
        filename: String,
        /// Overrides extension-based MIME detection.
        content_type: Option<String>,
    },
}

impl UploadSource {
    /// Upload the file at `path`.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path {
            path: path.into(),
            content_type: None,
        }
    }

    /// Upload an in-memory blob under `filename`.
    pub fn bytes(data: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self::Bytes {
            data: data.into(),
            filename: filename.into(),
            content_type: None,
        }
    }

    /// Force the MIME type sent with the file part.
    pub fn with_content_type(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            Self::Path { content_type, .. } | Self::Bytes { content_type, .. } => {
                *content_type = Some(value.into());
            }
        }
        self
    }
}

/// File part ready to be attached to a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePayload {
    /// File contents.
    pub data: Vec<u8>,
    /// Validated filename.
    pub filename: String,
    /// Resolved MIME type.
    pub content_type: String,
}

/// Read the source and resolve its filename and MIME type.
pub async fn resolve_source(source: &UploadSource) -> Result<SourcePayload, ClientError> {
    match source {
        UploadSource::Path { path, content_type } => {
            let metadata = tokio::fs::metadata(path)
                .await
                .map_err(|err| invalid_source(path, err.to_string()))?;
            if !metadata.is_file() {
                return Err(invalid_source(path, "not a regular file".into()));
            }

            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| ClientError::InvalidFilename(path.display().to_string()))?;
            check_filename(filename)?;
            let content_type = resolve_content_type(filename, content_type.as_deref())
                .map_err(|reason| invalid_source(path, reason))?;

            let data = tokio::fs::read(path)
                .await
                .map_err(|err| invalid_source(path, err.to_string()))?;
            tracing::debug!(
                path = %path.display(),
                bytes = data.len(),
                content_type = %content_type,
                "Resolved upload source from disk"
            );

            Ok(SourcePayload {
                data,
                filename: filename.to_string(),
                content_type,
            })
        }
        UploadSource::Bytes {
            data,
            filename,
            content_type,
        } => {
            check_filename(filename)?;
            let content_type = resolve_content_type(filename, content_type.as_deref()).map_err(
                |reason| ClientError::InvalidSource {
                    path: filename.clone(),
                    reason,
                },
            )?;
            Ok(SourcePayload {
                data: data.clone(),
                filename: filename.clone(),
                content_type,
            })
        }
    }
}

/// Reject empty filenames and anything that could escape a directory.
pub fn check_filename(filename: &str) -> Result<(), ClientError> {
    let trimmed = filename.trim();
    if trimmed.is_empty()
        || trimmed.contains("..")
        || trimmed.contains(['/', '\\', '\0'])
    {
        return Err(ClientError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Explicit override when given, otherwise the extension lookup, otherwise octet-stream.
pub fn resolve_content_type(filename: &str, explicit: Option<&str>) -> Result<String, String> {
    match explicit.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value
            .parse::<mime_guess::Mime>()
            .map(|mime| mime.to_string())
            .map_err(|err| format!("invalid content type '{value}': {err}")),
        None => Ok(mime_guess::from_path(Path::new(filename))
            .first_or_octet_stream()
            .to_string()),
    }
}

fn invalid_source(path: &Path, reason: String) -> ClientError {
    ClientError::InvalidSource {
        path: path.display().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_regular_file_and_sniffs_mime() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.pdf");
        std::fs::File::create(&path)
            .and_then(|mut file| file.write_all(b"%PDF-1.7"))
            .expect("write fixture");

        let payload = resolve_source(&UploadSource::path(&path))
            .await
            .expect("payload");
        assert_eq!(payload.filename, "report.pdf");
        assert_eq!(payload.content_type, "application/pdf");
        assert_eq!(payload.data, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn rejects_missing_paths_and_directories() {
        let dir = tempfile::tempdir().expect("tempdir");

        let missing = resolve_source(&UploadSource::path(dir.path().join("absent.txt"))).await;
        assert!(matches!(missing, Err(ClientError::InvalidSource { .. })));

        let directory = resolve_source(&UploadSource::path(dir.path())).await;
        match directory {
            Err(ClientError::InvalidSource { reason, .. }) => {
                assert_eq!(reason, "not a regular file");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn in_memory_source_honors_override() {
        let payload = resolve_source(
            &UploadSource::bytes(b"a,b\n1,2".to_vec(), "table.data")
                .with_content_type("text/csv"),
        )
        .await
        .expect("payload");
        assert_eq!(payload.content_type, "text/csv");

        let unknown = resolve_source(&UploadSource::bytes(vec![0u8; 4], "blob.zzzunknown"))
            .await
            .expect("payload");
        assert_eq!(unknown.content_type, "application/octet-stream");
    }

    #[test]
    fn traversal_filenames_are_rejected() {
        for name in ["../etc/passwd", "a/b.txt", "a\\b.txt", "..", "", "  ", "x\0.txt"] {
            assert!(
                matches!(check_filename(name), Err(ClientError::InvalidFilename(_))),
                "{name:?} should be rejected"
            );
        }
        assert!(check_filename("notes.v2.md").is_ok());
    }
}
