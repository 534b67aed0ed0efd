//! Submission builder: upload sources, MIME resolution, multipart and query construction.

mod builder;
pub mod source;

pub use builder::{ProcessingConfig, Submission, SubmissionConfig, build_submission};
pub use source::{SourcePayload, UploadSource, check_filename, resolve_content_type};
