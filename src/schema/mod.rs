//! Wire and client schemas plus the mapping between them.

mod mapper;
pub mod model;
pub mod wire;

pub use model::{
    AutoLinkInfo, CancelResult, Chunk, ChunkMetadata, ChunkPage, ChunkPosition, DedupStats,
    DeduplicationInfo, JobHandle, ProcessingResult, ProcessingState, ProcessingTiming,
    ResourceKind, SubmissionFlags, UploadResult, VariantStatus,
};
