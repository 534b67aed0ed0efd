//! Bidirectional conversion between wire and client representations.
//!
//! Grouped client structs (`deduplication`, `auto_link`) are `None` exactly when every flat wire
//! field feeding them is absent, so mapping back reproduces the original wire record.

use super::model::{
    AutoLinkInfo, CancelResult, Chunk, ChunkMetadata, ChunkPage, ChunkPosition, DedupStats,
    DeduplicationInfo, JobHandle, ProcessingTiming, SubmissionFlags, UploadResult, VariantStatus,
};
use super::wire::{
    WireCancelResponse, WireChunk, WireChunkPage, WireDedupStats, WireUploadResponse,
    WireVariantStatus,
};

impl From<WireUploadResponse> for UploadResult {
    fn from(wire: WireUploadResponse) -> Self {
        let deduplication = (wire.canonical_document_id.is_some()
            || wire.cost_saved.is_some()
            || wire.deduplication_available.is_some())
        .then(|| DeduplicationInfo {
            canonical_document_id: wire.canonical_document_id,
            cost_saved: wire.cost_saved,
            available: wire.deduplication_available,
        });

        let auto_link = (wire.auto_linked.is_some()
            || wire.auto_link_confidence.is_some()
            || wire.auto_link_method.is_some()
            || wire.auto_link_parent_id.is_some())
        .then(|| AutoLinkInfo {
            linked: wire.auto_linked,
            confidence: wire.auto_link_confidence,
            method: wire.auto_link_method,
            parent_document_id: wire.auto_link_parent_id,
        });

        Self {
            job: JobHandle::new(wire.variant_id),
            document_id: wire.document_id,
            version_id: wire.version_id,
            status: wire.status,
            flags: SubmissionFlags {
                is_new_document: wire.is_new_document,
                is_new_version: wire.is_new_version,
                is_new_variant: wire.is_new_variant,
                existing_match: wire.existing_match,
                is_duplicate: wire.is_duplicate,
            },
            deduplication,
            auto_link,
            message: wire.message,
        }
    }
}

impl From<UploadResult> for WireUploadResponse {
    fn from(result: UploadResult) -> Self {
        let dedup = result.deduplication.unwrap_or_default();
        let link = result.auto_link.unwrap_or_default();
        Self {
            variant_id: result.job.into(),
            document_id: result.document_id,
            version_id: result.version_id,
            status: result.status,
            is_new_document: result.flags.is_new_document,
            is_new_version: result.flags.is_new_version,
            is_new_variant: result.flags.is_new_variant,
            existing_match: result.flags.existing_match,
            is_duplicate: result.flags.is_duplicate,
            canonical_document_id: dedup.canonical_document_id,
            cost_saved: dedup.cost_saved,
            deduplication_available: dedup.available,
            auto_linked: link.linked,
            auto_link_confidence: link.confidence,
            auto_link_method: link.method,
            auto_link_parent_id: link.parent_document_id,
            message: result.message,
        }
    }
}

impl From<WireDedupStats> for DedupStats {
    fn from(wire: WireDedupStats) -> Self {
        Self {
            reused_chunks: wire.reused_chunks,
            new_chunks: wire.new_chunks,
            reuse_ratio: wire.reuse_ratio,
        }
    }
}

impl From<DedupStats> for WireDedupStats {
    fn from(stats: DedupStats) -> Self {
        Self {
            reused_chunks: stats.reused_chunks,
            new_chunks: stats.new_chunks,
            reuse_ratio: stats.reuse_ratio,
        }
    }
}

impl From<WireVariantStatus> for VariantStatus {
    fn from(wire: WireVariantStatus) -> Self {
        Self {
            job: JobHandle::new(wire.id),
            state: wire.status,
            error: wire.error,
            chunks_count: wire.chunks_count,
            total_tokens: wire.total_tokens,
            dedup_stats: wire.dedup_stats.map(DedupStats::from),
            timing: ProcessingTiming {
                created_at: wire.created_at,
                started_at: wire.started_at,
                completed_at: wire.completed_at,
                processing_time_ms: wire.processing_time_ms,
            },
        }
    }
}

impl From<VariantStatus> for WireVariantStatus {
    fn from(status: VariantStatus) -> Self {
        Self {
            id: status.job.into(),
            status: status.state,
            error: status.error,
            chunks_count: status.chunks_count,
            total_tokens: status.total_tokens,
            dedup_stats: status.dedup_stats.map(WireDedupStats::from),
            created_at: status.timing.created_at,
            started_at: status.timing.started_at,
            completed_at: status.timing.completed_at,
            processing_time_ms: status.timing.processing_time_ms,
        }
    }
}

impl From<WireChunk> for Chunk {
    fn from(wire: WireChunk) -> Self {
        Self {
            id: wire.id,
            index: wire.chunk_index,
            content: wire.content,
            token_count: wire.token_count,
            position: ChunkPosition {
                start_char: wire.start_char,
                end_char: wire.end_char,
                page_number: wire.page_number,
            },
            metadata: ChunkMetadata {
                section_title: wire.section_title,
                chunk_type: wire.chunk_type,
                confidence: wire.confidence,
                content_hash: wire.content_hash,
                reused: wire.is_reused,
                extra: wire.metadata,
            },
        }
    }
}

impl From<Chunk> for WireChunk {
    fn from(chunk: Chunk) -> Self {
        Self {
            id: chunk.id,
            chunk_index: chunk.index,
            content: chunk.content,
            token_count: chunk.token_count,
            start_char: chunk.position.start_char,
            end_char: chunk.position.end_char,
            page_number: chunk.position.page_number,
            section_title: chunk.metadata.section_title,
            chunk_type: chunk.metadata.chunk_type,
            confidence: chunk.metadata.confidence,
            content_hash: chunk.metadata.content_hash,
            is_reused: chunk.metadata.reused,
            metadata: chunk.metadata.extra,
        }
    }
}

impl From<WireChunkPage> for ChunkPage {
    fn from(wire: WireChunkPage) -> Self {
        Self {
            chunks: wire.chunks.into_iter().map(Chunk::from).collect(),
            total: wire.total,
        }
    }
}

impl From<ChunkPage> for WireChunkPage {
    fn from(page: ChunkPage) -> Self {
        Self {
            chunks: page.chunks.into_iter().map(WireChunk::from).collect(),
            total: page.total,
        }
    }
}

impl From<WireCancelResponse> for CancelResult {
    fn from(wire: WireCancelResponse) -> Self {
        Self {
            job: JobHandle::new(wire.id),
            status: wire.status,
            message: wire.message,
        }
    }
}

impl From<CancelResult> for WireCancelResponse {
    fn from(result: CancelResult) -> Self {
        Self {
            id: result.job.into(),
            status: result.status,
            message: result.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ProcessingState;
    use serde_json::{Value, json};

    fn full_upload() -> WireUploadResponse {
        serde_json::from_value(json!({
            "variant_id": "7d0c6a52-0f5e-4d8e-9a4d-1b2c3d4e5f60",
            "document_id": "doc-1",
            "version_id": "ver-2",
            "status": "pending",
            "is_new_document": false,
            "is_new_version": true,
            "is_new_variant": true,
            "existing_match": true,
            "is_duplicate": false,
            "canonical_document_id": "doc-0",
            "cost_saved": 0.75,
            "deduplication_available": true,
            "auto_linked": true,
            "auto_link_confidence": 0.91,
            "auto_link_method": "filename_similarity",
            "auto_link_parent_id": "doc-1",
            "message": "queued"
        }))
        .expect("upload response")
    }

    #[test]
    fn upload_response_nests_flat_fields() {
        let result = UploadResult::from(full_upload());
        assert_eq!(result.job.as_str(), "7d0c6a52-0f5e-4d8e-9a4d-1b2c3d4e5f60");
        assert_eq!(result.status, Some(ProcessingState::Pending));
        assert!(result.flags.is_new_version && result.flags.existing_match);
        assert!(!result.flags.is_duplicate);

        let dedup = result.deduplication.as_ref().expect("dedup info");
        assert_eq!(dedup.canonical_document_id.as_deref(), Some("doc-0"));
        assert_eq!(dedup.available, Some(true));

        let link = result.auto_link.as_ref().expect("auto link info");
        assert_eq!(link.linked, Some(true));
        assert_eq!(link.method.as_deref(), Some("filename_similarity"));

        let client = serde_json::to_value(&result).expect("serialize");
        assert_eq!(client["autoLink"]["parentDocumentId"], "doc-1");
        assert_eq!(client["flags"]["isNewVersion"], true);
    }

    #[test]
    fn upload_response_round_trips() {
        let wire = full_upload();
        assert_eq!(WireUploadResponse::from(UploadResult::from(wire.clone())), wire);

        let minimal: WireUploadResponse = serde_json::from_value(json!({
            "job_id": "job-9",
            "document_id": "doc-9",
            "version_id": "ver-9"
        }))
        .expect("minimal upload response");
        let mapped = UploadResult::from(minimal.clone());
        assert!(mapped.deduplication.is_none());
        assert!(mapped.auto_link.is_none());
        assert_eq!(WireUploadResponse::from(mapped), minimal);
    }

    #[test]
    fn status_and_chunks_round_trip() {
        let status: WireVariantStatus = serde_json::from_value(json!({
            "id": "job-1",
            "status": "completed",
            "chunks_count": 2,
            "total_tokens": 310,
            "dedup_stats": { "reused_chunks": 1, "new_chunks": 1, "reuse_ratio": 0.5 },
            "created_at": "2025-03-01T10:00:00Z",
            "completed_at": "2025-03-01T10:00:04Z",
            "processing_time_ms": 4000
        }))
        .expect("status");
        let mapped = VariantStatus::from(status.clone());
        assert_eq!(mapped.state, ProcessingState::Completed);
        assert_eq!(mapped.timing.processing_time_ms, Some(4000));
        assert_eq!(WireVariantStatus::from(mapped), status);

        let page: WireChunkPage = serde_json::from_value(json!({
            "chunks": [
                {
                    "id": "c-0",
                    "chunk_index": 0,
                    "content": "Introduction",
                    "token_count": 3,
                    "start_char": 0,
                    "end_char": 12,
                    "page_number": 1,
                    "section_title": "Intro",
                    "chunk_type": "heading",
                    "confidence": 0.98,
                    "content_hash": "ab12",
                    "is_reused": true,
                    "metadata": { "font": "serif" }
                },
                { "id": "c-1", "chunk_index": 1, "content": "Body" }
            ],
            "total": 2
        }))
        .expect("page");
        let mapped = ChunkPage::from(page.clone());
        assert_eq!(mapped.chunks[0].position.page_number, Some(1));
        assert_eq!(mapped.chunks[0].metadata.reused, Some(true));
        assert_eq!(
            mapped.chunks[0].metadata.extra.as_ref().and_then(|m| m.get("font")),
            Some(&Value::String("serif".into()))
        );
        assert_eq!(mapped.chunks[1].metadata, ChunkMetadata::default());
        assert_eq!(WireChunkPage::from(mapped), page);
    }

    #[test]
    fn unknown_state_is_rejected() {
        let result: Result<WireVariantStatus, _> =
            serde_json::from_value(json!({ "id": "job-1", "status": "exploded" }));
        assert!(result.is_err());
    }
}
