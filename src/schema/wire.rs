//! Wire representation exchanged with the API: flat, snake_case, exactly as the server sends it.
//!
//! Field names mirror the JSON keys one-to-one and are left undocumented.
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::{ProcessingState, ResourceKind};

/// Body returned by `POST /documents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireUploadResponse {
    #[serde(alias = "job_id")]
    pub variant_id: String,
    pub document_id: String,
    pub version_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProcessingState>,
    #[serde(default)]
    pub is_new_document: bool,
    #[serde(default)]
    pub is_new_version: bool,
    #[serde(default)]
    pub is_new_variant: bool,
    #[serde(default)]
    pub existing_match: bool,
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_saved: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplication_available: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_linked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_link_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_link_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_link_parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body returned by `GET /documents/variants/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireVariantStatus {
    pub id: String,
    pub status: ProcessingState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedup_stats: Option<WireDedupStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDedupStats {
    #[serde(default)]
    pub reused_chunks: u64,
    #[serde(default)]
    pub new_chunks: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reuse_ratio: Option<f64>,
}

/// Body returned by `GET /documents/variants/{id}/chunks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireChunkPage {
    #[serde(default)]
    pub chunks: Vec<WireChunk>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireChunk {
    pub id: String,
    pub chunk_index: u32,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_char: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_char: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_reused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Body returned by `DELETE /documents/variants/{id}/cancel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCancelResponse {
    pub id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body returned by the variant, version, and document `DELETE` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireDeletionResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted: Option<WirePromotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascaded: Option<WireCascade>,
    pub deleted_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePromotion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCascade {
    #[serde(default)]
    pub versions_deleted: u64,
    #[serde(default)]
    pub variants_deleted: u64,
    #[serde(default)]
    pub chunks_deleted: u64,
}
