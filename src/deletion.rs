//! Deletion responses, including promotion and cascade side effects.
//!
//! `promoted` and `cascade` are independent. `None` means the side effect did not happen.

use crate::schema::ResourceKind;
use crate::schema::wire::{WireCascade, WireDeletionResponse, WirePromotion};
use serde::{Deserialize, Serialize};

/// Sibling entity that became the default after the deleted one was removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionInfo {
    /// Promoted entity.
    pub id: String,
    /// Kind of the promoted entity.
    pub kind: ResourceKind,
    /// Version label or variant name, when the server reports one.
    pub label: Option<String>,
}

/// Dependent entities removed transitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeInfo {
    /// Versions removed.
    pub versions: u64,
    /// Variants removed.
    pub variants: u64,
    /// Chunks removed.
    pub chunks: u64,
}

/// Uniform result of a variant, version, or document deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionResult {
    /// Deleted entity.
    pub id: String,
    /// Kind of the deleted entity.
    pub kind: ResourceKind,
    /// Server-reported status, usually `deleted`.
    pub status: String,
    /// Promotion side effect.
    pub promoted: Option<PromotionInfo>,
    /// Cascade side effect.
    pub cascade: Option<CascadeInfo>,
    /// RFC3339 deletion time.
    pub deleted_at: String,
}

impl DeletionResult {
    /// Total entities removed besides the addressed one.
    pub fn cascaded_total(&self) -> u64 {
        self.cascade
            .map(|info| info.versions + info.variants + info.chunks)
            .unwrap_or(0)
    }
}

/// Map a deletion response into its client shape.
pub fn map_deletion(wire: WireDeletionResponse) -> DeletionResult {
    DeletionResult {
        id: wire.id,
        kind: wire.kind,
        status: wire.status,
        promoted: wire.promoted.map(|promotion| PromotionInfo {
            id: promotion.id,
            kind: promotion.kind,
            label: promotion.label,
        }),
        cascade: wire.cascaded.map(|cascade| CascadeInfo {
            versions: cascade.versions_deleted,
            variants: cascade.variants_deleted,
            chunks: cascade.chunks_deleted,
        }),
        deleted_at: wire.deleted_at,
    }
}

impl From<WireDeletionResponse> for DeletionResult {
    fn from(wire: WireDeletionResponse) -> Self {
        map_deletion(wire)
    }
}

impl From<DeletionResult> for WireDeletionResponse {
    fn from(result: DeletionResult) -> Self {
        Self {
            id: result.id,
            kind: result.kind,
            status: result.status,
            promoted: result.promoted.map(|promotion| WirePromotion {
                id: promotion.id,
                kind: promotion.kind,
                label: promotion.label,
            }),
            cascaded: result.cascade.map(|cascade| WireCascade {
                versions_deleted: cascade.versions,
                variants_deleted: cascade.variants,
                chunks_deleted: cascade.chunks,
            }),
            deleted_at: result.deleted_at,
        }
    }
}
