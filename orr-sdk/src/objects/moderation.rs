//! DTOs for the moderator-facing API.

use super::ReviewStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One entry of the moderation queue: a staged change joined against the
/// canonical record it targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationItem {
    pub id: Uuid,
    /// Unix seconds.
    pub created_at: i64,
    pub status: ReviewStatus,
    /// Canonical state of the targeted entity, `null` when it does not
    /// exist yet (new-vehicle claims, first-time profiles).
    pub current: Option<serde_json::Value>,
    /// The submitted payload.
    pub proposed: serde_json::Value,
    /// Fields whose proposed value differs from the canonical one.
    /// Identical fields are omitted.
    pub diff: BTreeMap<String, FieldDiff>,
}

/// A single differing field in a moderation diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub current: Option<serde_json::Value>,
    pub proposed: serde_json::Value,
}

/// Response of `GET /moderation/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// Response of the approve/reject endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
}
