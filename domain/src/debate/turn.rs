//! A single contribution to the debate.

use crate::core::ids::{BranchId, TurnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    Model,
    Human,
}

/// One turn of the debate, as delivered on the push channel.
///
/// Turns are append-only within a session; ordering is arrival order, there
/// is no separate sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub turn_id: TurnId,
    pub branch_id: BranchId,
    pub participant_id: String,
    pub participant_type: ParticipantType,
    pub content: String,
    /// Self-reported confidence in 0..=1, when the participant provides one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,
    pub tokens_used: u64,
    pub cost_usd: f64,
    pub latency_ms: u64,
    pub created_at: DateTime<Utc>,
}
