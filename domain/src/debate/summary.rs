//! Payloads of the one-shot debate API.

use crate::core::ids::DebateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-side lifecycle of a debate, as reported by list/get calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for DebateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebateStatus::Pending => write!(f, "pending"),
            DebateStatus::Running => write!(f, "running"),
            DebateStatus::Completed => write!(f, "completed"),
            DebateStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Response to a successful debate creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateCreated {
    pub debate_id: DebateId,
}

/// One entry of the debate listing / the get-by-id payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateSummary {
    pub debate_id: DebateId,
    pub question: String,
    pub participants: Vec<String>,
    pub status: DebateStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_wire_format() {
        let json = serde_json::json!({
            "debateId": "d-1",
            "question": "Is remote work better?",
            "participants": ["a", "b"],
            "status": "running",
            "createdAt": "2026-08-01T09:30:00Z"
        });
        let summary: DebateSummary = serde_json::from_value(json).unwrap();
        assert_eq!(summary.debate_id, DebateId::new("d-1"));
        assert_eq!(summary.status, DebateStatus::Running);
        assert_eq!(summary.participants.len(), 2);
    }
}
