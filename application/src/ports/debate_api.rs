//! The one-shot request/response port.
//!
//! Consumed as a black box: every call resolves to a payload or exactly one
//! [`ApiError`] variant — it never panics and never returns anything outside
//! the taxonomy.

use async_trait::async_trait;
use parley_domain::{
    ApiError, Branch, BranchId, DebateConfig, DebateCreated, DebateId, DebateSummary, ForkDraft,
    ForkMode, TurnId,
};
use serde::{Deserialize, Serialize};

/// Submission payload for a completed fork draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRequest {
    pub parent_branch_id: BranchId,
    pub fork_turn_id: TurnId,
    pub name: String,
    pub fork_mode: ForkMode,
    pub content: String,
}

impl BranchRequest {
    /// Build a submission from a completed draft and a user-chosen name.
    pub fn from_draft(draft: ForkDraft, name: impl Into<String>) -> Self {
        Self {
            parent_branch_id: draft.parent_branch_id,
            fork_turn_id: draft.parent_turn_id,
            name: name.into(),
            fork_mode: draft.fork_mode,
            content: draft.content,
        }
    }
}

/// One-shot debate API operations.
#[async_trait]
pub trait DebateApi: Send + Sync {
    async fn create_debate(&self, config: &DebateConfig) -> Result<DebateCreated, ApiError>;

    async fn get_debate(&self, id: &DebateId) -> Result<DebateSummary, ApiError>;

    async fn list_debates(&self) -> Result<Vec<DebateSummary>, ApiError>;

    async fn delete_debate(&self, id: &DebateId) -> Result<(), ApiError>;

    /// Submit a fork; the returned [`Branch`] is the authoritative record to
    /// insert into the forest.
    async fn create_branch(
        &self,
        debate_id: &DebateId,
        request: &BranchRequest,
    ) -> Result<Branch, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_draft_maps_every_field() {
        let mut draft = ForkDraft::new(
            TurnId::new("t-7"),
            BranchId::new("b-root"),
            ForkMode::Explore,
        );
        draft.content = "what if we assumed the opposite?".to_string();

        let request = BranchRequest::from_draft(draft, "counterfactual");
        assert_eq!(request.parent_branch_id, BranchId::new("b-root"));
        assert_eq!(request.fork_turn_id, TurnId::new("t-7"));
        assert_eq!(request.name, "counterfactual");
        assert_eq!(request.fork_mode, ForkMode::Explore);
        assert_eq!(request.content, "what if we assumed the opposite?");
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = BranchRequest {
            parent_branch_id: BranchId::new("b-root"),
            fork_turn_id: TurnId::new("t-7"),
            name: "counterfactual".into(),
            fork_mode: ForkMode::Save,
            content: "seed".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["parentBranchId"], "b-root");
        assert_eq!(json["forkTurnId"], "t-7");
        assert_eq!(json["forkMode"], "save");
    }
}
