//! The in-progress, not-yet-submitted fork content.

use crate::config::ForkMode;
use crate::core::ids::{BranchId, TurnId};
use serde::{Deserialize, Serialize};

/// At most one draft exists at a time; starting a new fork silently replaces
/// any existing one. Completing a fork only hands the draft back — branch
/// creation is driven by the server's authoritative response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkDraft {
    /// The turn the fork branches off from.
    pub parent_turn_id: TurnId,
    /// The branch that turn belongs to.
    pub parent_branch_id: BranchId,
    /// User-edited content seeding the new branch.
    pub content: String,
    pub fork_mode: ForkMode,
}

impl ForkDraft {
    /// A fresh draft with empty content.
    pub fn new(parent_turn_id: TurnId, parent_branch_id: BranchId, fork_mode: ForkMode) -> Self {
        Self {
            parent_turn_id,
            parent_branch_id,
            content: String::new(),
            fork_mode,
        }
    }
}
