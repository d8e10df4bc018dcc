//! A conversation branch (Entity).

use crate::config::ForkMode;
use crate::core::ids::{BranchId, TurnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named point-in-time fork of the debate's turn history.
///
/// Created once, never mutated. `depth == 0` iff the branch is a root
/// (`parent_branch_id` and `fork_turn_id` are `None`); otherwise depth is
/// parent depth + 1, which the [`child_of`](Branch::child_of) constructor
/// makes structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub branch_id: BranchId,
    pub parent_branch_id: Option<BranchId>,
    pub fork_turn_id: Option<TurnId>,
    pub name: String,
    pub fork_mode: ForkMode,
    pub depth: u32,
    pub created_at: DateTime<Utc>,
}

impl Branch {
    /// A root branch: no parent, no fork point, depth 0.
    pub fn root(branch_id: BranchId, name: impl Into<String>, fork_mode: ForkMode) -> Self {
        Self {
            branch_id,
            parent_branch_id: None,
            fork_turn_id: None,
            name: name.into(),
            fork_mode,
            depth: 0,
            created_at: Utc::now(),
        }
    }

    /// A child forked off `parent` at `fork_turn_id`.
    pub fn child_of(
        parent: &Branch,
        branch_id: BranchId,
        fork_turn_id: TurnId,
        name: impl Into<String>,
        fork_mode: ForkMode,
    ) -> Self {
        Self {
            branch_id,
            parent_branch_id: Some(parent.branch_id.clone()),
            fork_turn_id: Some(fork_turn_id),
            name: name.into(),
            fork_mode,
            depth: parent.depth + 1,
            created_at: Utc::now(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_branch_id.is_none()
    }
}
