//! The session value: one tagged variant at a time.

use crate::config::{ConfigDraft, DebateConfig};
use crate::core::error::ApiError;
use crate::core::ids::DebateId;
use crate::debate::consensus::ConsensusResult;
use crate::debate::turn::Turn;

/// Lifecycle of a single debate.
///
/// Created as [`Idle`](DebateSession::Idle); mutated only through
/// [`apply`](DebateSession::apply); reset back to `Idle` by an explicit
/// `Reset` action.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DebateSession {
    /// Nothing configured yet.
    #[default]
    Idle,
    /// Configuration in progress; the draft merges across updates.
    Configuring { draft: ConfigDraft },
    /// Creation requested; waiting for the server to acknowledge.
    Starting { config: DebateConfig },
    /// Live debate consuming the push stream.
    Running {
        debate_id: DebateId,
        current_round: u32,
        turns: Vec<Turn>,
    },
    /// Suspended by the user. Does not carry turn history: resuming restarts
    /// the view at round 1 (see DESIGN.md).
    Paused {
        debate_id: DebateId,
        reason: String,
        can_resume: bool,
    },
    /// Terminal: the debate reached its consensus.
    Completed {
        debate_id: DebateId,
        consensus: ConsensusResult,
        turns: Vec<Turn>,
    },
    /// Terminal: a non-recoverable failure. Only `Reset` is accepted.
    Error { error: ApiError, recoverable: bool },
}

impl DebateSession {
    /// Short variant name, for logging and status lines.
    pub fn name(&self) -> &'static str {
        match self {
            DebateSession::Idle => "idle",
            DebateSession::Configuring { .. } => "configuring",
            DebateSession::Starting { .. } => "starting",
            DebateSession::Running { .. } => "running",
            DebateSession::Paused { .. } => "paused",
            DebateSession::Completed { .. } => "completed",
            DebateSession::Error { .. } => "error",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, DebateSession::Running { .. })
    }

    /// True for states that accept nothing but `Reset`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DebateSession::Completed { .. } | DebateSession::Error { .. }
        )
    }

    /// The debate identifier, once one has been assigned.
    pub fn debate_id(&self) -> Option<&DebateId> {
        match self {
            DebateSession::Running { debate_id, .. }
            | DebateSession::Paused { debate_id, .. }
            | DebateSession::Completed { debate_id, .. } => Some(debate_id),
            _ => None,
        }
    }

    /// Accumulated turns, in arrival order.
    pub fn turns(&self) -> &[Turn] {
        match self {
            DebateSession::Running { turns, .. } | DebateSession::Completed { turns, .. } => turns,
            _ => &[],
        }
    }

    /// The consensus result, once the debate completed.
    pub fn consensus(&self) -> Option<&ConsensusResult> {
        match self {
            DebateSession::Completed { consensus, .. } => Some(consensus),
            _ => None,
        }
    }
}
