//! The closed action vocabulary of the session state machine.

use crate::config::{ConfigDraft, DebateConfig};
use crate::core::error::ApiError;
use crate::core::ids::DebateId;
use crate::debate::consensus::ConsensusResult;
use crate::debate::turn::Turn;

/// Everything that can happen to a [`DebateSession`](super::state::DebateSession).
///
/// Stream-driven actions (`ReceiveTurn`, `DebateComplete`, `Fail`) map 1:1
/// onto the transport's event vocabulary; the rest are caller-driven.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Merge a partial config into the draft.
    UpdateConfig(ConfigDraft),
    /// Freeze the draft and request creation. The config is validated by the
    /// caller before this action is constructed.
    StartDebate(DebateConfig),
    /// Server acknowledged creation and assigned an identifier.
    DebateStarted(DebateId),
    /// A turn arrived on the push stream.
    ReceiveTurn(Turn),
    /// A round finished; advance the round counter.
    RoundComplete(u32),
    /// Suspend the live debate.
    PauseDebate { reason: String },
    /// Resume a paused debate (honored only when `can_resume`).
    ResumeDebate,
    /// The final consensus arrived; the debate is over.
    DebateComplete(ConsensusResult),
    /// A non-recoverable failure occurred.
    Fail { error: ApiError, recoverable: bool },
    /// Return to `Idle`, discarding everything.
    Reset,
}

impl SessionAction {
    /// Short action name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::UpdateConfig(_) => "update_config",
            SessionAction::StartDebate(_) => "start_debate",
            SessionAction::DebateStarted(_) => "debate_started",
            SessionAction::ReceiveTurn(_) => "receive_turn",
            SessionAction::RoundComplete(_) => "round_complete",
            SessionAction::PauseDebate { .. } => "pause_debate",
            SessionAction::ResumeDebate => "resume_debate",
            SessionAction::DebateComplete(_) => "debate_complete",
            SessionAction::Fail { .. } => "fail",
            SessionAction::Reset => "reset",
        }
    }
}
