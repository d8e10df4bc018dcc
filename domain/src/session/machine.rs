//! The transition table: legality check and apply step.
//!
//! `can_apply` is the pure validator; `apply` performs the mutation only when
//! the pair is listed in the table and returns the input state unchanged
//! otherwise. An illegal transition is caller misuse, not runtime failure,
//! so it is a no-op rather than an error.

use super::action::SessionAction;
use super::state::DebateSession;

impl DebateSession {
    /// Whether `action` is legal in the current state.
    ///
    /// Exhaustive over both enums; every pair not listed in the transition
    /// table falls through to `false`.
    pub fn can_apply(&self, action: &SessionAction) -> bool {
        use DebateSession as S;
        use SessionAction as A;

        match (self, action) {
            (S::Idle, A::UpdateConfig(_) | A::StartDebate(_) | A::Reset) => true,
            (S::Configuring { .. }, A::UpdateConfig(_) | A::StartDebate(_) | A::Reset) => true,
            (S::Starting { .. }, A::DebateStarted(_) | A::Fail { .. }) => true,
            (
                S::Running { .. },
                A::ReceiveTurn(_)
                | A::RoundComplete(_)
                | A::PauseDebate { .. }
                | A::DebateComplete(_)
                | A::Fail { .. },
            ) => true,
            (S::Paused { can_resume, .. }, A::ResumeDebate) => *can_resume,
            (S::Paused { .. }, A::Reset) => true,
            (S::Completed { .. }, A::Reset) => true,
            (S::Error { .. }, A::Reset) => true,
            _ => false,
        }
    }

    /// Apply `action`, returning the next state. Illegal transitions return
    /// the current state unchanged.
    pub fn apply(self, action: SessionAction) -> DebateSession {
        use DebateSession as S;
        use SessionAction as A;

        if !self.can_apply(&action) {
            return self;
        }

        match (self, action) {
            (S::Idle, A::UpdateConfig(update)) => {
                let mut draft = crate::config::ConfigDraft::default();
                draft.merge(update);
                S::Configuring { draft }
            }
            (S::Configuring { mut draft }, A::UpdateConfig(update)) => {
                draft.merge(update);
                S::Configuring { draft }
            }
            (S::Idle | S::Configuring { .. }, A::StartDebate(config)) => S::Starting { config },
            (S::Starting { .. }, A::DebateStarted(debate_id)) => S::Running {
                debate_id,
                current_round: 1,
                turns: Vec::new(),
            },
            (
                S::Running {
                    debate_id,
                    current_round,
                    mut turns,
                },
                A::ReceiveTurn(turn),
            ) => {
                turns.push(turn);
                S::Running {
                    debate_id,
                    current_round,
                    turns,
                }
            }
            (
                S::Running {
                    debate_id, turns, ..
                },
                A::RoundComplete(round),
            ) => S::Running {
                debate_id,
                current_round: round,
                turns,
            },
            (S::Running { debate_id, .. }, A::PauseDebate { reason }) => S::Paused {
                debate_id,
                reason,
                can_resume: true,
            },
            (
                S::Running {
                    debate_id, turns, ..
                },
                A::DebateComplete(consensus),
            ) => S::Completed {
                debate_id,
                consensus,
                turns,
            },
            // Paused carries no turn history, so resuming restarts the view.
            (S::Paused { debate_id, .. }, A::ResumeDebate) => S::Running {
                debate_id,
                current_round: 1,
                turns: Vec::new(),
            },
            (_, A::Fail { error, recoverable }) => S::Error { error, recoverable },
            (_, A::Reset) => S::Idle,
            // can_apply admitted it, so every legal pair is matched above.
            (state, action) => {
                unreachable!("unhandled legal transition: {} / {}", state.name(), action.name())
            }
        }
    }
}
