//! Classified push-stream events.
//!
//! Each wire frame is one JSON object: `{"type": "...", "data": {...}}`
//! where `type` is one of `turn`, `consensus`, `error`, `complete`. The
//! enum's serde representation *is* the structural schema: a frame that
//! fails to parse, or parses but does not match one of the four shapes,
//! classifies to `None` and is dropped by the transport.

use crate::core::ids::DebateId;
use crate::debate::consensus::ConsensusResult;
use crate::debate::turn::Turn;
use serde::{Deserialize, Serialize};

/// One event delivered on the push channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StreamEvent {
    /// A new turn to append to the running session.
    Turn(Turn),
    /// The final consensus; the debate is over.
    Consensus(ConsensusResult),
    /// A failure report. `recoverable: true` means the transport is already
    /// retrying; `false` ends the session.
    Error { message: String, recoverable: bool },
    /// The server finished the stream for this debate.
    Complete {
        #[serde(rename = "debateId")]
        debate_id: DebateId,
    },
}

impl StreamEvent {
    /// Classify a raw text frame. `None` means the frame is not part of the
    /// vocabulary and must be dropped without closing the connection.
    pub fn classify(frame: &str) -> Option<StreamEvent> {
        serde_json::from_str(frame).ok()
    }

    /// True when no further events are expected after this one.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::Consensus(_)
                | StreamEvent::Complete { .. }
                | StreamEvent::Error {
                    recoverable: false,
                    ..
                }
        )
    }
}
