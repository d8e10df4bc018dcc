//! Domain layer for parley
//!
//! This crate contains the core business logic of the debate session viewer.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate Session
//!
//! A single debate lifecycle, tracked as a tagged-variant state machine:
//! configuration → run → terminal state. Mutation happens only through the
//! transition table; illegal transitions are rejected as no-ops.
//!
//! ## Branches & Forks
//!
//! Exploratory branches fork the conversation at a point in time. Branches
//! live in an identifier-keyed arena (a forest, not a tree: multiple roots
//! are allowed) and are referenced only by id.
//!
//! ## Stream Events
//!
//! The push channel feeds the session with a closed vocabulary of events:
//! `turn`, `consensus`, `error`, `complete`. Classification is structural
//! (serde); anything that does not match is dropped by the transport.

pub mod branch;
pub mod config;
pub mod core;
pub mod debate;
pub mod session;
pub mod stream;

// Re-export commonly used types
pub use branch::{Branch, BranchForest, ForkDraft};
pub use config::{ConfigDraft, DebateConfig, ForkMode};
pub use core::{
    error::{ApiError, ValidationIssue},
    ids::{BranchId, DebateId, TurnId},
};
pub use debate::{
    consensus::{ConsensusLevel, ConsensusResult},
    summary::{DebateCreated, DebateStatus, DebateSummary},
    turn::{ParticipantType, Turn},
};
pub use session::{action::SessionAction, state::DebateSession};
pub use stream::event::StreamEvent;
