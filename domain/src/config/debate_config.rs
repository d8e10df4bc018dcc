//! Debate configuration value object and its mergeable draft.
//!
//! Configuration is edited as a [`ConfigDraft`] (every field optional,
//! drafts merge field-wise) and frozen into a [`DebateConfig`] when the
//! session starts. Validation happens exactly once, at the freeze point:
//! [`DebateConfig::from_draft`] reports every violated field as a
//! [`ValidationIssue`] rather than stopping at the first.

use crate::core::error::{ApiError, ValidationIssue};
use serde::{Deserialize, Serialize};

/// Question length bounds (chars, after trimming).
const QUESTION_MIN: usize = 10;
const QUESTION_MAX: usize = 500;

/// Participant count bounds.
const PARTICIPANTS_MIN: usize = 2;
const PARTICIPANTS_MAX: usize = 7;

/// Round count bounds.
const ROUNDS_MIN: u32 = 1;
const ROUNDS_MAX: u32 = 10;

/// Consensus threshold bounds.
const THRESHOLD_MIN: f64 = 0.5;
const THRESHOLD_MAX: f64 = 1.0;

/// What happens to the original branch when a fork is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForkMode {
    /// Keep the original branch and continue it alongside the fork.
    #[default]
    Save,
    /// Treat the fork as a throwaway exploration.
    Explore,
}

impl std::fmt::Display for ForkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForkMode::Save => write!(f, "save"),
            ForkMode::Explore => write!(f, "explore"),
        }
    }
}

/// Partial, user-edited configuration. Merging keeps the newest value per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigDraft {
    pub question: Option<String>,
    pub participants: Option<Vec<String>>,
    pub rounds: Option<u32>,
    pub consensus_threshold: Option<f64>,
    pub fork_mode: Option<ForkMode>,
}

impl ConfigDraft {
    /// Merge `update` into this draft. Fields present in `update` win;
    /// absent fields keep their current value.
    pub fn merge(&mut self, update: ConfigDraft) {
        if update.question.is_some() {
            self.question = update.question;
        }
        if update.participants.is_some() {
            self.participants = update.participants;
        }
        if update.rounds.is_some() {
            self.rounds = update.rounds;
        }
        if update.consensus_threshold.is_some() {
            self.consensus_threshold = update.consensus_threshold;
        }
        if update.fork_mode.is_some() {
            self.fork_mode = update.fork_mode;
        }
    }
}

/// Validated debate configuration. Immutable once a session enters `Starting`:
/// the state machine takes it by value and no mutator is exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateConfig {
    pub question: String,
    pub participants: Vec<String>,
    pub rounds: u32,
    pub consensus_threshold: f64,
    pub fork_mode: ForkMode,
}

impl DebateConfig {
    /// Freeze a draft into a validated config.
    ///
    /// Returns [`ApiError::Validation`] carrying one issue per violated
    /// field. Defaults: `rounds` 4, `consensus_threshold` 0.8, `fork_mode`
    /// save. `question` and `participants` have no defaults and must be
    /// present.
    pub fn from_draft(draft: &ConfigDraft) -> Result<Self, ApiError> {
        let mut issues = Vec::new();

        let question = draft.question.as_deref().unwrap_or("").trim().to_string();
        let len = question.chars().count();
        if len < QUESTION_MIN || len > QUESTION_MAX {
            issues.push(ValidationIssue::new(
                "question",
                format!("must be {QUESTION_MIN}-{QUESTION_MAX} characters, got {len}"),
            ));
        }

        let participants = draft.participants.clone().unwrap_or_default();
        if participants.len() < PARTICIPANTS_MIN || participants.len() > PARTICIPANTS_MAX {
            issues.push(ValidationIssue::new(
                "participants",
                format!(
                    "must list {PARTICIPANTS_MIN}-{PARTICIPANTS_MAX} participants, got {}",
                    participants.len()
                ),
            ));
        } else {
            let mut seen = std::collections::HashSet::new();
            if !participants.iter().all(|p| seen.insert(p.as_str())) {
                issues.push(ValidationIssue::new(
                    "participants",
                    "participant identifiers must be unique",
                ));
            }
        }

        let rounds = draft.rounds.unwrap_or(4);
        if !(ROUNDS_MIN..=ROUNDS_MAX).contains(&rounds) {
            issues.push(ValidationIssue::new(
                "rounds",
                format!("must be between {ROUNDS_MIN} and {ROUNDS_MAX}, got {rounds}"),
            ));
        }

        let consensus_threshold = draft.consensus_threshold.unwrap_or(0.8);
        if !(THRESHOLD_MIN..=THRESHOLD_MAX).contains(&consensus_threshold) {
            issues.push(ValidationIssue::new(
                "consensusThreshold",
                format!(
                    "must be between {THRESHOLD_MIN} and {THRESHOLD_MAX}, got {consensus_threshold}"
                ),
            ));
        }

        if !issues.is_empty() {
            return Err(ApiError::Validation { issues });
        }

        Ok(Self {
            question,
            participants,
            rounds,
            consensus_threshold,
            fork_mode: draft.fork_mode.unwrap_or_default(),
        })
    }
}
