//! The final consensus verdict of a debate.

use serde::{Deserialize, Serialize};

/// Strength band of the reached consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusLevel {
    Strong,
    Moderate,
    Weak,
    None,
}

impl std::fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusLevel::Strong => write!(f, "strong"),
            ConsensusLevel::Moderate => write!(f, "moderate"),
            ConsensusLevel::Weak => write!(f, "weak"),
            ConsensusLevel::None => write!(f, "none"),
        }
    }
}

/// Produced exactly once, when the session completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusResult {
    pub level: ConsensusLevel,
    /// Fraction of participants in agreement, 0..=1.
    pub percentage: f64,
    pub supporting: u32,
    pub dissenting: u32,
    /// Aggregate confidence in the verdict, 0..=1.
    pub confidence: f64,
}
