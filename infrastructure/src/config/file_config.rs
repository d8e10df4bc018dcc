//! Raw configuration file structure (TOML).

use parley_application::TransportConfig;
use parley_domain::{ConfigDraft, ForkMode};
use serde::{Deserialize, Serialize};

/// Complete configuration file structure.
///
/// Every section and field is optional in the file; missing values fall back
/// to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub debate: DebateDefaults,
}

impl FileConfig {
    /// The built-in defaults rendered as TOML, for `parley config --defaults`.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&FileConfig::default())
    }
}

/// Where the debate server lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// Fixed correlation id for every request; a fresh UUID per request when
    /// unset.
    pub correlation_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            correlation_id: None,
        }
    }
}

/// Push-stream retry tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub max_retries: u32,
    pub initial_retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        let defaults = TransportConfig::default();
        Self {
            max_retries: defaults.max_retries,
            initial_retry_delay_ms: defaults.initial_retry_delay_ms,
            max_retry_delay_ms: defaults.max_retry_delay_ms,
        }
    }
}

impl StreamConfig {
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            max_retries: self.max_retries,
            initial_retry_delay_ms: self.initial_retry_delay_ms,
            max_retry_delay_ms: self.max_retry_delay_ms,
        }
    }
}

/// Seed values for new debate drafts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateDefaults {
    pub participants: Vec<String>,
    pub rounds: Option<u32>,
    pub consensus_threshold: Option<f64>,
    pub fork_mode: Option<ForkMode>,
}

impl DebateDefaults {
    /// Seed a draft from the configured defaults; the question is always
    /// per-run.
    pub fn draft(&self) -> ConfigDraft {
        ConfigDraft {
            question: None,
            participants: if self.participants.is_empty() {
                None
            } else {
                Some(self.participants.clone())
            },
            rounds: self.rounds,
            consensus_threshold: self.consensus_threshold,
            fork_mode: self.fork_mode,
        }
    }
}
