//! Debate configuration: the mutable draft and the validated value.

mod debate_config;

pub use debate_config::{ConfigDraft, DebateConfig, ForkMode};
