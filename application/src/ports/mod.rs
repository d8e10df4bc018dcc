//! Ports: interfaces the application layer needs from infrastructure.

pub mod debate_api;
pub mod push_channel;
