//! Configuration file handling.

mod file_config;
mod loader;

pub use file_config::{DebateDefaults, FileConfig, ServerConfig, StreamConfig};
pub use loader::ConfigLoader;
