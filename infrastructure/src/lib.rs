//! Infrastructure layer - adapters binding the application ports to the
//! outside world.
//!
//! - `http`: reqwest adapter for the one-shot debate API
//! - `push`: NDJSON push channel over a streaming HTTP response
//! - `config`: figment-based configuration file loading

pub mod config;
pub mod http;
pub mod push;

pub use config::{ConfigLoader, FileConfig};
pub use http::HttpDebateApi;
pub use push::HttpStreamConnector;
