//! NDJSON push channel: a long-lived streaming HTTP response carrying one
//! JSON object per line.

mod connector;
mod framing;

pub use connector::{HttpPushChannel, HttpStreamConnector};
