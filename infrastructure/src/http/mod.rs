//! One-shot HTTP adapter for the debate API.

mod client;
mod error;

pub use client::HttpDebateApi;
