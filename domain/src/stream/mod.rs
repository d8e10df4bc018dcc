//! The push-channel event vocabulary.

pub mod event;
