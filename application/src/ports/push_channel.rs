//! The push-channel port.
//!
//! Defined here, implemented in infrastructure (and by scripted fakes in
//! tests). A channel delivers raw UTF-8 text frames; classification into the
//! event vocabulary happens in the transport, not at the wire.

use async_trait::async_trait;
use parley_domain::DebateId;
use thiserror::Error;

/// Connection-level failures of the push channel.
///
/// These are independent of application payloads: a malformed frame is not a
/// `ChannelError`, it is a frame the transport drops.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("failed to open push channel: {0}")]
    Connect(String),

    #[error("push channel lost: {0}")]
    Lost(String),
}

/// An open server-to-client connection delivering text frames.
#[async_trait]
pub trait PushChannel: Send {
    /// The next frame, `Err` on a connection-level failure, or `None` when
    /// the server closed the channel. Cancelling the future (dropping the
    /// channel) is the only way to stop waiting.
    async fn next_frame(&mut self) -> Option<Result<String, ChannelError>>;
}

/// Opens one push channel per debate.
#[async_trait]
pub trait ChannelConnector: Send + Sync + 'static {
    type Channel: PushChannel;

    async fn connect(&self, debate_id: &DebateId) -> Result<Self::Channel, ChannelError>;
}
