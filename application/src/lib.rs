//! Application layer for parley
//!
//! Integrates the domain's state machine, branch model and event vocabulary
//! with the outside world through ports:
//!
//! - [`ports`] — async traits implemented by infrastructure: the push-channel
//!   connector and the one-shot debate API.
//! - [`transport`] — the resilient stream transport: a supervisor task that
//!   keeps one push channel per running debate alive, retrying with
//!   exponential backoff and classifying frames into [`StreamEvent`]s.
//! - [`store`] — the session store: the single owner of the session value,
//!   the branch forest and the fork draft, which applies transport events
//!   through the transition table and exposes read-only selectors.
//!
//! [`StreamEvent`]: parley_domain::StreamEvent

pub mod ports;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use ports::{
    debate_api::{BranchRequest, DebateApi},
    push_channel::{ChannelConnector, ChannelError, PushChannel},
};
pub use store::{ConnectionStatus, SessionStore};
pub use transport::{StreamTransport, TransportConfig};
