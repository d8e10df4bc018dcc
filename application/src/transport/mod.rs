//! The resilient stream transport.
//!
//! [`StreamTransport::spawn`] starts a supervisor task that opens a push
//! channel for one debate and keeps it alive: frames are classified into
//! [`StreamEvent`]s and delivered through the handler channel; connection
//! loss is retried with exponential backoff until the retry budget runs out,
//! at which point a single `error { recoverable: false }` event is
//! synthesized into the same vocabulary.
//!
//! The supervisor owns exactly one of {open channel, pending backoff timer,
//! nothing} at any moment — the [`Phase`] value it loops over holds one at a
//! time, so "always cancel before replace" is structural rather than
//! convention.

use crate::ports::push_channel::{ChannelConnector, PushChannel};
use parley_domain::{DebateId, StreamEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Retry tuning for the stream transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Reconnect attempts before giving up.
    pub max_retries: u32,
    /// Delay before the first reconnect.
    pub initial_retry_delay_ms: u64,
    /// Ceiling for the doubled delays.
    pub max_retry_delay_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_retry_delay_ms: 1000,
            max_retry_delay_ms: 30000,
        }
    }
}

impl TransportConfig {
    /// Backoff before reconnect number `retry_count + 1`:
    /// `min(initial · 2^retry_count, max)`.
    fn retry_delay(&self, retry_count: u32) -> Duration {
        let factor = 1u64 << retry_count.min(32);
        let ms = self
            .initial_retry_delay_ms
            .saturating_mul(factor)
            .min(self.max_retry_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Commands a caller can send into the supervisor.
enum TransportCommand {
    /// Drop timer and channel, reset the retry counter, connect now.
    Reconnect,
}

/// Handle to a running transport supervisor.
///
/// Dropping the handle closes the transport.
pub struct StreamTransport {
    commands: mpsc::UnboundedSender<TransportCommand>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StreamTransport {
    /// Start a supervisor for `debate_id`. Connects immediately; classified
    /// events are delivered through `handler`.
    pub fn spawn<C: ChannelConnector>(
        connector: Arc<C>,
        debate_id: DebateId,
        config: TransportConfig,
        handler: mpsc::UnboundedSender<StreamEvent>,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let (commands, command_rx) = mpsc::unbounded_channel();

        let supervisor = Supervisor {
            connector,
            debate_id,
            config,
            handler,
            commands: command_rx,
            shutdown: shutdown.clone(),
            retries: 0,
        };
        let task = tokio::spawn(supervisor.run());

        Self {
            commands,
            shutdown,
            task: Some(task),
        }
    }

    /// User-initiated "retry now": cancels any pending backoff, drops the
    /// current channel, resets the retry counter and connects immediately.
    pub fn reconnect(&self) {
        let _ = self.commands.send(TransportCommand::Reconnect);
    }

    /// Cancel any pending reconnect, close the active connection and stop
    /// the supervisor. Idempotent.
    pub fn close(&mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            drop(task); // the supervisor exits on its own via the token
        }
    }
}

impl Drop for StreamTransport {
    fn drop(&mut self) {
        self.close();
    }
}

/// What the supervisor is holding right now.
enum Phase<Ch> {
    /// Nothing held; attempt a connection next.
    Connect,
    /// One open channel.
    Open(Ch),
    /// One pending backoff timer.
    Backoff(Duration),
    /// Retry budget exhausted; parked until `reconnect()` or `close()`.
    Exhausted,
}

struct Supervisor<C: ChannelConnector> {
    connector: Arc<C>,
    debate_id: DebateId,
    config: TransportConfig,
    handler: mpsc::UnboundedSender<StreamEvent>,
    commands: mpsc::UnboundedReceiver<TransportCommand>,
    shutdown: CancellationToken,
    retries: u32,
}

impl<C: ChannelConnector> Supervisor<C> {
    async fn run(mut self) {
        let mut phase: Phase<C::Channel> = Phase::Connect;
        loop {
            phase = match phase {
                Phase::Connect => self.connect_phase().await,
                Phase::Open(channel) => self.open_phase(channel).await,
                Phase::Backoff(delay) => self.backoff_phase(delay).await,
                Phase::Exhausted => self.exhausted_phase().await,
            };
            if self.shutdown.is_cancelled() {
                debug!(debate_id = %self.debate_id, "stream transport closed");
                return;
            }
        }
    }

    async fn connect_phase(&mut self) -> Phase<C::Channel> {
        tokio::select! {
            _ = self.shutdown.cancelled() => Phase::Connect,
            command = self.commands.recv() => self.on_command(command),
            result = self.connector.connect(&self.debate_id) => match result {
                Ok(channel) => {
                    debug!(debate_id = %self.debate_id, "push channel open");
                    Phase::Open(channel)
                }
                Err(err) => {
                    warn!(debate_id = %self.debate_id, %err, "push channel connect failed");
                    self.after_failure()
                }
            },
        }
    }

    async fn open_phase(&mut self, mut channel: C::Channel) -> Phase<C::Channel> {
        tokio::select! {
            _ = self.shutdown.cancelled() => Phase::Connect,
            command = self.commands.recv() => self.on_command(command),
            frame = channel.next_frame() => match frame {
                Some(Ok(text)) => {
                    match StreamEvent::classify(&text) {
                        Some(event) => {
                            // Any classified message proves the link is healthy.
                            self.retries = 0;
                            if self.handler.send(event).is_err() {
                                // Handler gone; nobody is listening anymore.
                                self.shutdown.cancel();
                            }
                        }
                        None => {
                            debug!(debate_id = %self.debate_id, "dropping unclassifiable frame");
                        }
                    }
                    Phase::Open(channel)
                }
                Some(Err(err)) => {
                    warn!(debate_id = %self.debate_id, %err, "push channel failed");
                    self.after_failure()
                }
                None => {
                    warn!(debate_id = %self.debate_id, "push channel closed by server");
                    self.after_failure()
                }
            },
        }
    }

    async fn backoff_phase(&mut self, delay: Duration) -> Phase<C::Channel> {
        tokio::select! {
            _ = self.shutdown.cancelled() => Phase::Connect,
            command = self.commands.recv() => self.on_command(command),
            _ = tokio::time::sleep(delay) => Phase::Connect,
        }
    }

    async fn exhausted_phase(&mut self) -> Phase<C::Channel> {
        tokio::select! {
            _ = self.shutdown.cancelled() => Phase::Exhausted,
            command = self.commands.recv() => self.on_command(command),
        }
    }

    /// A `Reset` of the retry counter plus an immediate connect; a closed
    /// command channel means the handle is gone, so shut down.
    fn on_command(&mut self, command: Option<TransportCommand>) -> Phase<C::Channel> {
        match command {
            Some(TransportCommand::Reconnect) => {
                info!(debate_id = %self.debate_id, "user-initiated reconnect");
                self.retries = 0;
                Phase::Connect
            }
            None => {
                self.shutdown.cancel();
                Phase::Exhausted
            }
        }
    }

    /// Schedule the next reconnect, or give up and report through the event
    /// vocabulary once the budget is spent.
    fn after_failure(&mut self) -> Phase<C::Channel> {
        if self.retries < self.config.max_retries {
            let delay = self.config.retry_delay(self.retries);
            self.retries += 1;
            debug!(
                debate_id = %self.debate_id,
                attempt = self.retries,
                delay_ms = delay.as_millis() as u64,
                "scheduling reconnect"
            );
            Phase::Backoff(delay)
        } else {
            warn!(
                debate_id = %self.debate_id,
                attempts = self.config.max_retries,
                "retry budget exhausted"
            );
            let _ = self.handler.send(StreamEvent::Error {
                message: format!(
                    "connection lost after {} reconnect attempts",
                    self.config.max_retries
                ),
                recoverable: false,
            });
            Phase::Exhausted
        }
    }
}
