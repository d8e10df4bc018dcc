//! Scripted push-channel fakes shared by transport and store tests.

use crate::ports::push_channel::{ChannelConnector, ChannelError, PushChannel};
use async_trait::async_trait;
use parley_domain::DebateId;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

/// One step of a scripted channel's life.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    /// Deliver this text frame.
    Frame(String),
    /// Stay open forever without delivering anything.
    Hold,
    /// Fail with a connection-level error.
    Lose,
}

/// Outcome of one connect attempt.
#[derive(Debug, Clone)]
pub(crate) enum Connect {
    /// Refuse the connection.
    Refuse,
    /// Open a channel that replays these steps, then closes.
    Channel(Vec<Step>),
}

/// A channel that replays its steps, then reports a server-side close.
pub(crate) struct ScriptedChannel {
    steps: VecDeque<Step>,
}

#[async_trait]
impl PushChannel for ScriptedChannel {
    async fn next_frame(&mut self) -> Option<Result<String, ChannelError>> {
        match self.steps.pop_front() {
            Some(Step::Frame(text)) => Some(Ok(text)),
            Some(Step::Hold) => futures::future::pending().await,
            Some(Step::Lose) => Some(Err(ChannelError::Lost("scripted loss".into()))),
            None => None,
        }
    }
}

/// Scripted connect outcomes, recorded with paused-clock timestamps.
///
/// Each connect attempt consumes one script entry; once the script is
/// exhausted every further attempt is refused.
pub(crate) struct ScriptedConnector {
    script: Mutex<VecDeque<Connect>>,
    connect_times: Mutex<Vec<Instant>>,
}

impl ScriptedConnector {
    /// A connector whose every connect attempt fails.
    pub(crate) fn always_failing() -> Self {
        Self::with_script(vec![])
    }

    /// A connector whose first attempt opens a channel replaying `steps`.
    pub(crate) fn single_channel(steps: Vec<Step>) -> Self {
        Self::with_script(vec![Connect::Channel(steps)])
    }

    pub(crate) fn with_script(script: Vec<Connect>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            connect_times: Mutex::new(Vec::new()),
        }
    }

    /// Instants (paused tokio clock) of every connect attempt so far.
    pub(crate) fn connect_times(&self) -> Vec<Instant> {
        self.connect_times.lock().unwrap().clone()
    }

    pub(crate) fn connect_count(&self) -> usize {
        self.connect_times.lock().unwrap().len()
    }
}

#[async_trait]
impl ChannelConnector for ScriptedConnector {
    type Channel = ScriptedChannel;

    async fn connect(&self, _debate_id: &DebateId) -> Result<ScriptedChannel, ChannelError> {
        self.connect_times.lock().unwrap().push(Instant::now());
        match self.script.lock().unwrap().pop_front() {
            Some(Connect::Channel(steps)) => Ok(ScriptedChannel {
                steps: steps.into(),
            }),
            Some(Connect::Refuse) | None => Err(ChannelError::Connect("scripted refusal".into())),
        }
    }
}

/// A syntactically valid turn frame for stream tests.
pub(crate) fn turn_frame(n: u32) -> String {
    format!(
        r#"{{"type":"turn","data":{{"turnId":"t-{n}","branchId":"b-root","participantId":"a","participantType":"model","content":"argument {n}","tokensUsed":150,"costUsd":0.001,"latencyMs":200,"createdAt":"2026-08-01T12:00:00Z"}}}}"#
    )
}

/// A consensus frame closing the debate.
pub(crate) fn consensus_frame(percentage: f64) -> String {
    format!(
        r#"{{"type":"consensus","data":{{"level":"strong","percentage":{percentage},"supporting":2,"dissenting":0,"confidence":0.8}}}}"#
    )
}
