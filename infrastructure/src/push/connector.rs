//! The reqwest-backed push channel.

use super::framing::FrameBuffer;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use parley_application::{ChannelConnector, ChannelError, PushChannel};
use parley_domain::DebateId;
use reqwest::Client;
use std::collections::VecDeque;
use std::pin::Pin;
use tracing::debug;

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Opens one NDJSON event stream per debate:
/// `GET {base_url}/debates/{id}/events`.
pub struct HttpStreamConnector {
    client: Client,
    base_url: String,
}

impl HttpStreamConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl ChannelConnector for HttpStreamConnector {
    type Channel = HttpPushChannel;

    async fn connect(&self, debate_id: &DebateId) -> Result<HttpPushChannel, ChannelError> {
        let url = format!("{}/debates/{}/events", self.base_url, debate_id.as_str());
        debug!(%url, "opening event stream");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChannelError::Connect(format!(
                "event stream refused with status {status}"
            )));
        }

        Ok(HttpPushChannel::over(Box::pin(response.bytes_stream())))
    }
}

/// An open event stream, yielding one frame per NDJSON line.
pub struct HttpPushChannel {
    stream: ByteStream,
    buffer: FrameBuffer,
    ready: VecDeque<String>,
}

impl HttpPushChannel {
    fn over(stream: ByteStream) -> Self {
        Self {
            stream,
            buffer: FrameBuffer::new(),
            ready: VecDeque::new(),
        }
    }
}

#[async_trait]
impl PushChannel for HttpPushChannel {
    async fn next_frame(&mut self) -> Option<Result<String, ChannelError>> {
        loop {
            if let Some(frame) = self.ready.pop_front() {
                return Some(Ok(frame));
            }
            match self.stream.next().await {
                Some(Ok(chunk)) => self.ready.extend(self.buffer.push(&chunk)),
                Some(Err(e)) => return Some(Err(ChannelError::Lost(e.to_string()))),
                None => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_over(chunks: Vec<&str>) -> HttpPushChannel {
        let items: Vec<Result<Bytes, reqwest::Error>> = chunks
            .into_iter()
            .map(|c| Ok(Bytes::copy_from_slice(c.as_bytes())))
            .collect();
        HttpPushChannel::over(Box::pin(futures::stream::iter(items)))
    }

    #[tokio::test]
    async fn frames_arrive_in_order_across_chunk_boundaries() {
        let mut channel = channel_over(vec!["{\"a\":1}\n{\"b\"", ":2}\n{\"c\":3}\n"]);

        assert_eq!(channel.next_frame().await, Some(Ok(r#"{"a":1}"#.into())));
        assert_eq!(channel.next_frame().await, Some(Ok(r#"{"b":2}"#.into())));
        assert_eq!(channel.next_frame().await, Some(Ok(r#"{"c":3}"#.into())));
        assert_eq!(channel.next_frame().await, None);
    }

    #[tokio::test]
    async fn a_server_close_surfaces_as_none() {
        let mut channel = channel_over(vec![]);
        assert_eq!(channel.next_frame().await, None);
    }

    #[tokio::test]
    async fn an_unterminated_trailing_line_is_dropped_on_close() {
        let mut channel = channel_over(vec!["{\"a\":1}\n{\"tru"]);
        assert_eq!(channel.next_frame().await, Some(Ok(r#"{"a":1}"#.into())));
        assert_eq!(channel.next_frame().await, None);
    }
}
