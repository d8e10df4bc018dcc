//! Line framing for the NDJSON stream.

/// Reassembles newline-delimited frames from arbitrarily chunked bytes.
///
/// A frame boundary is `\n` (a trailing `\r` is stripped); blank lines are
/// skipped. Bytes after the last newline stay buffered until the next chunk
/// completes them, so multi-byte UTF-8 sequences split across chunks are
/// never decoded early.
#[derive(Default)]
pub(crate) struct FrameBuffer {
    buf: Vec<u8>,
}

impl FrameBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every frame it completed, in order.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..pos]);
            let text = text.trim_end_matches('\r').trim();
            if !text.is_empty() {
                frames.push(text.to_string());
            }
        }
        frames
    }
}
