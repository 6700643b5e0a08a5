//! Server-Sent Events parsing for the gateway's streaming responses.

use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::io::StreamReader;

use agentkey_common::AiError;

/// A single SSE event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `event:` field, when present.
    pub event: Option<String>,
    /// The joined `data:` lines (JSON for the gateway protocol).
    pub data: String,
}

/// Read SSE framing from any buffered async reader, calling `on_event`
/// per complete event. Unknown fields (`id:`, `retry:`, comments) are
/// skipped per the SSE spec.
pub async fn read_sse(
    mut reader: impl AsyncBufRead + Unpin,
    mut on_event: impl FnMut(SseEvent),
) -> Result<(), AiError> {
    let mut line = String::new();
    let mut current_event: Option<String> = None;
    let mut current_data = String::new();

    loop {
        line.clear();
        let read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;
        if read == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);

        if line.is_empty() {
            // blank line terminates the event
            if !current_data.is_empty() {
                on_event(SseEvent {
                    event: current_event.take(),
                    data: std::mem::take(&mut current_data),
                });
            }
            current_event = None;
            continue;
        }

        if let Some(event_type) = line.strip_prefix("event: ") {
            current_event = Some(event_type.to_string());
        } else if let Some(data) = line.strip_prefix("data: ") {
            if !current_data.is_empty() {
                current_data.push('\n');
            }
            current_data.push_str(data);
        }
    }

    // stream may end without a trailing blank line
    if !current_data.is_empty() {
        on_event(SseEvent {
            event: current_event,
            data: current_data,
        });
    }

    Ok(())
}

/// Parse the SSE body of a streaming HTTP response.
pub async fn parse_response(
    response: reqwest::Response,
    on_event: impl FnMut(SseEvent),
) -> Result<(), AiError> {
    let byte_stream = response
        .bytes_stream()
        .map(|result| result.map_err(std::io::Error::other));
    let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
    read_sse(reader, on_event).await
}
