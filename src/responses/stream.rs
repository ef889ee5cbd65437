//! Server-sent event handling for streamed responses.
//!
//! The service frames streamed turns as SSE: `data:` lines carrying JSON
//! payloads, blank-line separated, each payload self-describing via a
//! `type` field. [`EventStream`] surfaces them as a finite, lazily consumed
//! sequence. Dropping the stream aborts the transfer; a stream cannot be
//! restarted.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use serde::Deserialize;

use crate::core::error::LlmError;
use crate::responses::response::{OutputItem, Response};

/// Incremental SSE frame decoder.
///
/// Bytes arrive in arbitrary chunk boundaries; this accumulates them and
/// emits one payload string per completed event.
#[derive(Debug, Default)]
pub(crate) struct SseParser {
    buffer: String,
    data_lines: Vec<String>,
}

impl SseParser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every event payload it completed.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut payloads = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                // Blank line closes the current event.
                if !self.data_lines.is_empty() {
                    payloads.push(self.data_lines.join("\n"));
                    self.data_lines.clear();
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data_lines
                    .push(data.strip_prefix(' ').unwrap_or(data).to_string());
            }
            // `event:`/`id:`/`retry:` fields and `:` comments carry nothing
            // the payload's own `type` discriminator does not.
        }
        payloads
    }
}

/// One event from a streamed response.
///
/// Kinds this crate does not consume decode as [`StreamEvent::Other`] so
/// new server-side event types never break the stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "response.created")]
    Created { response: Response },

    #[serde(rename = "response.in_progress")]
    InProgress { response: Response },

    #[serde(rename = "response.output_item.added")]
    OutputItemAdded {
        #[serde(default)]
        output_index: usize,
        item: OutputItem,
    },

    /// An incremental text fragment. The only event kind the text filter
    /// keeps.
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta {
        #[serde(default)]
        item_id: Option<String>,
        delta: String,
    },

    /// Full text of one output item, sent once its deltas are finished.
    #[serde(rename = "response.output_text.done")]
    OutputTextDone {
        #[serde(default)]
        item_id: Option<String>,
        text: String,
    },

    #[serde(rename = "response.output_item.done")]
    OutputItemDone {
        #[serde(default)]
        output_index: usize,
        item: OutputItem,
    },

    /// Terminal event carrying the final response snapshot.
    #[serde(rename = "response.completed")]
    Completed { response: Response },

    #[serde(rename = "response.failed")]
    Failed { response: Response },

    #[serde(other)]
    Other,
}

impl StreamEvent {
    /// The fragment carried by a text-delta event.
    pub fn as_text_delta(&self) -> Option<&str> {
        match self {
            StreamEvent::OutputTextDelta { delta, .. } => Some(delta),
            _ => None,
        }
    }

    /// The final response snapshot, present on the terminal event.
    pub fn as_completed(&self) -> Option<&Response> {
        match self {
            StreamEvent::Completed { response } => Some(response),
            _ => None,
        }
    }
}

/// Lazily decoded stream of [`StreamEvent`]s for one turn.
pub struct EventStream {
    inner: Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>,
}

impl EventStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        let inner = try_stream! {
            let mut parser = SseParser::new();
            let mut bytes = response.bytes_stream();

            'transfer: while let Some(chunk) = bytes.next().await {
                let chunk = chunk.map_err(|e| LlmError::Network {
                    message: "Event stream interrupted".to_string(),
                    source: Some(Box::new(e)),
                })?;

                for payload in parser.feed(&chunk) {
                    // Legacy terminator some gateways still send.
                    if payload == "[DONE]" {
                        break 'transfer;
                    }
                    let event: StreamEvent =
                        serde_json::from_str(&payload).map_err(|e| LlmError::Parse {
                            message: "Failed to parse stream event".to_string(),
                            source: Some(Box::new(e)),
                        })?;
                    yield event;
                }
            }
        };

        Self {
            inner: Box::pin(inner),
        }
    }

    /// Narrow the stream to text fragments, in arrival order.
    ///
    /// Every other event kind is dropped. Errors pass through.
    pub fn text_fragments(self) -> impl Stream<Item = Result<String, LlmError>> + Send {
        self.inner.filter_map(|event| async move {
            match event {
                Ok(StreamEvent::OutputTextDelta { delta, .. }) => Some(Ok(delta)),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            }
        })
    }
}

impl Stream for EventStream {
    type Item = Result<StreamEvent, LlmError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_handles_arbitrary_chunk_boundaries() {
        let mut parser = SseParser::new();

        assert!(parser.feed(b"data: {\"type\":\"respon").is_empty());
        assert!(parser.feed(b"se.output_text.delta\",\"delta\":\"Hi\"}\n").is_empty());
        let payloads = parser.feed(b"\n");
        assert_eq!(
            payloads,
            vec![r#"{"type":"response.output_text.delta","delta":"Hi"}"#]
        );
    }

    #[test]
    fn feed_handles_crlf_and_comments() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b": keep-alive\r\ndata: {\"a\":1}\r\n\r\n");
        assert_eq!(payloads, vec![r#"{"a":1}"#]);
    }

    #[test]
    fn feed_ignores_event_field_lines() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b"event: response.completed\ndata: {\"done\":true}\n\n");
        assert_eq!(payloads, vec![r#"{"done":true}"#]);
    }

    #[test]
    fn feed_joins_multi_line_data() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b"data: line one\ndata: line two\n\n");
        assert_eq!(payloads, vec!["line one\nline two"]);
    }

    #[test]
    fn feed_emits_multiple_events_per_chunk() {
        let mut parser = SseParser::new();
        let payloads = parser.feed(b"data: {\"n\":1}\n\ndata: {\"n\":2}\n\ndata: [DONE]\n\n");
        assert_eq!(payloads, vec![r#"{"n":1}"#, r#"{"n":2}"#, "[DONE]"]);
    }

    #[test]
    fn deserializes_known_events() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"type":"response.output_text.delta","item_id":"msg_1","delta":"Hello"}"#,
        )
        .unwrap();
        assert_eq!(event.as_text_delta(), Some("Hello"));

        let event: StreamEvent = serde_json::from_str(
            r#"{"type":"response.completed","response":{"id":"resp_1"}}"#,
        )
        .unwrap();
        assert_eq!(event.as_completed().map(|r| r.id.as_str()), Some("resp_1"));
    }

    #[test]
    fn unknown_event_kinds_decode_as_other() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"type":"response.reasoning_summary.delta","delta":"..."}"#,
        )
        .unwrap();
        assert!(matches!(event, StreamEvent::Other));
        assert_eq!(event.as_text_delta(), None);
    }
}
