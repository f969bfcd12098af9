use async_stream::stream;
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::fmt::{Debug, Display};
use tracing::{debug, warn};

use super::delta::compute_delta;
use super::extract::extract_text;

/// Output of one response-generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Text not delivered to the client before.
    Delta(String),
    /// Upstream finished normally.
    Done,
    /// Upstream failed; carries the error description.
    Failed(String),
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Delta(_))
    }
}

/// Per-request bookkeeping of what was received and what was sent.
#[derive(Debug, Default, Clone)]
pub struct StreamState {
    last_sent_text: String,
    last_full_text: String,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_sent_text(&self) -> &str {
        &self.last_sent_text
    }

    pub fn last_full_text(&self) -> &str {
        &self.last_full_text
    }

    /// Merges freshly extracted text and returns the delta to emit, if any.
    pub fn advance(&mut self, extracted: &str) -> Option<String> {
        let current_full = if extracted.starts_with(self.last_full_text.as_str()) {
            extracted.to_string()
        } else {
            let mut merged = String::with_capacity(self.last_full_text.len() + extracted.len());
            merged.push_str(&self.last_full_text);
            merged.push_str(extracted);
            merged
        };

        let delta = compute_delta(&self.last_sent_text, &current_full);
        self.last_full_text = current_full;

        if delta.is_empty() {
            None
        } else {
            self.last_sent_text.push_str(&delta);
            Some(delta)
        }
    }
}

/// Drives `upstream` to completion, yielding only unsent text.
///
/// The returned stream ends right after its single terminal event
/// (`Done` or `Failed`). Dropping it drops `upstream` too.
pub fn merge_stream<S, T, E>(upstream: S) -> impl Stream<Item = StreamEvent> + Send
where
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Serialize + Debug + Send,
    E: Display + Send,
{
    stream! {
        let mut state = StreamState::new();
        let mut upstream = Box::pin(upstream);

        while let Some(item) = upstream.next().await {
            match item {
                Ok(item) => {
                    let text = extract_text(&item);
                    if let Some(delta) = state.advance(&text) {
                        yield StreamEvent::Delta(delta);
                    }
                }
                Err(e) => {
                    warn!("Upstream stream failed after {} bytes: {}", state.last_sent_text().len(), e);
                    yield StreamEvent::Failed(e.to_string());
                    return;
                }
            }
        }

        debug!("Upstream stream finished, {} bytes sent", state.last_sent_text().len());
        yield StreamEvent::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use serde_json::json;

    async fn collect<T: Serialize + Debug + Send + 'static>(
        items: Vec<Result<T, String>>,
    ) -> Vec<StreamEvent> {
        merge_stream(stream::iter(items)).collect().await
    }

    fn deltas(values: &[&str]) -> Vec<StreamEvent> {
        values
            .iter()
            .map(|v| StreamEvent::Delta(v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_cumulative_snapshots() {
        let events = collect(vec![Ok("Hel"), Ok("Hello"), Ok("Hello world")]).await;
        let mut expected = deltas(&["Hel", "lo", " world"]);
        expected.push(StreamEvent::Done);
        assert_eq!(events, expected);
    }

    #[tokio::test]
    async fn test_incremental_chunks_are_appended() {
        let events = collect(vec![Ok("Hel"), Ok("lo"), Ok(" world")]).await;
        let mut expected = deltas(&["Hel", "lo", " world"]);
        expected.push(StreamEvent::Done);
        assert_eq!(events, expected);
    }

    #[tokio::test]
    async fn test_repeated_snapshot_emits_nothing() {
        let events = collect(vec![Ok("Hello"), Ok("Hello"), Ok("Hello!")]).await;
        let mut expected = deltas(&["Hello", "!"]);
        expected.push(StreamEvent::Done);
        assert_eq!(events, expected);
    }

    #[tokio::test]
    async fn test_mapping_items() {
        let events = collect(vec![
            Ok(json!({"content": "Hi"})),
            Ok(json!({"content": "Hi there"})),
        ])
        .await;
        let mut expected = deltas(&["Hi", " there"]);
        expected.push(StreamEvent::Done);
        assert_eq!(events, expected);
    }

    #[tokio::test]
    async fn test_empty_stream_is_done() {
        let events = collect::<&str>(vec![]).await;
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[tokio::test]
    async fn test_failure_is_terminal() {
        let events = collect(vec![
            Ok("partial"),
            Err("connection reset".to_string()),
            Ok("never seen"),
        ])
        .await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("partial".to_string()),
                StreamEvent::Failed("connection reset".to_string()),
            ]
        );
        assert!(events.last().unwrap().is_terminal());
    }

    #[test]
    fn test_state_tracks_sent_and_full_text() {
        let mut state = StreamState::new();
        assert_eq!(state.advance("ab"), Some("ab".to_string()));
        assert_eq!(state.advance("abc"), Some("c".to_string()));
        assert_eq!(state.advance(""), None);
        assert_eq!(state.last_sent_text(), "abc");
        assert_eq!(state.last_full_text(), "abc");
    }
}
