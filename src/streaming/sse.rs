use axum::response::sse::Event;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::merge::StreamEvent;

/// Terminal data payload closing every chat stream.
pub const DONE_MARKER: &str = "[DONE]";

/// JSON body of every non-terminal `data:` line sent to chat clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContentPayload {
    pub content: String,
}

pub fn stream_error_text(description: &str) -> String {
    format!("[Stream Error: {description}]")
}

pub fn content_event(content: &str) -> Event {
    Event::default().data(json!({ "content": content }).to_string())
}

pub fn done_event() -> Event {
    Event::default().data(DONE_MARKER)
}

/// Empty comment sent first so buffering proxies flush the response headers.
pub fn flush_event() -> Event {
    Event::default().comment("")
}

/// Maps a merge-loop event to the SSE events written to the client.
pub fn to_sse_events(event: &StreamEvent) -> Vec<Event> {
    match event {
        StreamEvent::Delta(text) => vec![content_event(text)],
        StreamEvent::Done => vec![done_event()],
        StreamEvent::Failed(description) => {
            vec![content_event(&stream_error_text(description)), done_event()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_error_text() {
        assert_eq!(stream_error_text("boom"), "[Stream Error: boom]");
    }

    #[test]
    fn test_failed_event_is_followed_by_done() {
        let events = to_sse_events(&StreamEvent::Failed("boom".to_string()));
        assert_eq!(events.len(), 2);
        assert_eq!(to_sse_events(&StreamEvent::Done).len(), 1);
        assert_eq!(to_sse_events(&StreamEvent::Delta("x".to_string())).len(), 1);
    }

    #[test]
    fn test_payload_shape() {
        let payload: ContentPayload =
            serde_json::from_value(json!({ "content": "hi" })).unwrap();
        assert_eq!(payload.content, "hi");
    }
}
