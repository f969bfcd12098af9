use std::{convert::Infallible, sync::Arc, time::Duration};

use async_stream::stream;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue, header},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::post,
};
use futures::StreamExt;
use tracing::debug;

use crate::{
    auth::CurrentUser,
    config::constants::sse_keep_alive_secs,
    dto::ChatRequest,
    errors::{ApiError, ErrorResponse},
    state::AppState,
    streaming::sse::{flush_event, to_sse_events},
};

pub const CONVERSATION_ID_HEADER: &str = "x-conversation-id";

pub fn chat_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(chat_handler))
}

/// Streams the assistant reply as Server-Sent Events.
///
/// Each `data:` line carries `{"content": "<delta>"}`. A failure is reported
/// as `{"content": "[Stream Error: ...]"}`. The stream always ends with
/// `data: [DONE]`.
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "SSE stream of content deltas", content_type = "text/event-stream", body = crate::streaming::sse::ContentPayload),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Chat"
)]
#[axum::debug_handler]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let session = app_state
        .chat_service
        .start_chat(current_user.user_id, payload)
        .await?;
    let conversation_id = session.conversation_id;
    let mut events = session.events;

    let body = stream! {
        yield Ok::<Event, Infallible>(flush_event());
        while let Some(event) = events.next().await {
            for sse_event in to_sse_events(&event) {
                yield Ok(sse_event);
            }
        }
        debug!("Chat stream for conversation {} finished", conversation_id);
    };

    let sse = Sse::new(body).keep_alive(
        KeepAlive::new().interval(Duration::from_secs(sse_keep_alive_secs())),
    );
    let mut response = sse.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-transform"),
    );
    headers.insert(
        HeaderName::from_static("x-accel-buffering"),
        HeaderValue::from_static("no"),
    );
    headers.insert(
        HeaderName::from_static(CONVERSATION_ID_HEADER),
        HeaderValue::from(conversation_id),
    );
    Ok(response)
}
