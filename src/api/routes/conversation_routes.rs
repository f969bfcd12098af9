use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    auth::CurrentUser,
    dto::{ConversationResponse, MessageOut},
    errors::{ApiError, ErrorResponse},
    state::AppState,
};

pub fn conversation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(list_conversations_handler).post(create_conversation_handler),
        )
        .route("/{id}", get(get_conversation_handler))
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations",
    responses(
        (status = 200, description = "Conversations of the caller", body = Vec<ConversationResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Conversations"
)]
#[axum::debug_handler]
pub async fn list_conversations_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let conversations = app_state
        .conversation_service
        .list_conversations(current_user.user_id)
        .await?;
    Ok(Json(conversations))
}

#[utoipa::path(
    post,
    path = "/api/v1/conversations",
    responses(
        (status = 201, description = "Conversation created", body = ConversationResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Conversations"
)]
#[axum::debug_handler]
pub async fn create_conversation_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let conversation = app_state
        .conversation_service
        .create_conversation(current_user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

#[utoipa::path(
    get,
    path = "/api/v1/conversations/{id}",
    params(
        ("id" = i64, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Messages in chronological order", body = Vec<MessageOut>),
        (status = 404, description = "Conversation not found", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Conversations"
)]
#[axum::debug_handler]
pub async fn get_conversation_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<MessageOut>>, ApiError> {
    let messages = app_state
        .conversation_service
        .get_messages(id, current_user.user_id)
        .await?;
    Ok(Json(messages))
}
