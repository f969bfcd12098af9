use crate::api::routes::{
    chat_routes::chat_routes, conversation_routes::conversation_routes, tool_routes::tool_routes,
    user_routes::user_routes,
};
use crate::dto::MessageResponse;
use crate::openapi::get_openapi_spec;
use crate::state::AppState;
use axum::http::header::AUTHORIZATION;
use axum::{Json, Router, routing::get};
use std::iter::once;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::SwaggerUi;

pub fn create_router(state: Arc<AppState>) -> Router {
    let v1_routes = Router::new()
        .nest("/users", user_routes())
        .nest("/conversations", conversation_routes())
        .nest("/chat", chat_routes())
        .nest("/tools", tool_routes())
        .route("/test", get(test_handler));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", get_openapi_spec()))
        .layer(
            ServiceBuilder::new()
                .layer(SetSensitiveRequestHeadersLayer::new(once(AUTHORIZATION)))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = MessageResponse)),
    tag = "Health"
)]
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Chat backend is running"))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy", body = String)),
    tag = "Health"
)]
pub async fn health_handler() -> &'static str {
    "Working!"
}

#[utoipa::path(
    get,
    path = "/api/v1/test",
    responses((status = 200, description = "Connectivity check", body = MessageResponse)),
    tag = "Health"
)]
pub async fn test_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}
