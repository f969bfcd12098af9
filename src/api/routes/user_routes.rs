use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    auth::CurrentUser,
    dto::{
        LoginRequest, LoginResponse, MessageResponse, RefreshTokenRequest, RegisterRequest,
        TokenResponse, UpdateUserRequest, UserResponse,
    },
    errors::{ApiError, ErrorResponse},
    state::AppState,
};

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register_handler))
        .route("/login", post(login_handler))
        .route("/refresh", post(refresh_handler))
        .route("/logout", post(logout_handler))
        .route(
            "/me",
            get(get_me_handler)
                .put(update_me_handler)
                .delete(delete_me_handler),
        )
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid email, name or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    ),
    tag = "Users"
)]
#[axum::debug_handler]
pub async fn register_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = app_state.user_service.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access and refresh tokens", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
    ),
    tag = "Users"
)]
#[axum::debug_handler]
pub async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    Ok(Json(app_state.auth_service.login(payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorResponse),
    ),
    tag = "Users"
)]
#[axum::debug_handler]
pub async fn refresh_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let tokens = app_state
        .auth_service
        .refresh_access_token(&payload.refresh_token)
        .await?;
    Ok(Json(tokens))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
#[axum::debug_handler]
pub async fn get_me_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = app_state.user_service.get_user(current_user.user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
#[axum::debug_handler]
pub async fn update_me_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = app_state
        .user_service
        .update_user(current_user.user_id, payload)
        .await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/me",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
#[axum::debug_handler]
pub async fn delete_me_handler(
    State(app_state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<StatusCode, ApiError> {
    app_state
        .user_service
        .delete_user(current_user.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tokens are stateless; the client discards them.
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "Users"
)]
#[axum::debug_handler(state = Arc<AppState>)]
pub async fn logout_handler(_current_user: CurrentUser) -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out successfully"))
}
