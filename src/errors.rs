use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Non-standard statuses the web client keys its re-login flow on.
pub const STATUS_TOKEN_EXPIRED: u16 = 419;
pub const STATUS_INVALID_TOKEN: u16 = 420;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    DatabaseError(sqlx::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    TokenExpired(String),
    #[error("{0}")]
    InvalidToken(String),
    #[error("{0}")]
    InternalServerError(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::DatabaseError(_) | ApiError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::TokenExpired(_) => StatusCode::from_u16(STATUS_TOKEN_EXPIRED)
                .unwrap_or(StatusCode::UNAUTHORIZED),
            ApiError::InvalidToken(_) => StatusCode::from_u16(STATUS_INVALID_TOKEN)
                .unwrap_or(StatusCode::UNAUTHORIZED),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let challenge = matches!(self, ApiError::TokenExpired(_) | ApiError::InvalidToken(_));
        let error_message = match self {
            ApiError::DatabaseError(db_err) => {
                error!("Database error: {:?}", db_err);
                "A database error occurred".to_string()
            }
            other => other.to_string(),
        };

        let mut response = (status, Json(ErrorResponse { error: error_message })).into_response();
        if challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::DatabaseError(err),
        }
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        match err {
            crate::auth::TokenError::Expired => ApiError::TokenExpired("Token expired".to_string()),
            crate::auth::TokenError::Invalid => ApiError::InvalidToken("Invalid token".to_string()),
            crate::auth::TokenError::Encoding(e) => {
                error!("Failed to encode token: {}", e);
                ApiError::InternalServerError("Could not issue token".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_database_details_are_hidden() {
        let response = ApiError::DatabaseError(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "A database error occurred" })
        );
    }

    #[tokio::test]
    async fn test_token_errors_carry_challenge() {
        let response = ApiError::TokenExpired("Token expired".to_string()).into_response();
        assert_eq!(response.status().as_u16(), 419);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

        let response = ApiError::InvalidToken("Invalid token".to_string()).into_response();
        assert_eq!(response.status().as_u16(), 420);
        assert_eq!(body_json(response).await, json!({ "error": "Invalid token" }));
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        assert!(matches!(
            ApiError::from(sqlx::Error::RowNotFound),
            ApiError::NotFound(_)
        ));
    }
}
