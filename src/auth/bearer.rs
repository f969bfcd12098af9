use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use super::jwt::TokenType;
use crate::errors::ApiError;
use crate::state::AppState;

/// Identity carried by a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: i64,
    pub email: String,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let token = match header_value.split_once(' ') {
            Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
            _ => {
                return Err(ApiError::InvalidToken(
                    "Invalid authentication scheme".to_string(),
                ));
            }
        };

        let claims = state
            .jwt
            .verify_token(token, TokenType::Access)
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                ApiError::from(e)
            })?;

        Ok(CurrentUser {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}
