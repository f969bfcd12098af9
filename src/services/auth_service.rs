use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::{JwtHandler, TokenError, TokenType},
    dto::{LoginRequest, LoginResponse, TOKEN_TYPE_BEARER, TokenResponse, UserInfo},
    errors::ApiError,
    services::user_service::UserService,
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<UserService>,
    jwt: Arc<JwtHandler>,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, jwt: Arc<JwtHandler>) -> Self {
        Self { users, jwt }
    }

    pub async fn login(&self, data: LoginRequest) -> Result<LoginResponse, ApiError> {
        data.validate()?;
        let user = self
            .users
            .authenticate_user(&data.email, &data.password)
            .await?
            .ok_or_else(|| {
                warn!("Failed login for {}", data.email);
                ApiError::Unauthorized("Invalid email or password".to_string())
            })?;

        let access_token = self.jwt.create_access_token(user.id, &user.email)?;
        let refresh_token = self.jwt.create_refresh_token(user.id, &user.email)?;
        info!("User {} logged in", user.id);

        Ok(LoginResponse {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.jwt.access_expires_in(),
            user: UserInfo::from(&user),
        })
    }

    /// Issues a new access token for a valid refresh token whose user still exists.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        let invalid = || ApiError::Unauthorized("Invalid refresh token".to_string());

        let claims = self
            .jwt
            .verify_token(refresh_token, TokenType::Refresh)
            .map_err(|e| match e {
                TokenError::Encoding(_) => ApiError::from(e),
                _ => invalid(),
            })?;

        let user = match self.users.get_user(claims.user_id).await {
            Ok(user) => user,
            Err(ApiError::NotFound(_)) => return Err(invalid()),
            Err(e) => return Err(e),
        };

        Ok(TokenResponse {
            access_token: self.jwt.create_access_token(user.id, &user.email)?,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }
}
