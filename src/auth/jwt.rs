use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::models::AuthConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT payload shared by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
    #[error("failed to encode token: {0}")]
    Encoding(jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtHandler {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
            refresh_ttl: Duration::days(config.refresh_token_expire_days),
        }
    }

    /// Lifetime of an access token in seconds.
    pub fn access_expires_in(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    pub fn create_access_token(&self, user_id: i64, email: &str) -> Result<String, TokenError> {
        self.issue(user_id, email, TokenType::Access, self.access_ttl)
    }

    pub fn create_refresh_token(&self, user_id: i64, email: &str) -> Result<String, TokenError> {
        self.issue(user_id, email, TokenType::Refresh, self.refresh_ttl)
    }

    fn issue(
        &self,
        user_id: i64,
        email: &str,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    pub fn verify_token(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if data.claims.token_type != expected || data.claims.user_id <= 0 {
            return Err(TokenError::Invalid);
        }
        Ok(data.claims)
    }
}
