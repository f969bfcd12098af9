use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::{Conversation, Message, User};
use crate::errors::ApiError;
use crate::providers::ChatMessage;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const TOKEN_TYPE_BEARER: &str = "bearer";

// --- Users ---

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account.
#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// --- Conversations ---

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct ConversationResponse {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id,
            created_at: conversation.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct MessageOut {
    pub id: i64,
    pub conversation_id: i64,
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Message> for MessageOut {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}

// --- Chat & tools ---

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct ChatRequest {
    /// Existing conversation to continue. A new one is created when absent or not owned.
    #[serde(default)]
    pub conversation_id: Option<i64>,
    pub message: String,
    /// Prior turns supplied by the client. Stored history is used when empty.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub web_search: bool,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub result: String,
}

// --- Validation ---

/// Shape check only: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

fn check_email(email: &str) -> Result<(), ApiError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ApiError::ValidationError(
            "Invalid email address".to_string(),
        ))
    }
}

fn check_name(name: &str) -> Result<(), ApiError> {
    let length = name.trim().chars().count();
    if length == 0 || name.chars().count() > MAX_NAME_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "Name must be between 1 and {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::ValidationError(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_email(&self.email)?;
        check_name(&self.name)?;
        check_password(&self.password)
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(password) = &self.password {
            check_password(password)?;
        }
        Ok(())
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ApiError::ValidationError(
                "Password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.message.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "Message must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl SearchRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.query.trim().is_empty() {
            return Err(ApiError::ValidationError(
                "Query must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
