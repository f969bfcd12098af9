use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const ROLE_SYSTEM: &str = "system";
pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

/// One turn of a conversation as sent to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ROLE_SYSTEM, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }
}

/// Cumulative model output so far.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StreamItem {
    pub content: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed stream chunk: {0}")]
    Decode(String),
}

pub type ChatStream = BoxStream<'static, Result<StreamItem, ProviderError>>;

#[async_trait]
pub trait ChatProvider: Send + Sync {
    fn key(&self) -> String;
    fn r#type(&self) -> String;

    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChatStream, ProviderError>;
}
