mod openai;
pub mod provider;
mod sse_parser;

use std::sync::Arc;

pub use openai::OpenAIProvider;
pub use provider::{ChatMessage, ChatProvider, ChatStream, ProviderError, StreamItem};
pub use sse_parser::{SseEvent, SseLineBuffer};

use crate::config::models::{ProviderConfig, ProviderType};

/// Builds the provider named by `config.type`.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn ChatProvider>, ProviderError> {
    match config.r#type {
        ProviderType::OpenAI | ProviderType::DeepSeek => Ok(Arc::new(OpenAIProvider::new(config)?)),
    }
}
