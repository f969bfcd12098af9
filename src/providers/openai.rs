use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::provider::{ChatMessage, ChatProvider, ChatStream, ProviderError, StreamItem};
use super::sse_parser::{SseEvent, SseLineBuffer};
use crate::config::models::ProviderConfig;

/// Client for OpenAI-compatible `/chat/completions` endpoints (OpenAI, DeepSeek).
pub struct OpenAIProvider {
    config: ProviderConfig,
    http_client: Client,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    #[serde(default)]
    delta: ChoiceDelta,
}

#[derive(Deserialize, Debug, Default)]
struct ChoiceDelta {
    content: Option<String>,
}

impl OpenAIProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            config: config.clone(),
            http_client,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url())
    }
}

/// Text carried by the first choice of a streamed chunk, if any.
fn chunk_content(data: &str) -> Result<Option<String>, ProviderError> {
    let chunk: ChatCompletionChunk =
        serde_json::from_str(data).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    fn key(&self) -> String {
        self.config.key.clone()
    }

    fn r#type(&self) -> String {
        self.config.r#type.to_string()
    }

    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChatStream, ProviderError> {
        let payload = ChatCompletionRequest {
            model: &self.config.model,
            messages: &messages,
            stream: true,
        };

        debug!(
            "Sending {} messages to {} model {}",
            messages.len(),
            self.config.r#type,
            self.config.model
        );

        let response = self
            .http_client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("{} API request error: {}", self.config.r#type, e);
                ProviderError::Request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "{} API request failed with status {}: {}",
                self.config.r#type, status, body
            );
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut body = Box::pin(response.bytes_stream());
        let output = stream! {
            let mut buffer = SseLineBuffer::new();
            let mut accumulated = String::new();
            let mut finished = false;

            while !finished {
                let events = match body.next().await {
                    Some(Ok(bytes)) => buffer.feed(&bytes),
                    Some(Err(e)) => {
                        yield Err(ProviderError::Request(e));
                        return;
                    }
                    None => {
                        finished = true;
                        buffer.flush().into_iter().collect()
                    }
                };

                for event in events {
                    match event {
                        SseEvent::Done => {
                            finished = true;
                            break;
                        }
                        SseEvent::Data(data) => match chunk_content(&data) {
                            Ok(Some(content)) => {
                                accumulated.push_str(&content);
                                yield Ok(StreamItem { content: accumulated.clone() });
                            }
                            Ok(None) => {}
                            Err(e) => {
                                yield Err(e);
                                return;
                            }
                        },
                    }
                }
            }
        };

        Ok(output.boxed())
    }
}
