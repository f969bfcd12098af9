//! Chat orchestration: history assembly, persistence and the merged reply stream.

use std::sync::Arc;

use async_stream::stream;
use futures::{StreamExt, stream::BoxStream};
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use crate::{
    db::repositories::{ConversationRepository, MessageRepository},
    dto::ChatRequest,
    errors::ApiError,
    providers::{
        ChatMessage, ChatProvider, ChatStream,
        provider::{ROLE_ASSISTANT, ROLE_SYSTEM, ROLE_USER},
    },
    search::{WebSearchProvider, run_search_tool},
    streaming::{StreamEvent, merge_stream, sse::stream_error_text},
};

const ALLOWED_HISTORY_ROLES: [&str; 3] = [ROLE_USER, ROLE_ASSISTANT, ROLE_SYSTEM];

/// A started chat reply. `events` ends with exactly one terminal event.
pub struct ChatSession {
    pub conversation_id: i64,
    pub events: BoxStream<'static, StreamEvent>,
}

#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ChatProvider>,
    search: Option<Arc<dyn WebSearchProvider>>,
    search_max_results: usize,
    conversations: Arc<ConversationRepository>,
    messages: Arc<MessageRepository>,
    system_prompt: String,
}

impl ChatService {
    pub fn new(
        pool: SqlitePool,
        provider: Arc<dyn ChatProvider>,
        search: Option<Arc<dyn WebSearchProvider>>,
        search_max_results: usize,
        system_prompt: String,
    ) -> Self {
        Self {
            provider,
            search,
            search_max_results,
            conversations: Arc::new(ConversationRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool)),
            system_prompt,
        }
    }

    /// Client history when supplied, otherwise the stored turns of the conversation.
    async fn history(&self, request: &ChatRequest, conversation_id: i64) -> Vec<ChatMessage> {
        if !request.history.is_empty() {
            return request
                .history
                .iter()
                .filter(|m| ALLOWED_HISTORY_ROLES.contains(&m.role.as_str()))
                .cloned()
                .collect();
        }

        match self.messages.list_by_conversation(conversation_id).await {
            Ok(stored) => stored
                .into_iter()
                .map(|m| ChatMessage::new(m.role, m.content))
                .collect(),
            Err(e) => {
                error!(
                    "Failed to load history for conversation {}, continuing without it: {}",
                    conversation_id, e
                );
                Vec::new()
            }
        }
    }

    pub async fn start_chat(
        &self,
        user_id: i64,
        request: ChatRequest,
    ) -> Result<ChatSession, ApiError> {
        request.validate()?;

        let conversation = self
            .conversations
            .ensure_for_user(request.conversation_id, user_id)
            .await?;
        let conversation_id = conversation.id;

        let mut messages = Vec::new();
        if !self.system_prompt.is_empty() {
            messages.push(ChatMessage::system(self.system_prompt.clone()));
        }
        messages.extend(self.history(&request, conversation_id).await);

        if request.web_search {
            let results = run_search_tool(
                self.search.as_deref(),
                &request.message,
                self.search_max_results,
            )
            .await;
            messages.push(ChatMessage::system(format!(
                "Web search results for \"{}\":\n\n{}",
                request.message, results
            )));
        }
        messages.push(ChatMessage::user(request.message.clone()));

        // Stored after the history read so the new turn is not sent twice.
        if let Err(e) = self
            .messages
            .create(conversation_id, ROLE_USER, &request.message)
            .await
        {
            warn!(
                "Failed to store user message in conversation {}: {}",
                conversation_id, e
            );
        }

        info!(
            "Starting chat in conversation {} with {} messages via {}",
            conversation_id,
            messages.len(),
            self.provider.key()
        );

        let upstream: ChatStream = match self.provider.stream_chat(messages).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Provider {} failed to start: {}", self.provider.key(), e);
                futures::stream::once(async move { Err(e) }).boxed()
            }
        };

        let store = self.messages.clone();
        let mut merged = Box::pin(merge_stream(upstream));
        let events = stream! {
            let mut full_response = String::new();
            while let Some(event) = merged.next().await {
                match &event {
                    StreamEvent::Delta(text) => full_response.push_str(text),
                    StreamEvent::Done => {
                        persist_reply(&store, conversation_id, &full_response).await;
                    }
                    StreamEvent::Failed(description) => {
                        persist_reply(&store, conversation_id, &stream_error_text(description))
                            .await;
                    }
                }
                let terminal = event.is_terminal();
                yield event;
                if terminal {
                    break;
                }
            }
        };

        Ok(ChatSession {
            conversation_id,
            events: events.boxed(),
        })
    }
}

async fn persist_reply(store: &MessageRepository, conversation_id: i64, content: &str) {
    match store.create(conversation_id, ROLE_ASSISTANT, content).await {
        Ok(message) => debug!(
            "Stored assistant reply {} in conversation {}",
            message.id, conversation_id
        ),
        Err(e) => warn!(
            "Failed to store assistant reply in conversation {}: {}",
            conversation_id, e
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::db::repositories::UserRepository;
    use crate::db::test_pool;
    use crate::providers::{ProviderError, StreamItem};

    /// Replays fixed cumulative snapshots and records what it was sent.
    struct ScriptedProvider {
        snapshots: Vec<&'static str>,
        fail_after: bool,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(snapshots: Vec<&'static str>, fail_after: bool) -> Arc<Self> {
            Arc::new(Self {
                snapshots,
                fail_after,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        fn key(&self) -> String {
            "scripted".to_string()
        }

        fn r#type(&self) -> String {
            "scripted".to_string()
        }

        async fn stream_chat(
            &self,
            messages: Vec<ChatMessage>,
        ) -> Result<ChatStream, ProviderError> {
            self.seen.lock().unwrap().push(messages);
            let mut items: Vec<Result<StreamItem, ProviderError>> = self
                .snapshots
                .iter()
                .map(|s| Ok(StreamItem { content: s.to_string() }))
                .collect();
            if self.fail_after {
                items.push(Err(ProviderError::Decode("boom".to_string())));
            }
            Ok(futures::stream::iter(items).boxed())
        }
    }

    async fn setup(provider: Arc<ScriptedProvider>) -> (ChatService, SqlitePool, i64) {
        let pool = test_pool().await;
        let user = UserRepository::new(pool.clone())
            .create("a@example.com", "Ann", "h")
            .await
            .unwrap();
        let service = ChatService::new(pool.clone(), provider, None, 5, "Be brief.".to_string());
        (service, pool, user.id)
    }

    fn request(message: &str, conversation_id: Option<i64>) -> ChatRequest {
        ChatRequest {
            conversation_id,
            message: message.to_string(),
            history: Vec::new(),
            web_search: false,
        }
    }

    #[tokio::test]
    async fn test_reply_is_streamed_and_stored() {
        let provider = ScriptedProvider::new(vec!["Hel", "Hello", "Hello world"], false);
        let (service, pool, user_id) = setup(provider.clone()).await;

        let session = service.start_chat(user_id, request("hi", None)).await.unwrap();
        let events: Vec<StreamEvent> = session.events.collect().await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("Hel".to_string()),
                StreamEvent::Delta("lo".to_string()),
                StreamEvent::Delta(" world".to_string()),
                StreamEvent::Done,
            ]
        );

        let stored = MessageRepository::new(pool)
            .list_by_conversation(session.conversation_id)
            .await
            .unwrap();
        let turns: Vec<(&str, &str)> = stored
            .iter()
            .map(|m| (m.role.as_str(), m.content.as_str()))
            .collect();
        assert_eq!(turns, vec![("user", "hi"), ("assistant", "Hello world")]);

        let sent = provider.seen.lock().unwrap()[0].clone();
        assert_eq!(
            sent,
            vec![ChatMessage::system("Be brief."), ChatMessage::user("hi")]
        );
    }

    #[tokio::test]
    async fn test_stored_history_is_replayed() {
        let provider = ScriptedProvider::new(vec!["ok"], false);
        let (service, _, user_id) = setup(provider.clone()).await;

        let first = service.start_chat(user_id, request("one", None)).await.unwrap();
        let conversation_id = first.conversation_id;
        let _: Vec<_> = first.events.collect().await;

        let second = service
            .start_chat(user_id, request("two", Some(conversation_id)))
            .await
            .unwrap();
        assert_eq!(second.conversation_id, conversation_id);
        let _: Vec<_> = second.events.collect().await;

        let sent = provider.seen.lock().unwrap()[1].clone();
        assert_eq!(
            sent,
            vec![
                ChatMessage::system("Be brief."),
                ChatMessage::user("one"),
                ChatMessage::assistant("ok"),
                ChatMessage::user("two"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_stores_error_text() {
        let provider = ScriptedProvider::new(vec!["partial"], true);
        let (service, pool, user_id) = setup(provider).await;

        let session = service.start_chat(user_id, request("hi", None)).await.unwrap();
        let events: Vec<StreamEvent> = session.events.collect().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], StreamEvent::Failed(d) if d.contains("boom")));

        let stored = MessageRepository::new(pool)
            .list_by_conversation(session.conversation_id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[1].content.starts_with("[Stream Error: "));
    }

    #[tokio::test]
    async fn test_search_without_provider_is_noted() {
        let provider = ScriptedProvider::new(vec!["ok"], false);
        let (service, _, user_id) = setup(provider.clone()).await;

        let mut req = request("weather?", None);
        req.web_search = true;
        let session = service.start_chat(user_id, req).await.unwrap();
        let _: Vec<_> = session.events.collect().await;

        let sent = provider.seen.lock().unwrap()[0].clone();
        assert_eq!(sent.len(), 3);
        assert!(sent[1].content.contains("Web search is not configured"));
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let provider = ScriptedProvider::new(vec![], false);
        let (service, _, user_id) = setup(provider).await;
        assert!(matches!(
            service.start_chat(user_id, request(" ", None)).await,
            Err(ApiError::ValidationError(_))
        ));
    }
}
