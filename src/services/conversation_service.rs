use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    db::repositories::{ConversationRepository, MessageRepository},
    dto::{ConversationResponse, MessageOut},
    errors::ApiError,
};

#[derive(Clone)]
pub struct ConversationService {
    conversations: Arc<ConversationRepository>,
    messages: Arc<MessageRepository>,
}

impl ConversationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            conversations: Arc::new(ConversationRepository::new(pool.clone())),
            messages: Arc::new(MessageRepository::new(pool)),
        }
    }

    pub async fn list_conversations(
        &self,
        user_id: i64,
    ) -> Result<Vec<ConversationResponse>, ApiError> {
        let conversations = self.conversations.list_for_user(user_id).await?;
        Ok(conversations.into_iter().map(Into::into).collect())
    }

    pub async fn create_conversation(&self, user_id: i64) -> Result<ConversationResponse, ApiError> {
        Ok(self.conversations.create(user_id).await?.into())
    }

    /// Messages of a conversation the user owns. Foreign ids look like missing ones.
    pub async fn get_messages(&self, id: i64, user_id: i64) -> Result<Vec<MessageOut>, ApiError> {
        self.conversations
            .find_for_user(id, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Conversation not found".to_string()))?;
        let messages = self.messages.list_by_conversation(id).await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }
}
