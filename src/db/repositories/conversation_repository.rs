use chrono::Utc;
use sqlx::{Result as SqlxResult, SqlitePool, query_as};
use tracing::debug;

use crate::db::models::Conversation;

#[derive(Debug, Clone)]
pub struct ConversationRepository {
    pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: i64) -> SqlxResult<Conversation> {
        query_as::<_, Conversation>(
            "INSERT INTO conversations (user_id, created_at) VALUES (?, ?)
             RETURNING id, user_id, created_at",
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a conversation only if `user_id` owns it.
    pub async fn find_for_user(&self, id: i64, user_id: i64) -> SqlxResult<Option<Conversation>> {
        query_as::<_, Conversation>(
            "SELECT id, user_id, created_at FROM conversations WHERE id = ? AND user_id = ?",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Newest first.
    pub async fn list_for_user(&self, user_id: i64) -> SqlxResult<Vec<Conversation>> {
        query_as::<_, Conversation>(
            "SELECT id, user_id, created_at FROM conversations
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Returns the requested conversation when the user owns it, otherwise a new one.
    pub async fn ensure_for_user(&self, id: Option<i64>, user_id: i64) -> SqlxResult<Conversation> {
        if let Some(id) = id {
            if let Some(existing) = self.find_for_user(id, user_id).await? {
                return Ok(existing);
            }
            debug!(
                "Conversation {} not found for user {}, starting a new one",
                id, user_id
            );
        }
        self.create(user_id).await
    }
}
