use chrono::Utc;
use sqlx::{Result as SqlxResult, SqlitePool, query_as};

use crate::db::models::Message;

#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        conversation_id: i64,
        role: &str,
        content: &str,
    ) -> SqlxResult<Message> {
        query_as::<_, Message>(
            "INSERT INTO messages (conversation_id, role, content, timestamp)
             VALUES (?, ?, ?, ?)
             RETURNING id, conversation_id, role, content, timestamp",
        )
        .bind(conversation_id)
        .bind(role)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_by_conversation(&self, conversation_id: i64) -> SqlxResult<Vec<Message>> {
        query_as::<_, Message>(
            "SELECT id, conversation_id, role, content, timestamp FROM messages
             WHERE conversation_id = ?
             ORDER BY timestamp, id",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
    }
}
