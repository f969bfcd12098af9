use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Represents a user account record in the database.
#[derive(Debug, FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A stored chat turn. `role` is one of `user`, `assistant` or `system`.
#[derive(Debug, FromRow, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
