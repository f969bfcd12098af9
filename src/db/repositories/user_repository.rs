use chrono::Utc;
use sqlx::{Result as SqlxResult, SqlitePool, query, query_as, query_scalar};

use crate::db::models::User;

const USER_COLUMNS: &str = "id, email, name, hashed_password, created_at";

/// Fields that may change on an existing user. `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UpdateUserData {
    pub email: Option<String>,
    pub name: Option<String>,
    pub hashed_password: Option<String>,
}

impl UpdateUserData {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.hashed_password.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, email: &str, name: &str, hashed_password: &str) -> SqlxResult<User> {
        query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, hashed_password, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(name)
        .bind(hashed_password)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: i64) -> SqlxResult<Option<User>> {
        query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> SqlxResult<Option<User>> {
        query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// Whether another account already uses `email`. `excluding` skips one user id.
    pub async fn email_exists(&self, email: &str, excluding: Option<i64>) -> SqlxResult<bool> {
        let count: i64 = query_scalar(
            "SELECT COUNT(*) FROM users WHERE email = ? AND (? IS NULL OR id != ?)",
        )
        .bind(email)
        .bind(excluding)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    pub async fn update(&self, id: i64, data: &UpdateUserData) -> SqlxResult<Option<User>> {
        query_as::<_, User>(&format!(
            "UPDATE users
             SET email = COALESCE(?, email),
                 name = COALESCE(?, name),
                 hashed_password = COALESCE(?, hashed_password)
             WHERE id = ?
             RETURNING {USER_COLUMNS}"
        ))
        .bind(data.email.as_deref())
        .bind(data.name.as_deref())
        .bind(data.hashed_password.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Returns false when no such user existed.
    pub async fn delete(&self, id: i64) -> SqlxResult<bool> {
        let result = query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
