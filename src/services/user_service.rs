use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use crate::{
    auth::password::{hash_password, verify_password},
    db::models::User,
    db::repositories::{UpdateUserData, UserRepository},
    dto::{RegisterRequest, UpdateUserRequest},
    errors::ApiError,
};

const EMAIL_TAKEN: &str = "Email already registered";

fn map_unique_violation(err: sqlx::Error) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ApiError::Conflict(EMAIL_TAKEN.to_string())
        }
        _ => ApiError::from(err),
    }
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<UserRepository>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self {
            repo: Arc::new(UserRepository::new(pool)),
            bcrypt_cost,
        }
    }

    pub async fn create_user(&self, data: RegisterRequest) -> Result<User, ApiError> {
        data.validate()?;
        if self.repo.email_exists(&data.email, None).await? {
            return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let hashed = hash_password(data.password, self.bcrypt_cost).await?;
        let user = self
            .repo
            .create(&data.email, data.name.trim(), &hashed)
            .await
            .map_err(map_unique_violation)?;
        info!("Registered user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// `None` when the email is unknown or the password does not match.
    pub async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, ApiError> {
        let Some(user) = self.repo.find_by_email(email).await? else {
            return Ok(None);
        };
        let matches = verify_password(password.to_string(), user.hashed_password.clone()).await?;
        Ok(matches.then_some(user))
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn update_user(&self, id: i64, data: UpdateUserRequest) -> Result<User, ApiError> {
        data.validate()?;

        if let Some(email) = &data.email {
            if self.repo.email_exists(email, Some(id)).await? {
                return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
            }
        }

        let hashed_password = match data.password {
            Some(password) => Some(hash_password(password, self.bcrypt_cost).await?),
            None => None,
        };
        let update = UpdateUserData {
            email: data.email,
            name: data.name.map(|n| n.trim().to_string()),
            hashed_password,
        };

        if update.is_empty() {
            return self.get_user(id).await;
        }

        self.repo
            .update(id, &update)
            .await
            .map_err(map_unique_violation)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        if !self.repo.delete(id).await? {
            return Err(ApiError::NotFound("User not found".to_string()));
        }
        info!("Deleted user {}", id);
        Ok(())
    }
}
