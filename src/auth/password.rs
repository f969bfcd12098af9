use crate::errors::ApiError;

// bcrypt is CPU bound; keep it off the async workers.

pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Password hashing task failed: {e}")))?
        .map_err(|e| ApiError::InternalServerError(format!("Password hashing failed: {e}")))
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: String, hashed: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed).unwrap_or(false))
        .await
        .map_err(|e| ApiError::InternalServerError(format!("Password check task failed: {e}")))
}
