use super::models::Config;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Validates the logical consistency of a Config.
/// Returns Ok(()) if valid, or Err(Vec<String>) with a list of error messages if invalid.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.database.url.trim().is_empty() {
        errors.push("Database url must not be empty.".to_string());
    }
    if config.database.max_connections == 0 {
        errors.push("Database max_connections must be at least 1.".to_string());
    }

    if config.auth.jwt_secret.trim().is_empty() {
        errors.push("Auth jwt_secret must not be empty.".to_string());
    }
    if config.auth.access_token_expire_minutes <= 0 {
        errors.push("Auth access_token_expire_minutes must be positive.".to_string());
    }
    if config.auth.refresh_token_expire_days <= 0 {
        errors.push("Auth refresh_token_expire_days must be positive.".to_string());
    }
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&config.auth.bcrypt_cost) {
        errors.push(format!(
            "Auth bcrypt_cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}, got {}.",
            config.auth.bcrypt_cost
        ));
    }

    if config.provider.api_key.trim().is_empty() {
        errors.push(format!(
            "Provider '{}' has an empty api_key.",
            config.provider.key
        ));
    }
    if config.provider.model.trim().is_empty() {
        errors.push(format!(
            "Provider '{}' has an empty model.",
            config.provider.key
        ));
    }
    if let Err(e) = reqwest::Url::parse(&config.provider.base_url()) {
        errors.push(format!(
            "Provider '{}' has an invalid base_url '{}': {}.",
            config.provider.key,
            config.provider.base_url(),
            e
        ));
    }

    if let Some(search) = &config.web_search {
        if search.max_results == 0 {
            errors.push("Web search max_results must be at least 1.".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
