use chat_hub_lib::config;
use chat_hub_lib::config::models::{ProviderType, SearchProviderType};
use chat_hub_lib::config::validation::validate_config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_with_environment_variables() {
    let config_content = r#"
general:
  log_level: debug
  port: 8080
database:
  url: "${TEST_CHAT_DATABASE_URL}"
auth:
  jwt_secret: "${TEST_CHAT_JWT_SECRET}"
provider:
  key: deepseek
  type: deepseek
  api_key: "${TEST_CHAT_API_KEY}"
web_search:
  type: duckduckgo
  max_results: 3
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(config_content.as_bytes()).unwrap();
    let path = temp_file.path().to_str().unwrap().to_string();

    temp_env::with_vars(
        [
            ("TEST_CHAT_DATABASE_URL", Some("sqlite://test.db")),
            ("TEST_CHAT_JWT_SECRET", Some("jwt-secret-123")),
            ("TEST_CHAT_API_KEY", Some("sk-test-key-123")),
        ],
        || {
            let config = config::load_config(&path).expect("Failed to load configuration");

            assert_eq!(config.general.log_level, "debug");
            assert_eq!(config.general.port, 8080);
            assert_eq!(config.general.host, "0.0.0.0");
            assert_eq!(config.database.url, "sqlite://test.db");
            assert_eq!(config.auth.jwt_secret, "jwt-secret-123");
            assert_eq!(config.provider.api_key, "sk-test-key-123");
            assert_eq!(config.provider.r#type, ProviderType::DeepSeek);
            assert_eq!(config.provider.base_url(), "https://api.deepseek.com");

            let search = config.web_search.as_ref().expect("web_search missing");
            assert_eq!(search.r#type, SearchProviderType::DuckDuckGo);
            assert_eq!(config.search_max_results(), 3);

            assert!(validate_config(&config).is_ok());
        },
    );
}

#[test]
fn test_config_defaults() {
    let config = config::parse_config(
        r#"
database:
  url: "sqlite::memory:"
auth:
  jwt_secret: "secret"
provider:
  type: openai
  api_key: "sk-test"
  base_url: "http://localhost:9000/v1/"
"#,
    )
    .expect("Failed to parse configuration");

    assert_eq!(config.general.port, 6007);
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(config.auth.access_token_expire_minutes, 43200);
    assert_eq!(config.auth.refresh_token_expire_days, 365);
    assert_eq!(config.provider.key, "default");
    assert_eq!(config.provider.model, "deepseek-chat");
    assert_eq!(config.provider.base_url(), "http://localhost:9000/v1");
    assert!(config.web_search.is_none());
    assert_eq!(config.search_max_results(), 5);
}

#[test]
fn test_unset_variable_fails_validation() {
    let content = r#"
database:
  url: "sqlite::memory:"
auth:
  jwt_secret: "${TEST_CHAT_UNSET_SECRET}"
provider:
  type: deepseek
  api_key: "sk-test"
"#;

    temp_env::with_var_unset("TEST_CHAT_UNSET_SECRET", || {
        let config = config::parse_config(content).expect("Failed to parse configuration");
        assert_eq!(config.auth.jwt_secret, "");

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("jwt_secret")));
    });
}

#[test]
fn test_env_overrides_win_over_file() {
    let mut config = config::parse_config(
        r#"
database:
  url: "sqlite://from-file.db"
auth:
  jwt_secret: "secret"
provider:
  type: deepseek
  api_key: "sk-test"
"#,
    )
    .expect("Failed to parse configuration");

    temp_env::with_vars(
        [
            ("PORT", Some("9999")),
            ("DATABASE_URL", Some("sqlite://from-env.db")),
        ],
        || config::apply_env_overrides(&mut config),
    );

    assert_eq!(config.general.port, 9999);
    assert_eq!(config.database.url, "sqlite://from-env.db");
}

#[test]
fn test_missing_file_and_bad_yaml() {
    assert!(matches!(
        config::load_config("/nonexistent/chat-hub.yaml"),
        Err(config::ConfigError::Io(_))
    ));
    assert!(matches!(
        config::parse_config("provider: [unclosed"),
        Err(config::ConfigError::Parse(_))
    ));
    assert!(matches!(
        config::parse_config("auth:\n  jwt_secret: \"${BROKEN\"\n"),
        Err(config::ConfigError::UnterminatedPlaceholder(_))
    ));
}
