use serde::{Deserialize, Serialize};

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    6007
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_token_expire_minutes() -> i64 {
    43_200
}

fn default_refresh_token_expire_days() -> i64 {
    365
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_provider_key() -> String {
    "default".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant. Answer directly when possible.".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_results() -> usize {
    5
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub provider: ProviderConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search: Option<WebSearchConfig>,
}

impl Config {
    /// Result cap for search calls that do not name their own.
    pub fn search_max_results(&self) -> usize {
        self.web_search
            .as_ref()
            .map(|s| s.max_results)
            .unwrap_or_else(default_max_results)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_refresh_token_expire_days")]
    pub refresh_token_expire_days: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

/// Kind of chat-completion backend. Both speak the OpenAI wire format.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
}

impl ProviderType {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "https://api.openai.com/v1",
            ProviderType::DeepSeek => "https://api.deepseek.com",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::OpenAI => write!(f, "openai"),
            ProviderType::DeepSeek => write!(f, "deepseek"),
        }
    }
}

impl std::str::FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderType::OpenAI),
            "deepseek" => Ok(ProviderType::DeepSeek),
            _ => Err(format!("Unknown provider type: {s}")),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_key")]
    pub key: String,
    pub r#type: ProviderType,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ProviderConfig {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.r#type.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderType {
    DuckDuckGo,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebSearchConfig {
    pub r#type: SearchProviderType,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}
