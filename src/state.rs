use crate::auth::JwtHandler;
use crate::config::models::Config;
use crate::providers::{ChatProvider, create_provider};
use crate::search::{WebSearchProvider, create_search_provider};
use crate::services::{AuthService, ChatService, ConversationService, UserService};
use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtHandler>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub conversation_service: Arc<ConversationService>,
    pub chat_service: Arc<ChatService>,
    pub search: Option<Arc<dyn WebSearchProvider>>,
}

impl AppState {
    /// Builds the chat provider and the optional search backend from `config`.
    pub fn new(config: Config, db_pool: SqlitePool) -> Result<Self> {
        let provider = create_provider(&config.provider)?;
        let search = config
            .web_search
            .as_ref()
            .map(create_search_provider)
            .transpose()?;
        Ok(Self::with_providers(config, db_pool, provider, search))
    }

    pub fn with_providers(
        config: Config,
        db_pool: SqlitePool,
        provider: Arc<dyn ChatProvider>,
        search: Option<Arc<dyn WebSearchProvider>>,
    ) -> Self {
        let jwt = Arc::new(JwtHandler::new(&config.auth));
        let user_service = Arc::new(UserService::new(db_pool.clone(), config.auth.bcrypt_cost));
        let auth_service = Arc::new(AuthService::new(user_service.clone(), jwt.clone()));
        let conversation_service = Arc::new(ConversationService::new(db_pool.clone()));
        let chat_service = Arc::new(ChatService::new(
            db_pool,
            provider,
            search.clone(),
            config.search_max_results(),
            config.provider.system_prompt.clone(),
        ));

        Self {
            config: Arc::new(config),
            jwt,
            user_service,
            auth_service,
            conversation_service,
            chat_service,
            search,
        }
    }

    pub fn search_max_results(&self) -> usize {
        self.config.search_max_results()
    }
}
