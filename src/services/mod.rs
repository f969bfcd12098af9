pub mod auth_service;
pub mod chat_service;
pub mod conversation_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use chat_service::{ChatService, ChatSession};
pub use conversation_service::ConversationService;
pub use user_service::UserService;
