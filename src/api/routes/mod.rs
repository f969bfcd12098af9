pub mod chat_routes;
pub mod conversation_routes;
pub mod tool_routes;
pub mod user_routes;
