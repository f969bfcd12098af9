use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::routes::{
    chat_routes::__path_chat_handler,
    conversation_routes::{
        __path_create_conversation_handler, __path_get_conversation_handler,
        __path_list_conversations_handler,
    },
    tool_routes::__path_search_handler,
    user_routes::{
        __path_delete_me_handler, __path_get_me_handler, __path_login_handler,
        __path_logout_handler, __path_refresh_handler, __path_register_handler,
        __path_update_me_handler,
    },
};
use crate::dto::{
    ChatRequest, ConversationResponse, LoginRequest, LoginResponse, MessageOut, MessageResponse,
    RefreshTokenRequest, RegisterRequest, SearchRequest, SearchResponse, TokenResponse,
    UpdateUserRequest, UserInfo, UserResponse,
};
use crate::errors::ErrorResponse;
use crate::providers::ChatMessage;
use crate::routes::{__path_health_handler, __path_root_handler, __path_test_handler};
use crate::streaming::sse::ContentPayload;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root_handler,
        health_handler,
        test_handler,
        register_handler,
        login_handler,
        refresh_handler,
        get_me_handler,
        update_me_handler,
        delete_me_handler,
        logout_handler,
        list_conversations_handler,
        create_conversation_handler,
        get_conversation_handler,
        chat_handler,
        search_handler,
    ),
    components(
        schemas(
            ErrorResponse,
            RegisterRequest,
            UpdateUserRequest,
            UserResponse,
            UserInfo,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            TokenResponse,
            MessageResponse,
            ConversationResponse,
            MessageOut,
            ChatMessage,
            ChatRequest,
            ContentPayload,
            SearchRequest,
            SearchResponse,
        )
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "Registration, login and account endpoints"),
        (name = "Conversations", description = "Conversation history endpoints"),
        (name = "Chat", description = "Streaming chat endpoint"),
        (name = "Tools", description = "Tool endpoints such as web search"),
    ),
    info(
        title = "Chat Hub API",
        version = "1.0.0",
        description = "Chat backend with streaming replies, JWT authentication and persistent conversations",
        license(
            name = "Apache 2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
