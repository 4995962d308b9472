use crate::{
    conversation::{
        conversation_dto::{
            ConversationAction, ConversationEnvelope, ConversationListResponse,
            CreateConversationRequest, SuccessResponse, UpdateConversationRequest,
        },
        conversation_handlers,
        conversation_models::{
            Conversation, ConversationContext, ConversationStatus, ParticipantRole,
        },
    },
    message::{
        message_dto::{MessageEnvelope, MessageListResponse, SendMessageRequest, UnreadCountResponse},
        message_handlers,
        message_models::{Message, MessageType},
    },
    middleware::auth_middleware,
    state::AppState,
};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::conversation::conversation_handlers::create_conversation,
        crate::conversation::conversation_handlers::get_conversations,
        crate::conversation::conversation_handlers::get_conversation,
        crate::conversation::conversation_handlers::update_conversation,
        crate::message::message_handlers::get_messages,
        crate::message::message_handlers::send_message,
        crate::message::message_handlers::mark_conversation_read,
        crate::message::message_handlers::get_unread_count,
    ),
    components(
        schemas(
            CreateConversationRequest,
            UpdateConversationRequest,
            ConversationAction,
            ConversationEnvelope,
            ConversationListResponse,
            SuccessResponse,
            SendMessageRequest,
            MessageEnvelope,
            MessageListResponse,
            UnreadCountResponse,
            Conversation,
            ConversationContext,
            ConversationStatus,
            ParticipantRole,
            Message,
            MessageType,
        )
    ),
    tags(
        (name = "conversations", description = "Buyer/vendor conversation endpoints"),
        (name = "messages", description = "Messaging endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new("session_token"),
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, COOKIE])
        .allow_credentials(true);

    // All messaging routes sit behind the session check
    let conversation_routes = Router::new()
        .route(
            "/",
            get(conversation_handlers::get_conversations)
                .post(conversation_handlers::create_conversation),
        )
        .route(
            "/:id",
            get(conversation_handlers::get_conversation)
                .patch(conversation_handlers::update_conversation),
        )
        .route(
            "/:id/messages",
            get(message_handlers::get_messages).post(message_handlers::send_message),
        )
        .route("/:id/read", post(message_handlers::mark_conversation_read))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let message_routes = Router::new()
        .route("/unread-count", get(message_handlers::get_unread_count))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .nest("/conversations", conversation_routes)
        .nest("/messages", message_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
