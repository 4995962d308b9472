use std::sync::Arc;

use crate::{
    auth::SessionRepository, conversation::ConversationService, db::DbPool,
    marketplace::MarketplaceStore, message::MessagingService,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub session_repository: SessionRepository,
    pub marketplace: Arc<dyn MarketplaceStore>,
    pub conversation_service: ConversationService,
    pub messaging_service: MessagingService,
}

#[derive(Clone)]
pub struct Config {
    pub session_cookie_name: String,
    /// Whether unread counters on archived conversations still contribute
    /// to the badge total.
    pub unread_includes_archived: bool,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            session_cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "session_token".to_string()),
            unread_includes_archived: std::env::var("UNREAD_INCLUDES_ARCHIVED")
                .map(|value| value != "false" && value != "0")
                .unwrap_or(true),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| {
                    vec![
                        "http://localhost:3000".to_string(),
                        "http://127.0.0.1:3000".to_string(),
                    ]
                }),
        }
    }
}
