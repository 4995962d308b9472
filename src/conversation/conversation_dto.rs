use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::conversation_models::{Conversation, ConversationContext, ConversationStatus};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateConversationRequest {
    pub vendor_id: Uuid,
    pub context: Option<ConversationContext>,
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConversationAction {
    Archive,
}

/// Flag updates apply to the caller's own side only; `action=archive`
/// retires the thread for both sides.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateConversationRequest {
    pub is_pinned: Option<bool>,
    pub is_muted: Option<bool>,
    pub action: Option<ConversationAction>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub status: Option<ConversationStatus>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationEnvelope {
    pub conversation: Conversation,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConversationListResponse {
    pub conversations: Vec<Conversation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub unread_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
