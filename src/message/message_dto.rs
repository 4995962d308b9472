use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::message_models::{Message, MessageType};

/// Content bounds are enforced by the service after the participant and
/// status checks, so a non-participant probing with bad content still
/// sees "not found" rather than a validation error.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    pub content: String,
    pub message_type: Option<MessageType>,
    #[validate(url)]
    pub attachment_url: Option<String>,
    #[validate(length(max = 255))]
    pub attachment_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageEnvelope {
    pub message: Message,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}
