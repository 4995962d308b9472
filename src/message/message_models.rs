use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::conversation::conversation_models::ParticipantRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "message_type", rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    File,
}

/// Immutable once written, except `is_read`. `seq` is assigned by the
/// store and strictly increases in insert order, so `(created_at, seq)`
/// is a total order even under same-timestamp sends. Sender name/avatar
/// are snapshots taken at send time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub seq: i64,
    pub sender_id: Uuid,
    pub sender_role: ParticipantRole,
    pub sender_name: String,
    pub sender_avatar: Option<String>,
    pub content: String,
    pub message_type: MessageType,
    pub attachment_url: Option<String>,
    pub attachment_name: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub sender_role: ParticipantRole,
    pub sender_name: String,
    pub sender_avatar: Option<String>,
    pub content: String,
    pub message_type: MessageType,
    pub attachment_url: Option<String>,
    pub attachment_name: Option<String>,
}
