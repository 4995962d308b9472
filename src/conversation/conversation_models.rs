use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// The two sides of a conversation. Every flag update and unread counter
/// is keyed by this type, so a buyer request physically cannot touch the
/// vendor columns and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "participant_role", rename_all = "lowercase")]
pub enum ParticipantRole {
    Buyer,
    Vendor,
}

impl ParticipantRole {
    /// The recipient side for anything this side sends.
    pub fn other(self) -> Self {
        match self {
            ParticipantRole::Buyer => ParticipantRole::Vendor,
            ParticipantRole::Vendor => ParticipantRole::Buyer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "conversation_context", rename_all = "snake_case")]
pub enum ConversationContext {
    ProductInquiry,
    OrderSupport,
    General,
    Dispute,
}

/// `Closed` is terminal: no new messages, no way back through this service.
/// `Flagged` and `Closed` are only ever set by moderation tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "conversation_status", rename_all = "lowercase")]
pub enum ConversationStatus {
    Active,
    Archived,
    Flagged,
    Closed,
}

/// A buyer/vendor thread. The `*_name`, `*_avatar`, `product_*` and
/// `order_number` columns are snapshots taken at creation time: they stay
/// as they were even if the source entity is later renamed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Conversation {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub vendor_id: Uuid,
    pub context: ConversationContext,
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub buyer_name: String,
    pub buyer_avatar: Option<String>,
    pub vendor_name: String,
    pub vendor_avatar: Option<String>,
    pub product_title: Option<String>,
    pub product_thumbnail: Option<String>,
    pub order_number: Option<String>,
    pub status: ConversationStatus,
    pub is_pinned_buyer: bool,
    pub is_pinned_vendor: bool,
    pub is_muted_buyer: bool,
    pub is_muted_vendor: bool,
    pub unread_buyer: i32,
    pub unread_vendor: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl Conversation {
    pub fn participant_id(&self, side: ParticipantRole) -> Uuid {
        match side {
            ParticipantRole::Buyer => self.buyer_id,
            ParticipantRole::Vendor => self.vendor_id,
        }
    }

    pub fn unread_for(&self, side: ParticipantRole) -> i32 {
        match side {
            ParticipantRole::Buyer => self.unread_buyer,
            ParticipantRole::Vendor => self.unread_vendor,
        }
    }
}

/// Field group handed to the store on creation; snapshots already resolved.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub buyer_id: Uuid,
    pub vendor_id: Uuid,
    pub context: ConversationContext,
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub buyer_name: String,
    pub buyer_avatar: Option<String>,
    pub vendor_name: String,
    pub vendor_avatar: Option<String>,
    pub product_title: Option<String>,
    pub product_thumbnail: Option<String>,
    pub order_number: Option<String>,
}
