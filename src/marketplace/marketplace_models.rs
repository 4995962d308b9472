use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::conversation::conversation_models::ParticipantRole;

/// Account role carried by the session. Closed set: adding a role forces
/// every `match` over it to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRole {
    Buyer,
    Vendor,
    Admin,
}

impl UserRole {
    /// Conversations admit exactly two sides; an admin session holds neither.
    pub fn as_participant(self) -> Option<ParticipantRole> {
        match self {
            UserRole::Buyer => Some(ParticipantRole::Buyer),
            UserRole::Vendor => Some(ParticipantRole::Vendor),
            UserRole::Admin => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProductSummary {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub title: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub vendor_id: Uuid,
    pub order_number: String,
}
