use sqlx::FromRow;
use uuid::Uuid;

use crate::marketplace::UserRole;

/// What a valid session token resolves to. Issued elsewhere; this service
/// only ever looks tokens up.
#[derive(Debug, Clone, FromRow)]
pub struct SessionIdentity {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_active: bool,
}
