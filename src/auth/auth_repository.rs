use sqlx::PgPool;

use super::auth_models::SessionIdentity;
use crate::error::Result;

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolves an opaque session token to the account behind it.
    /// Expired sessions resolve to nothing; the token itself is never
    /// parsed or interpreted.
    pub async fn find_valid(&self, token: &str) -> Result<Option<SessionIdentity>> {
        let identity = sqlx::query_as::<_, SessionIdentity>(
            "SELECT u.id AS user_id, u.role, u.is_active
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = $1 AND s.expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(identity)
    }
}
