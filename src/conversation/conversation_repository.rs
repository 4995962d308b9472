use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::conversation_models::{
    Conversation, ConversationStatus, NewConversation, ParticipantRole,
};
use crate::error::Result;
use crate::pagination::ConversationCursor;

fn participant_column(side: ParticipantRole) -> &'static str {
    match side {
        ParticipantRole::Buyer => "buyer_id",
        ParticipantRole::Vendor => "vendor_id",
    }
}

fn unread_column(side: ParticipantRole) -> &'static str {
    match side {
        ParticipantRole::Buyer => "unread_buyer",
        ParticipantRole::Vendor => "unread_vendor",
    }
}

/// Owns conversation rows: participants, context snapshots, status,
/// per-side flags and unread counters.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn insert(&self, new: NewConversation) -> Result<Conversation>;

    /// Participant-scoped fetch: the row is only returned when `user_id`
    /// is the given side of that conversation. Absence and non-membership
    /// are indistinguishable to callers.
    async fn find_for_participant(
        &self,
        id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
    ) -> Result<Option<Conversation>>;

    async fn list_for_participant(
        &self,
        user_id: Uuid,
        side: ParticipantRole,
        status: Option<ConversationStatus>,
        cursor: Option<ConversationCursor>,
        limit: i64,
    ) -> Result<Vec<Conversation>>;

    /// Writes only the columns belonging to `side`; the other side's flags
    /// are not reachable through this call.
    async fn update_flags(
        &self,
        id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
        is_pinned: Option<bool>,
        is_muted: Option<bool>,
    ) -> Result<Option<Conversation>>;

    async fn set_status(&self, id: Uuid, status: ConversationStatus) -> Result<()>;

    async fn unread_total(
        &self,
        user_id: Uuid,
        side: ParticipantRole,
        include_archived: bool,
    ) -> Result<i64>;
}

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn insert(&self, new: NewConversation) -> Result<Conversation> {
        let conversation = sqlx::query_as::<_, Conversation>(
            "INSERT INTO conversations
                (buyer_id, vendor_id, context, product_id, order_id,
                 buyer_name, buyer_avatar, vendor_name, vendor_avatar,
                 product_title, product_thumbnail, order_number)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *",
        )
        .bind(new.buyer_id)
        .bind(new.vendor_id)
        .bind(new.context)
        .bind(new.product_id)
        .bind(new.order_id)
        .bind(&new.buyer_name)
        .bind(&new.buyer_avatar)
        .bind(&new.vendor_name)
        .bind(&new.vendor_avatar)
        .bind(&new.product_title)
        .bind(&new.product_thumbnail)
        .bind(&new.order_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(conversation)
    }

    async fn find_for_participant(
        &self,
        id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
    ) -> Result<Option<Conversation>> {
        let sql = format!(
            "SELECT * FROM conversations WHERE id = $1 AND {} = $2",
            participant_column(side)
        );

        let conversation = sqlx::query_as::<_, Conversation>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(conversation)
    }

    async fn list_for_participant(
        &self,
        user_id: Uuid,
        side: ParticipantRole,
        status: Option<ConversationStatus>,
        cursor: Option<ConversationCursor>,
        limit: i64,
    ) -> Result<Vec<Conversation>> {
        let mut sql = format!(
            "SELECT * FROM conversations WHERE {} = $1",
            participant_column(side)
        );
        let mut params: usize = 1;

        if status.is_some() {
            params += 1;
            sql.push_str(&format!(" AND status = ${}", params));
        }
        if cursor.is_some() {
            // Keyset condition on the full sort key: rows inserted while
            // the client pages cannot duplicate or skip results.
            sql.push_str(&format!(
                " AND (last_message_at, id) < (${}, ${})",
                params + 1,
                params + 2
            ));
            params += 2;
        }
        sql.push_str(&format!(
            " ORDER BY last_message_at DESC, id DESC LIMIT ${}",
            params + 1
        ));

        let mut query = sqlx::query_as::<_, Conversation>(&sql).bind(user_id);
        if let Some(status) = status {
            query = query.bind(status);
        }
        if let Some(cursor) = cursor {
            query = query.bind(cursor.last_message_at).bind(cursor.id);
        }
        let conversations = query.bind(limit).fetch_all(&self.pool).await?;

        Ok(conversations)
    }

    async fn update_flags(
        &self,
        id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
        is_pinned: Option<bool>,
        is_muted: Option<bool>,
    ) -> Result<Option<Conversation>> {
        let (pinned_column, muted_column) = match side {
            ParticipantRole::Buyer => ("is_pinned_buyer", "is_muted_buyer"),
            ParticipantRole::Vendor => ("is_pinned_vendor", "is_muted_vendor"),
        };

        let sql = format!(
            "UPDATE conversations
             SET {pinned} = COALESCE($3, {pinned}),
                 {muted} = COALESCE($4, {muted}),
                 updated_at = NOW()
             WHERE id = $1 AND {participant} = $2
             RETURNING *",
            pinned = pinned_column,
            muted = muted_column,
            participant = participant_column(side),
        );

        let conversation = sqlx::query_as::<_, Conversation>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(is_pinned)
            .bind(is_muted)
            .fetch_optional(&self.pool)
            .await?;

        Ok(conversation)
    }

    async fn set_status(&self, id: Uuid, status: ConversationStatus) -> Result<()> {
        sqlx::query("UPDATE conversations SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn unread_total(
        &self,
        user_id: Uuid,
        side: ParticipantRole,
        include_archived: bool,
    ) -> Result<i64> {
        let mut sql = format!(
            "SELECT COALESCE(SUM({}), 0)::BIGINT FROM conversations WHERE {} = $1",
            unread_column(side),
            participant_column(side)
        );
        if !include_archived {
            sql.push_str(" AND status <> 'archived'");
        }

        let total: i64 = sqlx::query_scalar(&sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
