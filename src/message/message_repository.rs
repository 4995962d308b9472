use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::message_models::{Message, NewMessage};
use crate::conversation::conversation_models::ParticipantRole;
use crate::error::Result;
use crate::pagination::MessageCursor;

/// Owns the ordered message log of each conversation. The append and the
/// read-mark each run as one transaction: a message insert commits
/// together with the conversation's activity bump and the recipient's
/// unread increment, or not at all.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn append(&self, new: NewMessage) -> Result<Message>;

    async fn list(
        &self,
        conversation_id: Uuid,
        cursor: Option<MessageCursor>,
        limit: i64,
    ) -> Result<Vec<Message>>;

    /// Marks everything the other side sent as read and zeroes the
    /// reader's unread counter. Safe to repeat.
    async fn mark_read(&self, conversation_id: Uuid, reader: ParticipantRole) -> Result<()>;
}

#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unread_column(side: ParticipantRole) -> &'static str {
    match side {
        ParticipantRole::Buyer => "unread_buyer",
        ParticipantRole::Vendor => "unread_vendor",
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn append(&self, new: NewMessage) -> Result<Message> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages
                (conversation_id, sender_id, sender_role, sender_name, sender_avatar,
                 content, message_type, attachment_url, attachment_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(new.conversation_id)
        .bind(new.sender_id)
        .bind(new.sender_role)
        .bind(&new.sender_name)
        .bind(&new.sender_avatar)
        .bind(&new.content)
        .bind(new.message_type)
        .bind(&new.attachment_url)
        .bind(&new.attachment_name)
        .fetch_one(&mut *tx)
        .await?;

        let recipient = unread_column(new.sender_role.other());
        let sql = format!(
            "UPDATE conversations
             SET last_message_at = $2, updated_at = NOW(), {recipient} = {recipient} + 1
             WHERE id = $1"
        );
        sqlx::query(&sql)
            .bind(new.conversation_id)
            .bind(message.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(message)
    }

    async fn list(
        &self,
        conversation_id: Uuid,
        cursor: Option<MessageCursor>,
        limit: i64,
    ) -> Result<Vec<Message>> {
        let messages = match cursor {
            Some(cursor) => {
                sqlx::query_as::<_, Message>(
                    "SELECT * FROM messages
                     WHERE conversation_id = $1 AND (created_at, seq) > ($2, $3)
                     ORDER BY created_at ASC, seq ASC
                     LIMIT $4",
                )
                .bind(conversation_id)
                .bind(cursor.created_at)
                .bind(cursor.seq)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Message>(
                    "SELECT * FROM messages
                     WHERE conversation_id = $1
                     ORDER BY created_at ASC, seq ASC
                     LIMIT $2",
                )
                .bind(conversation_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(messages)
    }

    async fn mark_read(&self, conversation_id: Uuid, reader: ParticipantRole) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE messages
             SET is_read = true
             WHERE conversation_id = $1 AND sender_role = $2 AND is_read = false",
        )
        .bind(conversation_id)
        .bind(reader.other())
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "UPDATE conversations SET {} = 0, updated_at = NOW() WHERE id = $1",
            unread_column(reader)
        );
        sqlx::query(&sql)
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
