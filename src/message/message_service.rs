use std::sync::Arc;

use uuid::Uuid;

use super::message_dto::{MessageQuery, SendMessageRequest};
use super::message_models::{Message, MessageType, NewMessage};
use super::message_repository::MessageStore;
use crate::conversation::conversation_models::{Conversation, ConversationStatus, ParticipantRole};
use crate::conversation::conversation_repository::ConversationStore;
use crate::error::{AppError, Result};
use crate::pagination::MessageCursor;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;
const MAX_CONTENT_CHARS: usize = 5000;

#[derive(Clone)]
pub struct MessagingService {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    unread_includes_archived: bool,
}

impl MessagingService {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        unread_includes_archived: bool,
    ) -> Self {
        Self {
            conversations,
            messages,
            unread_includes_archived,
        }
    }

    /// Chronological page of a conversation the caller participates in.
    /// A conversation the caller cannot access is "not found", never an
    /// empty page.
    pub async fn list_messages(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
        query: MessageQuery,
    ) -> Result<(Vec<Message>, Option<String>)> {
        self.require_participant(conversation_id, user_id, side)
            .await?;

        let limit = query
            .limit
            .map(i64::from)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let cursor = query
            .cursor
            .as_deref()
            .map(MessageCursor::decode)
            .transpose()?;

        let mut messages = self
            .messages
            .list(conversation_id, cursor, limit + 1)
            .await?;

        let next_cursor = if messages.len() as i64 > limit {
            messages.truncate(limit as usize);
            messages.last().map(|last| {
                MessageCursor {
                    created_at: last.created_at,
                    seq: last.seq,
                }
                .encode()
            })
        } else {
            None
        };

        Ok((messages, next_cursor))
    }

    /// Preconditions in order, first failure wins: participant (not
    /// found), conversation open (forbidden), content bounds (invalid).
    /// Nothing is written until all three pass.
    pub async fn send_message(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
        sender_name: String,
        sender_avatar: Option<String>,
        payload: SendMessageRequest,
    ) -> Result<Message> {
        let conversation = self
            .require_participant(conversation_id, user_id, side)
            .await?;

        if conversation.status == ConversationStatus::Closed {
            return Err(AppError::Forbidden("Conversation is closed".to_string()));
        }

        let content = payload.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation(
                "Message content cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(AppError::Validation(format!(
                "Message content must be at most {} characters",
                MAX_CONTENT_CHARS
            )));
        }

        let message = self
            .messages
            .append(NewMessage {
                conversation_id,
                sender_id: user_id,
                sender_role: side,
                sender_name,
                sender_avatar,
                content: content.to_string(),
                message_type: payload.message_type.unwrap_or(MessageType::Text),
                attachment_url: payload.attachment_url,
                attachment_name: payload.attachment_name,
            })
            .await?;

        tracing::debug!(
            conversation_id = %conversation_id,
            message_id = %message.id,
            "message sent"
        );

        Ok(message)
    }

    /// Acknowledge everything the other side sent so far. Idempotent.
    pub async fn mark_conversation_as_read(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
    ) -> Result<()> {
        self.require_participant(conversation_id, user_id, side)
            .await?;

        self.messages.mark_read(conversation_id, side).await
    }

    /// Badge total across the caller's conversations. Archived threads
    /// count or not depending on configuration.
    pub async fn unread_count(&self, user_id: Uuid, side: ParticipantRole) -> Result<i64> {
        self.conversations
            .unread_total(user_id, side, self.unread_includes_archived)
            .await
    }

    async fn require_participant(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
    ) -> Result<Conversation> {
        self.conversations
            .find_for_participant(conversation_id, user_id, side)
            .await?
            .ok_or_else(|| AppError::NotFound("Conversation not found".to_string()))
    }
}
