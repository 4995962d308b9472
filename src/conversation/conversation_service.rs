use std::sync::Arc;

use uuid::Uuid;

use super::conversation_dto::{ConversationQuery, CreateConversationRequest};
use super::conversation_models::{
    Conversation, ConversationContext, ConversationStatus, NewConversation, ParticipantRole,
};
use super::conversation_repository::ConversationStore;
use crate::error::{AppError, Result};
use crate::marketplace::{MarketplaceStore, UserRole};
use crate::pagination::ConversationCursor;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Clone)]
pub struct ConversationService {
    conversations: Arc<dyn ConversationStore>,
    marketplace: Arc<dyn MarketplaceStore>,
}

impl ConversationService {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        marketplace: Arc<dyn MarketplaceStore>,
    ) -> Self {
        Self {
            conversations,
            marketplace,
        }
    }

    /// Open a thread with a vendor. Only buyers initiate; the handler gates
    /// on the session role before calling in.
    ///
    /// A resolvable `product_id` forces the context to `product_inquiry`
    /// and snapshots the product's display fields; a resolvable `order_id`
    /// owned by the buyer forces `order_support`. Unresolvable references
    /// are dropped rather than stored dangling.
    pub async fn create(
        &self,
        buyer_id: Uuid,
        payload: CreateConversationRequest,
    ) -> Result<Conversation> {
        let buyer = self
            .marketplace
            .find_user(buyer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Buyer profile not found".to_string()))?;

        let vendor = self
            .marketplace
            .find_user(payload.vendor_id)
            .await?
            .filter(|profile| profile.role == UserRole::Vendor && profile.is_active)
            .ok_or_else(|| AppError::NotFound("Vendor not found".to_string()))?;

        let mut context = payload.context.unwrap_or(ConversationContext::General);
        let mut product_id = None;
        let mut product_title = None;
        let mut product_thumbnail = None;
        let mut order_id = None;
        let mut order_number = None;

        if let Some(id) = payload.product_id {
            if let Some(product) = self
                .marketplace
                .find_product(id)
                .await?
                .filter(|product| product.vendor_id == vendor.id)
            {
                context = ConversationContext::ProductInquiry;
                product_id = Some(product.id);
                product_title = Some(product.title);
                product_thumbnail = product.thumbnail_url;
            }
        }

        if let Some(id) = payload.order_id {
            if let Some(order) = self
                .marketplace
                .find_order(id)
                .await?
                .filter(|order| order.buyer_id == buyer.id)
            {
                context = ConversationContext::OrderSupport;
                order_id = Some(order.id);
                order_number = Some(order.order_number);
            }
        }

        let conversation = self
            .conversations
            .insert(NewConversation {
                buyer_id: buyer.id,
                vendor_id: vendor.id,
                context,
                product_id,
                order_id,
                buyer_name: buyer.username,
                buyer_avatar: buyer.avatar_url,
                vendor_name: vendor.username,
                vendor_avatar: vendor.avatar_url,
                product_title,
                product_thumbnail,
                order_number,
            })
            .await?;

        tracing::debug!(
            conversation_id = %conversation.id,
            buyer_id = %conversation.buyer_id,
            vendor_id = %conversation.vendor_id,
            "conversation created"
        );

        Ok(conversation)
    }

    /// Fetch scoped to the caller's side. A conversation that exists but
    /// belongs to someone else reads exactly like one that doesn't exist.
    pub async fn get_for_user(
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

    /// Most recently active first. Returns the page and, when more rows
    /// remain, an opaque cursor that restarts the scan after the last row.
    pub async fn list(
        &self,
        user_id: Uuid,
        side: ParticipantRole,
        query: ConversationQuery,
    ) -> Result<(Vec<Conversation>, Option<String>)> {
        let limit = query
            .limit
            .map(i64::from)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let cursor = query
            .cursor
            .as_deref()
            .map(ConversationCursor::decode)
            .transpose()?;

        // One extra row decides whether a next page exists.
        let mut conversations = self
            .conversations
            .list_for_participant(user_id, side, query.status, cursor, limit + 1)
            .await?;

        let next_cursor = if conversations.len() as i64 > limit {
            conversations.truncate(limit as usize);
            conversations.last().map(|last| {
                ConversationCursor {
                    last_message_at: last.last_message_at,
                    id: last.id,
                }
                .encode()
            })
        } else {
            None
        };

        Ok((conversations, next_cursor))
    }

    /// Pin/mute for the caller's own side. Which columns get written is
    /// decided by `side`, so the other participant's flags cannot be
    /// reached from here no matter what the payload says.
    pub async fn update_flags(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
        is_pinned: Option<bool>,
        is_muted: Option<bool>,
    ) -> Result<Conversation> {
        self.conversations
            .update_flags(conversation_id, user_id, side, is_pinned, is_muted)
            .await?
            .ok_or_else(|| AppError::NotFound("Conversation not found".to_string()))
    }

    /// `active -> archived`. Re-archiving is a no-op; flagged and closed
    /// threads belong to moderation and stay put.
    pub async fn archive(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
    ) -> Result<()> {
        let conversation = self.get_for_user(conversation_id, user_id, side).await?;

        match conversation.status {
            ConversationStatus::Active => {
                self.conversations
                    .set_status(conversation_id, ConversationStatus::Archived)
                    .await
            }
            ConversationStatus::Archived => Ok(()),
            ConversationStatus::Flagged | ConversationStatus::Closed => Err(AppError::Forbidden(
                "Conversation can no longer be archived".to_string(),
            )),
        }
    }
}
