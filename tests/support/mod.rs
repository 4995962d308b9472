// Each integration test binary pulls in the subset it needs.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The wall clock the fake stores stamp rows with. Postgres `timestamptz`
/// keeps microsecond precision, and the pagination cursors round-trip
/// through `timestamp_micros`; `Utc::now()` alone carries nanoseconds that
/// would not survive that trip, so a boundary row could re-satisfy the
/// `> cursor` filter and reappear on the next page. Truncate to micros to
/// match what the database would persist.
fn now_micros() -> DateTime<Utc> {
    DateTime::from_timestamp_micros(Utc::now().timestamp_micros()).unwrap()
}

use marketplace_messaging::conversation::conversation_models::{
    Conversation, ConversationStatus, NewConversation, ParticipantRole,
};
use marketplace_messaging::conversation::conversation_repository::ConversationStore;
use marketplace_messaging::conversation::ConversationService;
use marketplace_messaging::error::Result;
use marketplace_messaging::marketplace::{
    MarketplaceStore, OrderSummary, ProductSummary, UserProfile, UserRole,
};
use marketplace_messaging::message::message_models::{Message, NewMessage};
use marketplace_messaging::message::message_repository::MessageStore;
use marketplace_messaging::message::MessagingService;
use marketplace_messaging::pagination::{ConversationCursor, MessageCursor};

/// Everything behind the store seams, in one mutex. Lets the services run
/// the full conversation/message lifecycle without a database.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, UserProfile>,
    products: HashMap<Uuid, ProductSummary>,
    orders: HashMap<Uuid, OrderSummary>,
    conversations: HashMap<Uuid, Conversation>,
    messages: Vec<Message>,
    next_seq: i64,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_user(&self, username: &str, role: UserRole) -> UserProfile {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            username: username.to_string(),
            avatar_url: Some(format!("https://cdn.example.com/avatars/{username}.png")),
            role,
            is_active: true,
        };
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(profile.id, profile.clone());
        profile
    }

    pub fn seed_product(&self, vendor_id: Uuid, title: &str) -> ProductSummary {
        let product = ProductSummary {
            id: Uuid::new_v4(),
            vendor_id,
            title: title.to_string(),
            thumbnail_url: Some("https://cdn.example.com/p/thumb.jpg".to_string()),
        };
        self.inner
            .lock()
            .unwrap()
            .products
            .insert(product.id, product.clone());
        product
    }

    pub fn seed_order(&self, buyer_id: Uuid, vendor_id: Uuid, number: &str) -> OrderSummary {
        let order = OrderSummary {
            id: Uuid::new_v4(),
            buyer_id,
            vendor_id,
            order_number: number.to_string(),
        };
        self.inner
            .lock()
            .unwrap()
            .orders
            .insert(order.id, order.clone());
        order
    }

    pub fn conversation(&self, id: Uuid) -> Conversation {
        self.inner.lock().unwrap().conversations[&id].clone()
    }

    pub fn message_count(&self, conversation_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|message| message.conversation_id == conversation_id)
            .count()
    }

    pub fn force_status(&self, conversation_id: Uuid, status: ConversationStatus) {
        let mut inner = self.inner.lock().unwrap();
        let conversation = inner.conversations.get_mut(&conversation_id).unwrap();
        conversation.status = status;
    }
}

#[async_trait]
impl MarketplaceStore for InMemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<ProductSummary>> {
        Ok(self.inner.lock().unwrap().products.get(&id).cloned())
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<OrderSummary>> {
        Ok(self.inner.lock().unwrap().orders.get(&id).cloned())
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn insert(&self, new: NewConversation) -> Result<Conversation> {
        let now = now_micros();
        let conversation = Conversation {
            id: Uuid::new_v4(),
            buyer_id: new.buyer_id,
            vendor_id: new.vendor_id,
            context: new.context,
            product_id: new.product_id,
            order_id: new.order_id,
            buyer_name: new.buyer_name,
            buyer_avatar: new.buyer_avatar,
            vendor_name: new.vendor_name,
            vendor_avatar: new.vendor_avatar,
            product_title: new.product_title,
            product_thumbnail: new.product_thumbnail,
            order_number: new.order_number,
            status: ConversationStatus::Active,
            is_pinned_buyer: false,
            is_pinned_vendor: false,
            is_muted_buyer: false,
            is_muted_vendor: false,
            unread_buyer: 0,
            unread_vendor: 0,
            created_at: now,
            updated_at: now,
            last_message_at: now,
        };
        self.inner
            .lock()
            .unwrap()
            .conversations
            .insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn find_for_participant(
        &self,
        id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
    ) -> Result<Option<Conversation>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .conversations
            .get(&id)
            .filter(|conversation| conversation.participant_id(side) == user_id)
            .cloned())
    }

    async fn list_for_participant(
        &self,
        user_id: Uuid,
        side: ParticipantRole,
        status: Option<ConversationStatus>,
        cursor: Option<ConversationCursor>,
        limit: i64,
    ) -> Result<Vec<Conversation>> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Conversation> = inner
            .conversations
            .values()
            .filter(|conversation| conversation.participant_id(side) == user_id)
            .filter(|conversation| status.map_or(true, |wanted| conversation.status == wanted))
            .filter(|conversation| {
                cursor.map_or(true, |cursor| {
                    (conversation.last_message_at, conversation.id)
                        < (cursor.last_message_at, cursor.id)
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.last_message_at, b.id).cmp(&(a.last_message_at, a.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn update_flags(
        &self,
        id: Uuid,
        user_id: Uuid,
        side: ParticipantRole,
        is_pinned: Option<bool>,
        is_muted: Option<bool>,
    ) -> Result<Option<Conversation>> {
        let mut inner = self.inner.lock().unwrap();
        let Some(conversation) = inner
            .conversations
            .get_mut(&id)
            .filter(|conversation| conversation.participant_id(side) == user_id)
        else {
            return Ok(None);
        };

        match side {
            ParticipantRole::Buyer => {
                if let Some(pinned) = is_pinned {
                    conversation.is_pinned_buyer = pinned;
                }
                if let Some(muted) = is_muted {
                    conversation.is_muted_buyer = muted;
                }
            }
            ParticipantRole::Vendor => {
                if let Some(pinned) = is_pinned {
                    conversation.is_pinned_vendor = pinned;
                }
                if let Some(muted) = is_muted {
                    conversation.is_muted_vendor = muted;
                }
            }
        }
        conversation.updated_at = now_micros();
        Ok(Some(conversation.clone()))
    }

    async fn set_status(&self, id: Uuid, status: ConversationStatus) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(conversation) = inner.conversations.get_mut(&id) {
            conversation.status = status;
            conversation.updated_at = now_micros();
        }
        Ok(())
    }

    async fn unread_total(
        &self,
        user_id: Uuid,
        side: ParticipantRole,
        include_archived: bool,
    ) -> Result<i64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .conversations
            .values()
            .filter(|conversation| conversation.participant_id(side) == user_id)
            .filter(|conversation| {
                include_archived || conversation.status != ConversationStatus::Archived
            })
            .map(|conversation| i64::from(conversation.unread_for(side)))
            .sum())
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn append(&self, new: NewMessage) -> Result<Message> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_seq += 1;
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: new.conversation_id,
            seq: inner.next_seq,
            sender_id: new.sender_id,
            sender_role: new.sender_role,
            sender_name: new.sender_name,
            sender_avatar: new.sender_avatar,
            content: new.content,
            message_type: new.message_type,
            attachment_url: new.attachment_url,
            attachment_name: new.attachment_name,
            is_read: false,
            created_at: now_micros(),
        };
        if let Some(conversation) = inner.conversations.get_mut(&new.conversation_id) {
            conversation.last_message_at = message.created_at;
            conversation.updated_at = message.created_at;
            match new.sender_role.other() {
                ParticipantRole::Buyer => conversation.unread_buyer += 1,
                ParticipantRole::Vendor => conversation.unread_vendor += 1,
            }
        }
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list(
        &self,
        conversation_id: Uuid,
        cursor: Option<MessageCursor>,
        limit: i64,
    ) -> Result<Vec<Message>> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Message> = inner
            .messages
            .iter()
            .filter(|message| message.conversation_id == conversation_id)
            .filter(|message| {
                cursor.map_or(true, |cursor| {
                    (message.created_at, message.seq) > (cursor.created_at, cursor.seq)
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.created_at, a.seq).cmp(&(b.created_at, b.seq)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn mark_read(&self, conversation_id: Uuid, reader: ParticipantRole) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let sender_side = reader.other();
        for message in inner
            .messages
            .iter_mut()
            .filter(|message| message.conversation_id == conversation_id)
            .filter(|message| message.sender_role == sender_side)
        {
            message.is_read = true;
        }
        if let Some(conversation) = inner.conversations.get_mut(&conversation_id) {
            match reader {
                ParticipantRole::Buyer => conversation.unread_buyer = 0,
                ParticipantRole::Vendor => conversation.unread_vendor = 0,
            }
        }
        Ok(())
    }
}

pub fn conversation_service(store: &Arc<InMemoryStore>) -> ConversationService {
    ConversationService::new(store.clone(), store.clone())
}

pub fn messaging_service(store: &Arc<InMemoryStore>) -> MessagingService {
    MessagingService::new(store.clone(), store.clone(), true)
}

pub fn messaging_service_excluding_archived(store: &Arc<InMemoryStore>) -> MessagingService {
    MessagingService::new(store.clone(), store.clone(), false)
}
