pub mod conversation_dto;
pub mod conversation_handlers;
pub mod conversation_models;
pub mod conversation_repository;
pub mod conversation_service;

pub use conversation_models::{
    Conversation, ConversationContext, ConversationStatus, NewConversation, ParticipantRole,
};
pub use conversation_repository::{ConversationStore, PgConversationStore};
pub use conversation_service::ConversationService;
