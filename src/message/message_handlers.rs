use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    conversation::conversation_dto::SuccessResponse,
    error::{AppError, Result},
    message::message_dto::{
        MessageEnvelope, MessageListResponse, MessageQuery, SendMessageRequest,
        UnreadCountResponse,
    },
    middleware::AuthUser,
    state::AppState,
};

/// List a conversation's messages in chronological order
#[utoipa::path(
    get,
    path = "/api/conversations/{id}/messages",
    tag = "messages",
    params(
        ("id" = Uuid, Path, description = "Conversation ID"),
        ("limit" = Option<u32>, Query, description = "Page size (default: 50, max: 200)"),
        ("cursor" = Option<String>, Query, description = "Opaque cursor from a previous page")
    ),
    responses(
        (status = 200, description = "Page of messages", body = MessageListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or not a participant")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(conversation_id): Path<Uuid>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let side = user.role.as_participant().ok_or_else(|| {
        AppError::Forbidden("Messaging requires a buyer or vendor account".to_string())
    })?;

    let (messages, next_cursor) = state
        .messaging_service
        .list_messages(conversation_id, user.user_id, side, query)
        .await?;

    Ok(Json(MessageListResponse {
        messages,
        next_cursor,
    }))
}

/// Send a message in a conversation
#[utoipa::path(
    post,
    path = "/api/conversations/{id}/messages",
    tag = "messages",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Conversation is closed"),
        (status = 404, description = "Not found or not a participant"),
        (status = 422, description = "Content out of bounds")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(conversation_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    let side = user.role.as_participant().ok_or_else(|| {
        AppError::Forbidden("Messaging requires a buyer or vendor account".to_string())
    })?;

    payload.validate()?;

    // Snapshot the sender's display fields as they are right now
    let sender = state
        .marketplace
        .find_user(user.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let message = state
        .messaging_service
        .send_message(
            conversation_id,
            user.user_id,
            side,
            sender.username,
            sender.avatar_url,
            payload,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(MessageEnvelope { message })))
}

/// Mark a conversation as read for the caller's side
#[utoipa::path(
    post,
    path = "/api/conversations/{id}/read",
    tag = "messages",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "Conversation marked as read", body = SuccessResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or not a participant")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn mark_conversation_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let side = user.role.as_participant().ok_or_else(|| {
        AppError::Forbidden("Messaging requires a buyer or vendor account".to_string())
    })?;

    state
        .messaging_service
        .mark_conversation_as_read(conversation_id, user.user_id, side)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Total unread messages across the caller's conversations
#[utoipa::path(
    get,
    path = "/api/messages/unread-count",
    tag = "messages",
    responses(
        (status = 200, description = "Aggregate unread count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    // Roles without a participant side simply have nothing unread
    let unread_count = match user.role.as_participant() {
        Some(side) => {
            state
                .messaging_service
                .unread_count(user.user_id, side)
                .await?
        }
        None => 0,
    };

    Ok(Json(UnreadCountResponse { unread_count }))
}
