use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    conversation::conversation_dto::{
        ConversationAction, ConversationEnvelope, ConversationListResponse, ConversationQuery,
        CreateConversationRequest, SuccessResponse, UpdateConversationRequest,
    },
    error::{AppError, Result},
    marketplace::UserRole,
    middleware::AuthUser,
    state::AppState,
};

/// Start a conversation with a vendor (buyers only)
#[utoipa::path(
    post,
    path = "/api/conversations",
    tag = "conversations",
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation created", body = ConversationEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a buyer"),
        (status = 404, description = "Vendor not found")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn create_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateConversationRequest>,
) -> Result<impl IntoResponse> {
    match user.role {
        UserRole::Buyer => {}
        UserRole::Vendor | UserRole::Admin => {
            return Err(AppError::Forbidden(
                "Only buyers can start conversations".to_string(),
            ))
        }
    }

    let conversation = state
        .conversation_service
        .create(user.user_id, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConversationEnvelope { conversation }),
    ))
}

/// List the caller's conversations, most recently active first
#[utoipa::path(
    get,
    path = "/api/conversations",
    tag = "conversations",
    params(
        ("limit" = Option<u32>, Query, description = "Page size (default: 20, max: 100)"),
        ("cursor" = Option<String>, Query, description = "Opaque cursor from a previous page"),
        ("status" = Option<String>, Query, description = "Filter by status (active, archived, flagged, closed)")
    ),
    responses(
        (status = 200, description = "Page of conversations", body = ConversationListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Role cannot participate in conversations")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_conversations(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ConversationQuery>,
) -> Result<impl IntoResponse> {
    let side = user.role.as_participant().ok_or_else(|| {
        AppError::Forbidden("Messaging requires a buyer or vendor account".to_string())
    })?;

    let (conversations, next_cursor) = state
        .conversation_service
        .list(user.user_id, side, query)
        .await?;

    let unread_count = state
        .messaging_service
        .unread_count(user.user_id, side)
        .await?;

    Ok(Json(ConversationListResponse {
        conversations,
        next_cursor,
        unread_count,
    }))
}

/// Fetch a single conversation the caller participates in
#[utoipa::path(
    get,
    path = "/api/conversations/{id}",
    tag = "conversations",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    responses(
        (status = 200, description = "The conversation", body = ConversationEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found or not a participant")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let side = user.role.as_participant().ok_or_else(|| {
        AppError::Forbidden("Messaging requires a buyer or vendor account".to_string())
    })?;

    let conversation = state
        .conversation_service
        .get_for_user(conversation_id, user.user_id, side)
        .await?;

    Ok(Json(ConversationEnvelope { conversation }))
}

/// Pin/mute the caller's side of a conversation, or archive it
#[utoipa::path(
    patch,
    path = "/api/conversations/{id}",
    tag = "conversations",
    params(
        ("id" = Uuid, Path, description = "Conversation ID")
    ),
    request_body = UpdateConversationRequest,
    responses(
        (status = 200, description = "Updated conversation, or {success:true} for archive"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Conversation can no longer be archived"),
        (status = 404, description = "Not found or not a participant")
    ),
    security(
        ("session_cookie" = [])
    )
)]
pub async fn update_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(conversation_id): Path<Uuid>,
    Json(payload): Json<UpdateConversationRequest>,
) -> Result<impl IntoResponse> {
    let side = user.role.as_participant().ok_or_else(|| {
        AppError::Forbidden("Messaging requires a buyer or vendor account".to_string())
    })?;

    if let Some(ConversationAction::Archive) = payload.action {
        state
            .conversation_service
            .archive(conversation_id, user.user_id, side)
            .await?;

        return Ok(Json(SuccessResponse::ok()).into_response());
    }

    let conversation = state
        .conversation_service
        .update_flags(
            conversation_id,
            user.user_id,
            side,
            payload.is_pinned,
            payload.is_muted,
        )
        .await?;

    Ok(Json(ConversationEnvelope { conversation }).into_response())
}
