use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};

use learnhub_core::{ApiResponse, AppError, ErrorResponse};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    Conversation, ConversationDetail, ConversationFilterParams, ConversationId, ConversationRef,
    ConversationWithLastMessage, CreateConversationDto, CreateMessageDto, Message,
    UpdateConversationDto,
};
use super::service::ConversationService;

/// Start a conversation
///
/// Creating a direct conversation between users who already have one returns
/// the existing conversation with status 200.
#[utoipa::path(
    post,
    path = "/api/v1/conversation",
    request_body = CreateConversationDto,
    responses(
        (status = 201, description = "Conversation created", body = ApiResponse<Conversation>),
        (status = 200, description = "Existing direct conversation", body = ApiResponse<Conversation>),
        (status = 400, description = "Fewer than two participants or unknown type", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Conversations",
    security(("bearer_auth" = []))
)]
pub async fn create_conversation(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateConversationDto>,
) -> Result<(StatusCode, Json<ApiResponse<Conversation>>), AppError> {
    let outcome = ConversationService::create_conversation(&state.db, dto).await?;

    let (status, message) = if outcome.created {
        (StatusCode::CREATED, "Conversation created")
    } else {
        (StatusCode::OK, "Conversation already exists")
    };

    Ok((
        status,
        Json(ApiResponse::with_message(message, outcome.conversation)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/conversation",
    params(ConversationFilterParams),
    responses(
        (status = 200, description = "Conversations with their latest message", body = ApiResponse<Vec<ConversationWithLastMessage>>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Conversations",
    security(("bearer_auth" = []))
)]
pub async fn get_conversations(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    filters: Result<Query<ConversationFilterParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ConversationWithLastMessage>>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(format!("Invalid query parameters: {}", e)))?;

    let page = ConversationService::list_conversations(&state.db, filters).await?;
    Ok(Json(page.into()))
}

/// Get a conversation by id or key, with its messages
#[utoipa::path(
    get,
    path = "/api/v1/conversation/{id}",
    params(("id" = String, Path, description = "Conversation ID or conversation key")),
    responses(
        (status = 200, description = "Conversation and messages, newest first", body = ApiResponse<ConversationDetail>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse)
    ),
    tag = "Conversations",
    security(("bearer_auth" = []))
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ConversationDetail>>, AppError> {
    let detail =
        ConversationService::get_conversation(&state.db, ConversationRef::parse(&id)).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

#[utoipa::path(
    put,
    path = "/api/v1/conversation/{id}",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    request_body = UpdateConversationDto,
    responses(
        (status = 200, description = "Metadata replaced", body = ApiResponse<Conversation>),
        (status = 400, description = "Metadata is required", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a participant", body = ErrorResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse)
    ),
    tag = "Conversations",
    security(("bearer_auth" = []))
)]
pub async fn update_conversation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ConversationId>,
    ValidatedJson(dto): ValidatedJson<UpdateConversationDto>,
) -> Result<Json<ApiResponse<Conversation>>, AppError> {
    let conversation =
        ConversationService::update_conversation(&state.db, &auth_user, id, dto).await?;
    Ok(Json(ApiResponse::with_message(
        "Conversation updated",
        conversation,
    )))
}

/// Block a conversation
#[utoipa::path(
    delete,
    path = "/api/v1/conversation/{id}",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Conversation blocked", body = ApiResponse<Conversation>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a participant", body = ErrorResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse)
    ),
    tag = "Conversations",
    security(("bearer_auth" = []))
)]
pub async fn delete_conversation(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ConversationId>,
) -> Result<Json<ApiResponse<Conversation>>, AppError> {
    let conversation = ConversationService::delete_conversation(&state.db, &auth_user, id).await?;
    Ok(Json(ApiResponse::with_message(
        "Conversation blocked",
        conversation,
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/conversation/{id}/messages",
    params(("id" = Uuid, Path, description = "Conversation ID")),
    request_body = CreateMessageDto,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<Message>),
        (status = 400, description = "Invalid content or blocked conversation", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not a participant", body = ErrorResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse)
    ),
    tag = "Conversations",
    security(("bearer_auth" = []))
)]
pub async fn send_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ConversationId>,
    ValidatedJson(dto): ValidatedJson<CreateMessageDto>,
) -> Result<(StatusCode, Json<ApiResponse<Message>>), AppError> {
    let message = ConversationService::send_message(&state.db, &auth_user, id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Message sent", message)),
    ))
}
