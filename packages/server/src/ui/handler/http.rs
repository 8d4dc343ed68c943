//! HTTP API endpoint handlers.
//!
//! Status mapping: validation failures and conflicts are 400 with a
//! `{field: message}` body, missing references are 404, store failures
//! are 500. The typing signal returns 204 with no body.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{ChatId, StoreError, UserId, ValueError},
    infrastructure::dto::http::{
        ChatListResponse, ChatMessagesResponse, ChatUsersResponse, CreateChatRequest,
        PostMessageRequest, RegisterUserRequest, TypingRequest, UserResponse, error_body,
    },
    infrastructure::dto::websocket::{ChatDto, MessageDto},
    ui::state::AppState,
    usecase::{
        CreateChatError, ListChatMessagesError, ListChatUsersError, LoginUserError,
        PostMessageError, RegisterUserError, SignalTypingError,
    },
};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn validation_error(err: &ValueError) -> ApiError {
    let field = match err {
        ValueError::Empty(field) | ValueError::TooLong(field, _) => field,
    };
    (
        StatusCode::BAD_REQUEST,
        Json(error_body(field, &err.to_string())),
    )
}

fn not_found(field: &str, message: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(error_body(field, message)))
}

fn store_failure(err: &StoreError) -> ApiError {
    tracing::error!("Store failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error_body("store", "store failure")),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Register a user under a display name
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    match state
        .register_user_usecase
        .execute(request.display_name)
        .await
    {
        Ok(user) => Ok(Json(UserResponse {
            created_at: user.created_at.value(),
            user: (&user).into(),
        })),
        Err(RegisterUserError::Validation(e)) => Err(validation_error(&e)),
        Err(RegisterUserError::StoreFailure(e)) => Err(store_failure(&e)),
    }
}

/// Resolve an opaque user id (login)
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    match state
        .login_user_usecase
        .execute(UserId::new(user_id))
        .await
    {
        Ok(user) => Ok(Json(UserResponse {
            created_at: user.created_at.value(),
            user: (&user).into(),
        })),
        Err(LoginUserError::NotFound) => Err(not_found("userId", "user not found")),
        Err(LoginUserError::StoreFailure(e)) => Err(store_failure(&e)),
    }
}

/// List all chats in creation order
pub async fn list_chats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChatListResponse>, ApiError> {
    let chats = state
        .list_chats_usecase
        .execute()
        .await
        .map_err(|e| store_failure(&e))?;
    Ok(Json(ChatListResponse {
        chats: chats.iter().map(ChatDto::from).collect(),
    }))
}

/// Create a chat
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateChatRequest>,
) -> Result<Json<ChatDto>, ApiError> {
    match state
        .create_chat_usecase
        .execute(UserId::new(request.user_id), request.chat_name)
        .await
    {
        Ok(chat) => Ok(Json((&chat).into())),
        Err(CreateChatError::Validation(e)) => Err(validation_error(&e)),
        Err(CreateChatError::UserNotFound) => Err(not_found("userId", "user not found")),
        Err(CreateChatError::AlreadyExists) => Err((
            StatusCode::BAD_REQUEST,
            Json(error_body("chatName", "chat already exists")),
        )),
        Err(CreateChatError::StoreFailure(e)) => Err(store_failure(&e)),
    }
}

/// List the users currently present in a chat
pub async fn list_chat_users(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatUsersResponse>, ApiError> {
    match state
        .list_chat_users_usecase
        .execute(ChatId::new(chat_id))
        .await
    {
        Ok(users) => Ok(Json(ChatUsersResponse {
            users: users.iter().map(Into::into).collect(),
        })),
        Err(ListChatUsersError::ChatNotFound) => Err(not_found("chatId", "chat not found")),
        Err(ListChatUsersError::StoreFailure(e)) => Err(store_failure(&e)),
    }
}

/// List a chat's messages, chronological
pub async fn list_chat_messages(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatMessagesResponse>, ApiError> {
    match state
        .list_chat_messages_usecase
        .execute(ChatId::new(chat_id))
        .await
    {
        Ok(messages) => Ok(Json(ChatMessagesResponse {
            messages: messages.iter().map(Into::into).collect(),
        })),
        Err(ListChatMessagesError::ChatNotFound) => Err(not_found("chatId", "chat not found")),
        Err(ListChatMessagesError::StoreFailure(e)) => Err(store_failure(&e)),
    }
}

/// Post a message to a chat
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Result<Json<MessageDto>, ApiError> {
    match state
        .post_message_usecase
        .execute(
            ChatId::new(chat_id),
            UserId::new(request.user_id),
            request.content,
        )
        .await
    {
        Ok(message) => Ok(Json((&message).into())),
        Err(PostMessageError::Validation(e)) => Err(validation_error(&e)),
        Err(PostMessageError::ChatNotFound) => Err(not_found("chatId", "chat not found")),
        Err(PostMessageError::UserNotInChat) => {
            Err(not_found("userId", "user not present in chat"))
        }
        Err(PostMessageError::StoreFailure(e)) => Err(store_failure(&e)),
    }
}

/// Flag the requesting user as typing (204 on success)
pub async fn signal_typing(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
    Json(request): Json<TypingRequest>,
) -> Result<StatusCode, ApiError> {
    match state
        .signal_typing_usecase
        .execute_start(ChatId::new(chat_id), UserId::new(request.user_id))
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(SignalTypingError::ChatNotFound) => Err(not_found("chatId", "chat not found")),
        Err(SignalTypingError::UserNotInChat) => {
            Err(not_found("userId", "user not present in chat"))
        }
        Err(SignalTypingError::StoreFailure(e)) => Err(store_failure(&e)),
    }
}
