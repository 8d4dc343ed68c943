//! HTTP API request and response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::{ChatDto, MessageDto, UserDto};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub chat_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(flatten)]
    pub user: UserDto,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatListResponse {
    pub chats: Vec<ChatDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatUsersResponse {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessagesResponse {
    pub messages: Vec<MessageDto>,
}

/// Structured error body: `{field: message}`.
pub fn error_body(field: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ field: message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        // when:
        let body = error_body("chatName", "chat already exists");

        // then:
        assert_eq!(
            body,
            serde_json::json!({"chatName": "chat already exists"})
        );
    }

    #[test]
    fn test_register_request_missing_field_defaults_empty() {
        // given: a body without displayName
        let json = "{}";

        // when:
        let request: RegisterUserRequest = serde_json::from_str(json).unwrap();

        // then: validation happens downstream on the empty string
        assert_eq!(request.display_name, "");
    }
}
