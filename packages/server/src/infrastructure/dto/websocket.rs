//! WebSocket event DTOs.
//!
//! Every outbound event carries a `type` discriminator the client
//! switches on. Inbound client events are a small tagged enum.

use serde::{Deserialize, Serialize};

/// Discriminator for outbound events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    /// A user's first connection to a chat arrived.
    UserConnected,
    /// A user's last connection to a chat dropped.
    UserDisconnected,
    /// A message was persisted and fanned out.
    MessagePosted,
    /// Legacy single-user "stopped typing" signal emitted after a post.
    UserStoppedTyping,
    /// Refreshed list of users typing in a chat.
    UsersTyping,
    /// A new chat was created (announced globally).
    ChatCreated,
    /// A chat was deleted by the retention sweep.
    ChatDeleted,
    /// Snapshot sent to a connection that just joined a chat.
    ChatJoined,
}

/// Wire form of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: String,
    pub display_name: String,
    pub tag: u32,
}

/// Wire form of a chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDto {
    pub chat_id: String,
    pub name: String,
    pub created_at: i64,
}

/// Wire form of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub message_id: String,
    pub chat_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConnectedEvent {
    pub r#type: EventType,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDisconnectedEvent {
    pub r#type: EventType,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePostedEvent {
    pub r#type: EventType,
    pub message: MessageDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStoppedTypingEvent {
    pub r#type: EventType,
    pub user: UserDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersTypingEvent {
    pub r#type: EventType,
    pub chat_id: String,
    pub user_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCreatedEvent {
    pub r#type: EventType,
    pub chat: ChatDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDeletedEvent {
    pub r#type: EventType,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatJoinedEvent {
    pub r#type: EventType,
    pub chat: ChatDto,
    pub present: Vec<UserDto>,
}

/// Inbound events a client may send over its socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// The user is composing a message.
    Typing,
    /// The user explicitly stopped composing.
    StopTyping,
}

/// Serialize an event DTO to its wire string.
///
/// Event DTOs are string-keyed plain data; serialization cannot fail.
pub fn to_json<T: Serialize>(event: &T) -> String {
    serde_json::to_string(event).expect("event DTOs serialize")
}
