//! Domain entities owned by the durable store.
//!
//! Live connection state is deliberately not modelled here: presence
//! is derived from the connection registry, never persisted.

use super::value_object::{
    ChatId, ChatName, DisplayName, MessageContent, MessageId, Tag, Timestamp, UserId,
};

/// A registered user. Immutable after creation except via
/// re-registration (which creates a new user with a fresh tag).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub display_name: DisplayName,
    /// Disambiguates duplicate display names; strictly increasing
    /// across registrations.
    pub tag: Tag,
    pub created_at: Timestamp,
}

impl User {
    pub fn new(id: UserId, display_name: DisplayName, tag: Tag, created_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            tag,
            created_at,
        }
    }
}

/// A named room grouping users and messages. Membership is not stored
/// here: the authoritative "users in chat" is the live presence set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub name: ChatName,
    pub created_at: Timestamp,
}

impl Chat {
    pub fn new(id: ChatId, name: ChatName, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }
}

/// A persisted chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(
        id: MessageId,
        chat_id: ChatId,
        user_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            chat_id,
            user_id,
            content,
            created_at,
        }
    }
}
