//! Domain layer: value objects, entities and the interfaces the
//! orchestration layer depends on.

pub mod entity;
pub mod pusher;
pub mod store;
pub mod value_object;

pub use entity::{Chat, ChatMessage, User};
pub use pusher::{EventPusher, PushError, PusherChannel};
pub use store::{ChatStore, StoreError};
pub use value_object::{
    ChatId, ChatName, ConnectionId, DisplayName, MessageContent, MessageId, Tag, Timestamp, UserId,
    ValueError,
};

/// Name of the chat that always exists.
///
/// Created idempotently at startup and exempt from chat deletion by
/// the retention sweep (its messages still expire).
pub const GENERAL_CHAT_NAME: &str = "general-chat";
