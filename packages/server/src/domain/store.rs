//! Durable store interface.
//!
//! The orchestration layer depends on this trait; concrete backends
//! live in the infrastructure layer (dependency inversion). The store
//! is shared with the periodic retention sweep and must tolerate
//! concurrent reads and writes.

use async_trait::async_trait;
use thiserror::Error;

use super::entity::{Chat, ChatMessage, User};
use super::value_object::{ChatId, Timestamp, UserId};

/// Failure surfaced by a store backend.
///
/// Callers treat any store failure as "the operation did not happen":
/// no broadcast is ever published for a write that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Durable store for users, chats and messages.
///
/// Every method suspends; none of them may be called while holding a
/// live-state lock (registry, typing). Look up store data before
/// entering a critical section.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError>;

    async fn save_user(&self, user: User) -> Result<(), StoreError>;

    /// The most recently created user, for tag assignment.
    async fn latest_user_by_creation(&self) -> Result<Option<User>, StoreError>;

    async fn find_chat(&self, id: &ChatId) -> Result<Option<Chat>, StoreError>;

    async fn find_chat_by_name(&self, name: &str) -> Result<Option<Chat>, StoreError>;

    /// All chats in creation order.
    async fn list_chats(&self) -> Result<Vec<Chat>, StoreError>;

    async fn save_chat(&self, chat: Chat) -> Result<(), StoreError>;

    async fn delete_chat(&self, id: &ChatId) -> Result<(), StoreError>;

    /// All messages of a chat in chronological order.
    async fn list_messages(&self, chat_id: &ChatId) -> Result<Vec<ChatMessage>, StoreError>;

    async fn save_message(&self, message: ChatMessage) -> Result<(), StoreError>;

    /// Delete messages of a chat created strictly before `cutoff`.
    /// Returns the number of deleted messages.
    async fn delete_messages_older_than(
        &self,
        chat_id: &ChatId,
        cutoff: Timestamp,
    ) -> Result<usize, StoreError>;

    async fn count_messages(&self, chat_id: &ChatId) -> Result<usize, StoreError>;
}
