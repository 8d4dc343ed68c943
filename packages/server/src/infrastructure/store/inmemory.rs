//! In-memory implementation of the durable store.
//!
//! Id-keyed maps plus explicit creation-order vectors, kept strictly
//! separate from the live connection state owned by the realtime core.
//! Serves as the test backend and as the single-process default; a
//! DBMS-backed implementation would slot in behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Chat, ChatId, ChatMessage, ChatStore, StoreError, Timestamp, User, UserId,
};

#[derive(Default)]
struct StoreInner {
    users: HashMap<UserId, User>,
    /// Creation order; the last element is the latest registration.
    user_order: Vec<UserId>,
    chats: HashMap<ChatId, Chat>,
    chat_order: Vec<ChatId>,
    /// Messages per chat in chronological (insertion) order.
    messages: HashMap<ChatId, Vec<ChatMessage>>,
}

/// In-memory chat store.
#[derive(Default)]
pub struct InMemoryChatStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(id).cloned())
    }

    async fn save_user(&self, user: User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.users.contains_key(&user.id) {
            inner.user_order.push(user.id.clone());
        }
        inner.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn latest_user_by_creation(&self) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .user_order
            .last()
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn find_chat(&self, id: &ChatId) -> Result<Option<Chat>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.chats.get(id).cloned())
    }

    async fn find_chat_by_name(&self, name: &str) -> Result<Option<Chat>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .chats
            .values()
            .find(|chat| chat.name.as_str() == name)
            .cloned())
    }

    async fn list_chats(&self) -> Result<Vec<Chat>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .chat_order
            .iter()
            .filter_map(|id| inner.chats.get(id))
            .cloned()
            .collect())
    }

    async fn save_chat(&self, chat: Chat) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.chats.contains_key(&chat.id) {
            inner.chat_order.push(chat.id.clone());
        }
        inner.chats.insert(chat.id.clone(), chat);
        Ok(())
    }

    async fn delete_chat(&self, id: &ChatId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.chats.remove(id);
        inner.chat_order.retain(|chat_id| chat_id != id);
        inner.messages.remove(id);
        Ok(())
    }

    async fn list_messages(&self, chat_id: &ChatId) -> Result<Vec<ChatMessage>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.messages.get(chat_id).cloned().unwrap_or_default())
    }

    async fn save_message(&self, message: ChatMessage) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner
            .messages
            .entry(message.chat_id.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn delete_messages_older_than(
        &self,
        chat_id: &ChatId,
        cutoff: Timestamp,
    ) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(messages) = inner.messages.get_mut(chat_id) else {
            return Ok(0);
        };
        let before = messages.len();
        messages.retain(|message| message.created_at >= cutoff);
        Ok(before - messages.len())
    }

    async fn count_messages(&self, chat_id: &ChatId) -> Result<usize, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.messages.get(chat_id).map_or(0, |m| m.len()))
    }
}
