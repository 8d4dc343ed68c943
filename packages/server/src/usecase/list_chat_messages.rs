//! UseCase: list a chat's messages, chronological.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{ChatId, ChatMessage, ChatStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListChatMessagesError {
    #[error("chat not found")]
    ChatNotFound,
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

pub struct ListChatMessagesUseCase {
    store: Arc<dyn ChatStore>,
}

impl ListChatMessagesUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    pub async fn execute(
        &self,
        chat_id: ChatId,
    ) -> Result<Vec<ChatMessage>, ListChatMessagesError> {
        if self.store.find_chat(&chat_id).await?.is_none() {
            return Err(ListChatMessagesError::ChatNotFound);
        }
        Ok(self.store.list_messages(&chat_id).await?)
    }
}
