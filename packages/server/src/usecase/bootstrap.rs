//! UseCase: default chat bootstrap.
//!
//! `general-chat` always exists. The binary runs this once before the
//! server binds; re-running is a no-op so restarts never duplicate it.

use std::sync::Arc;

use thiserror::Error;

use agora_shared::time::get_utc_timestamp;

use crate::domain::{
    Chat, ChatId, ChatName, ChatStore, StoreError, Timestamp, ValueError, GENERAL_CHAT_NAME,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error("{0}")]
    Validation(#[from] ValueError),
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

pub struct EnsureGeneralChatUseCase {
    store: Arc<dyn ChatStore>,
}

impl EnsureGeneralChatUseCase {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> Result<Chat, BootstrapError> {
        if let Some(existing) = self.store.find_chat_by_name(GENERAL_CHAT_NAME).await? {
            return Ok(existing);
        }

        let chat = Chat::new(
            ChatId::generate(),
            ChatName::new(GENERAL_CHAT_NAME.to_string())?,
            Timestamp::new(get_utc_timestamp()),
        );
        self.store.save_chat(chat.clone()).await?;
        tracing::info!("Default chat '{}' created", GENERAL_CHAT_NAME);
        Ok(chat)
    }
}
