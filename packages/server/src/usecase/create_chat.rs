//! UseCase: chat creation.
//!
//! Chat names are unique (case-sensitive exact match); a duplicate is
//! a conflict, never a second chat. Success is announced to every live
//! connection regardless of chat.

use std::sync::Arc;

use thiserror::Error;

use agora_shared::time::get_utc_timestamp;

use crate::domain::{
    Chat, ChatId, ChatName, ChatStore, StoreError, Timestamp, UserId, ValueError,
};
use crate::infrastructure::dto::websocket::{self as events, EventType};
use crate::realtime::BroadcastRouter;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateChatError {
    #[error("{0}")]
    Validation(#[from] ValueError),
    #[error("user not found")]
    UserNotFound,
    #[error("chat already exists")]
    AlreadyExists,
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Chat creation usecase.
pub struct CreateChatUseCase {
    store: Arc<dyn ChatStore>,
    router: Arc<BroadcastRouter>,
}

impl CreateChatUseCase {
    pub fn new(store: Arc<dyn ChatStore>, router: Arc<BroadcastRouter>) -> Self {
        Self { store, router }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        chat_name: String,
    ) -> Result<Chat, CreateChatError> {
        let chat_name = ChatName::new(chat_name)?;

        if self.store.find_user(&user_id).await?.is_none() {
            return Err(CreateChatError::UserNotFound);
        }
        if self
            .store
            .find_chat_by_name(chat_name.as_str())
            .await?
            .is_some()
        {
            return Err(CreateChatError::AlreadyExists);
        }

        let chat = Chat::new(
            ChatId::generate(),
            chat_name,
            Timestamp::new(get_utc_timestamp()),
        );
        self.store.save_chat(chat.clone()).await?;

        // Broadcasts fire only after persistence succeeded.
        let event = events::ChatCreatedEvent {
            r#type: EventType::ChatCreated,
            chat: (&chat).into(),
        };
        self.router.publish_global(&events::to_json(&event)).await;

        tracing::info!("Chat '{}' created", chat.name.as_str());
        Ok(chat)
    }
}
