//! UseCase: typing indicator signals.
//!
//! Start and stop signals only touch the typing tracker and the
//! broadcast router; nothing is persisted. Every accepted signal and
//! every timer expiry triggers exactly one publish of the chat's
//! current typing-user list.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{ChatId, ChatStore, StoreError, UserId};
use crate::infrastructure::dto::websocket::{self as events, EventType};
use crate::realtime::{BroadcastRouter, ConnectionRegistry, TypingTracker};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalTypingError {
    #[error("chat not found")]
    ChatNotFound,
    #[error("user not present in chat")]
    UserNotInChat,
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Typing signal usecase. Requires live presence in the chat.
pub struct SignalTypingUseCase {
    store: Arc<dyn ChatStore>,
    registry: Arc<ConnectionRegistry>,
    typing: Arc<TypingTracker>,
    router: Arc<BroadcastRouter>,
}

impl SignalTypingUseCase {
    pub fn new(
        store: Arc<dyn ChatStore>,
        registry: Arc<ConnectionRegistry>,
        typing: Arc<TypingTracker>,
        router: Arc<BroadcastRouter>,
    ) -> Self {
        Self {
            store,
            registry,
            typing,
            router,
        }
    }

    /// Flag the user as typing in the chat.
    pub async fn execute_start(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<(), SignalTypingError> {
        self.check_gate(&chat_id, &user_id).await?;
        self.typing.start_typing(chat_id.clone(), user_id);
        publish_typing_list(&self.typing, &self.router, &chat_id).await;
        Ok(())
    }

    /// Explicitly clear the user's typing flag.
    pub async fn execute_stop(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<(), SignalTypingError> {
        self.check_gate(&chat_id, &user_id).await?;
        self.typing.stop_typing(&chat_id, &user_id);
        publish_typing_list(&self.typing, &self.router, &chat_id).await;
        Ok(())
    }

    /// Users currently typing in the chat (read-only, no publish).
    pub fn list_typing(&self, chat_id: &ChatId) -> Vec<UserId> {
        self.typing.list_typing(chat_id)
    }

    async fn check_gate(
        &self,
        chat_id: &ChatId,
        user_id: &UserId,
    ) -> Result<(), SignalTypingError> {
        if self.store.find_chat(chat_id).await?.is_none() {
            return Err(SignalTypingError::ChatNotFound);
        }
        if !self.registry.is_present(chat_id, user_id) {
            return Err(SignalTypingError::UserNotInChat);
        }
        Ok(())
    }
}

/// Publish a chat's current typing-user list to its connections.
pub(crate) async fn publish_typing_list(
    typing: &TypingTracker,
    router: &BroadcastRouter,
    chat_id: &ChatId,
) {
    let event = events::UsersTypingEvent {
        r#type: EventType::UsersTyping,
        chat_id: chat_id.as_str().to_string(),
        user_ids: typing
            .list_typing(chat_id)
            .into_iter()
            .map(UserId::into_string)
            .collect(),
    };
    router.publish(chat_id, &events::to_json(&event)).await;
}

/// Spawn the listener that turns typing-entry expirations into
/// typing-list publishes. Runs until the tracker is dropped.
pub fn spawn_expiry_publisher(
    mut expired_rx: mpsc::UnboundedReceiver<ChatId>,
    typing: Arc<TypingTracker>,
    router: Arc<BroadcastRouter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(chat_id) = expired_rx.recv().await {
            tracing::debug!("Typing entry expired in chat '{}'", chat_id);
            publish_typing_list(&typing, &router, &chat_id).await;
        }
    })
}
