//! UseCase: retention sweep.
//!
//! Deletes messages older than the cutoff, then deletes chats that
//! ended up empty and were themselves created before the cutoff.
//! `general-chat` is never deleted. A deleted chat with live
//! connections is announced with `chatDeleted` and its connections are
//! evicted. The sweep is idempotent: a second run over the same cutoff
//! deletes nothing.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{
    Chat, ChatStore, EventPusher, StoreError, Timestamp, GENERAL_CHAT_NAME,
};
use crate::infrastructure::dto::websocket::{self as events, EventType};
use crate::realtime::{BroadcastRouter, ConnectionRegistry, TypingTracker};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetentionSweepError {
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// What a single sweep removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionReport {
    pub messages_deleted: usize,
    pub chats_deleted: usize,
}

/// Retention sweep usecase, driven by the binary's interval task.
pub struct RetentionSweepUseCase {
    store: Arc<dyn ChatStore>,
    registry: Arc<ConnectionRegistry>,
    typing: Arc<TypingTracker>,
    pusher: Arc<dyn EventPusher>,
    router: Arc<BroadcastRouter>,
}

impl RetentionSweepUseCase {
    pub fn new(
        store: Arc<dyn ChatStore>,
        registry: Arc<ConnectionRegistry>,
        typing: Arc<TypingTracker>,
        pusher: Arc<dyn EventPusher>,
        router: Arc<BroadcastRouter>,
    ) -> Self {
        Self {
            store,
            registry,
            typing,
            pusher,
            router,
        }
    }

    pub async fn execute(&self, cutoff: Timestamp) -> Result<RetentionReport, RetentionSweepError> {
        let mut report = RetentionReport::default();

        for chat in self.store.list_chats().await? {
            report.messages_deleted += self
                .store
                .delete_messages_older_than(&chat.id, cutoff)
                .await?;

            if self.chat_expired(&chat, cutoff).await? {
                self.delete_chat(&chat).await?;
                report.chats_deleted += 1;
            }
        }

        if report.messages_deleted > 0 || report.chats_deleted > 0 {
            tracing::info!(
                "Retention sweep removed {} messages and {} chats",
                report.messages_deleted,
                report.chats_deleted
            );
        }
        Ok(report)
    }

    async fn chat_expired(&self, chat: &Chat, cutoff: Timestamp) -> Result<bool, StoreError> {
        if chat.name.as_str() == GENERAL_CHAT_NAME {
            return Ok(false);
        }
        if chat.created_at >= cutoff {
            return Ok(false);
        }
        Ok(self.store.count_messages(&chat.id).await? == 0)
    }

    /// Announce, evict live connections, clear typing, then delete.
    async fn delete_chat(&self, chat: &Chat) -> Result<(), StoreError> {
        let event = events::ChatDeletedEvent {
            r#type: EventType::ChatDeleted,
            chat_id: chat.id.as_str().to_string(),
        };
        self.router
            .publish(&chat.id, &events::to_json(&event))
            .await;

        for connection_id in self.registry.evict_chat(&chat.id) {
            self.pusher.unregister_connection(&connection_id).await;
        }
        self.typing.clear_chat(&chat.id);

        self.store.delete_chat(&chat.id).await?;
        tracing::info!("Chat '{}' deleted by retention", chat.name.as_str());
        Ok(())
    }
}
