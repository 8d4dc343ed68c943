//! Broadcast router: room-scoped publish over the event pusher.
//!
//! `publish` takes a snapshot of the chat's connections at the moment
//! of the call; connections joining or leaving during delivery are not
//! guaranteed to be included or excluded beyond that snapshot.
//! Delivery is fire-and-forget: the router's job ends at handoff to
//! the transport layer.

use std::sync::Arc;

use crate::domain::{ChatId, EventPusher};

use super::registry::ConnectionRegistry;

/// Room-scoped event fan-out.
pub struct BroadcastRouter {
    registry: Arc<ConnectionRegistry>,
    pusher: Arc<dyn EventPusher>,
}

impl BroadcastRouter {
    pub fn new(registry: Arc<ConnectionRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// Deliver a serialized event to every connection joined to the
    /// chat. Partial delivery failure is tolerated by the pusher.
    pub async fn publish(&self, chat_id: &ChatId, payload: &str) {
        let targets = self.registry.connections_for_chat(chat_id);
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.pusher.broadcast(targets, payload).await {
            tracing::warn!("Failed to publish to chat '{}': {}", chat_id, e);
        }
    }

    /// Deliver a serialized event to every live connection regardless
    /// of chat. Used for "new chat created" announcements.
    pub async fn publish_global(&self, payload: &str) {
        let targets = self.registry.all_connections();
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.pusher.broadcast(targets, payload).await {
            tracing::warn!("Failed to publish globally: {}", e);
        }
    }
}
