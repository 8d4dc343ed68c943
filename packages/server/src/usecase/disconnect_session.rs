//! UseCase: transport connection departure.
//!
//! Unregisters the connection. On the 1→0 presence edge the user's
//! typing entry is cleared and `userDisconnected` is published to the
//! chat. An unknown connection id is an idempotent no-op, so double
//! notifications from the transport layer are harmless.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{ChatStore, ConnectionId, EventPusher, StoreError};
use crate::infrastructure::dto::websocket::{self as events, EventType};
use crate::realtime::{BroadcastRouter, ConnectionRegistry, PresenceTransition, TypingTracker};

use super::signal_typing::publish_typing_list;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectSessionError {
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Connection departure usecase.
pub struct DisconnectSessionUseCase {
    store: Arc<dyn ChatStore>,
    registry: Arc<ConnectionRegistry>,
    typing: Arc<TypingTracker>,
    pusher: Arc<dyn EventPusher>,
    router: Arc<BroadcastRouter>,
}

impl DisconnectSessionUseCase {
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

    pub async fn execute(
        &self,
        connection_id: ConnectionId,
    ) -> Result<(), DisconnectSessionError> {
        let Some(departure) = self.registry.unregister(&connection_id) else {
            tracing::debug!("Unknown connection '{}' on disconnect", connection_id);
            return Ok(());
        };
        self.pusher.unregister_connection(&connection_id).await;

        if departure.transition != PresenceTransition::Departed {
            return Ok(());
        }

        // Last connection gone: the user is no longer in the chat, so
        // any typing entry must not outlive the presence.
        if self.typing.stop_typing(&departure.chat_id, &departure.user_id) {
            publish_typing_list(&self.typing, &self.router, &departure.chat_id).await;
        }

        match self.store.find_user(&departure.user_id).await? {
            Some(user) => {
                let event = events::UserDisconnectedEvent {
                    r#type: EventType::UserDisconnected,
                    user: (&user).into(),
                };
                self.router
                    .publish(&departure.chat_id, &events::to_json(&event))
                    .await;
                tracing::info!(
                    "User '{}' departed from chat '{}'",
                    user.display_name.as_str(),
                    departure.chat_id
                );
            }
            None => {
                tracing::warn!("Departed user '{}' missing from store", departure.user_id)
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Chat, ChatId, ChatName, DisplayName, Tag, Timestamp, User, UserId,
    };
    use crate::infrastructure::store::InMemoryChatStore;
    use crate::usecase::test_support::RecordingPusher;
    use std::time::Duration;

    struct Fixture {
        store: Arc<InMemoryChatStore>,
        registry: Arc<ConnectionRegistry>,
        typing: Arc<TypingTracker>,
        pusher: Arc<RecordingPusher>,
        usecase: DisconnectSessionUseCase,
        chat_id: ChatId,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryChatStore::new());
        let chat_id = ChatId::new("c1".to_string());
        store
            .save_chat(Chat::new(
                chat_id.clone(),
                ChatName::new("general-chat".to_string()).unwrap(),
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
        let registry = Arc::new(ConnectionRegistry::new());
        let (typing, _expired_rx) = TypingTracker::new(Duration::from_secs(10));
        let typing = Arc::new(typing);
        let pusher = Arc::new(RecordingPusher::new());
        let router = Arc::new(BroadcastRouter::new(registry.clone(), pusher.clone()));
        let usecase = DisconnectSessionUseCase::new(
            store.clone(),
            registry.clone(),
            typing.clone(),
            pusher.clone(),
            router,
        );
        Fixture {
            store,
            registry,
            typing,
            pusher,
            usecase,
            chat_id,
        }
    }

    async fn connect_user(f: &Fixture, conn: &str, name: &str) -> UserId {
        let user_id = UserId::new(name.to_string());
        f.store
            .save_user(User::new(
                user_id.clone(),
                DisplayName::new(name.to_string()).unwrap(),
                Tag::FIRST,
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
        f.registry.register(
            ConnectionId::new(conn.to_string()),
            f.chat_id.clone(),
            user_id.clone(),
            Timestamp::new(1000),
        );
        user_id
    }

    #[tokio::test]
    async fn test_last_connection_publishes_user_disconnected() {
        // given: alice with one connection
        let f = fixture().await;
        let alice = connect_user(&f, "conn1", "alice").await;

        // when:
        f.usecase
            .execute(ConnectionId::new("conn1".to_string()))
            .await
            .unwrap();

        // then: departed, exactly one userDisconnected published
        assert!(!f.registry.is_present(&f.chat_id, &alice));
        let published = f.pusher.broadcasts_of_type("userDisconnected");
        assert_eq!(published.len(), 1);
        assert!(published[0].contains("alice"));
    }

    #[tokio::test]
    async fn test_remaining_tab_suppresses_departure() {
        // given: alice with two connections
        let f = fixture().await;
        let alice = connect_user(&f, "conn1", "alice").await;
        f.registry.register(
            ConnectionId::new("conn2".to_string()),
            f.chat_id.clone(),
            alice.clone(),
            Timestamp::new(1000),
        );

        // when: one tab closes
        f.usecase
            .execute(ConnectionId::new("conn1".to_string()))
            .await
            .unwrap();

        // then: still present, no departure event
        assert!(f.registry.is_present(&f.chat_id, &alice));
        assert!(f.pusher.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn test_departure_clears_typing_entry() {
        // given: alice typing on her only connection
        let f = fixture().await;
        let alice = connect_user(&f, "conn1", "alice").await;
        f.typing.start_typing(f.chat_id.clone(), alice.clone());

        // when:
        f.usecase
            .execute(ConnectionId::new("conn1".to_string()))
            .await
            .unwrap();

        // then: typing cleared, refreshed list published before the
        // departure event
        assert!(f.typing.list_typing(&f.chat_id).is_empty());
        let payloads = f.pusher.broadcast_payloads();
        assert!(payloads[0].contains(r#""type":"usersTyping""#));
        assert!(payloads[1].contains(r#""type":"userDisconnected""#));
    }

    #[tokio::test]
    async fn test_unknown_connection_is_noop() {
        // given:
        let f = fixture().await;

        // when: disconnect for a connection that was never registered
        f.usecase
            .execute(ConnectionId::new("ghost".to_string()))
            .await
            .unwrap();

        // then:
        assert!(f.pusher.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn test_double_disconnect_publishes_once() {
        // given: alice connected once
        let f = fixture().await;
        connect_user(&f, "conn1", "alice").await;

        // when: the transport reports the close twice
        f.usecase
            .execute(ConnectionId::new("conn1".to_string()))
            .await
            .unwrap();
        f.usecase
            .execute(ConnectionId::new("conn1".to_string()))
            .await
            .unwrap();

        // then:
        assert_eq!(f.pusher.broadcasts_of_type("userDisconnected").len(), 1);
    }
}
