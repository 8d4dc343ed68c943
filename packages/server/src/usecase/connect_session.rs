//! UseCase: transport connection arrival.
//!
//! Validates that the chat and user exist (an invalid reference drops
//! the attempt silently, no event and no error surfaced to the client),
//! registers the connection and, on the 0→1 presence edge, publishes
//! `userConnected` to the chat. The new connection itself receives a
//! `chatJoined` snapshot with the chat and its present users.

use std::sync::Arc;

use thiserror::Error;

use agora_shared::time::get_utc_timestamp;

use crate::domain::{
    Chat, ChatId, ChatStore, ConnectionId, EventPusher, PusherChannel, StoreError, Timestamp,
    User, UserId,
};
use crate::infrastructure::dto::websocket::{self as events, EventType, UserDto};
use crate::realtime::{BroadcastRouter, ConnectionRegistry, PresenceTransition};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectSessionError {
    #[error("chat not found")]
    UnknownChat,
    #[error("user not found")]
    UnknownUser,
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Accepted session, returned to the transport handler.
#[derive(Debug, Clone)]
pub struct AcceptedSession {
    pub chat: Chat,
    pub user: User,
}

/// Connection arrival usecase.
pub struct ConnectSessionUseCase {
    store: Arc<dyn ChatStore>,
    registry: Arc<ConnectionRegistry>,
    pusher: Arc<dyn EventPusher>,
    router: Arc<BroadcastRouter>,
}

impl ConnectSessionUseCase {
    pub fn new(
        store: Arc<dyn ChatStore>,
        registry: Arc<ConnectionRegistry>,
        pusher: Arc<dyn EventPusher>,
        router: Arc<BroadcastRouter>,
    ) -> Self {
        Self {
            store,
            registry,
            pusher,
            router,
        }
    }

    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        chat_id: ChatId,
        user_id: UserId,
        sender: PusherChannel,
    ) -> Result<AcceptedSession, ConnectSessionError> {
        // Store lookups happen before the registry's critical section.
        let Some(chat) = self.store.find_chat(&chat_id).await? else {
            return Err(ConnectSessionError::UnknownChat);
        };
        let Some(user) = self.store.find_user(&user_id).await? else {
            return Err(ConnectSessionError::UnknownUser);
        };

        // Sender first, so the arrival broadcast can reach this
        // connection too.
        self.pusher
            .register_connection(connection_id.clone(), sender)
            .await;
        let transition = self.registry.register(
            connection_id.clone(),
            chat_id.clone(),
            user_id.clone(),
            Timestamp::new(get_utc_timestamp()),
        );

        if transition == PresenceTransition::Arrived {
            let event = events::UserConnectedEvent {
                r#type: EventType::UserConnected,
                user: (&user).into(),
            };
            self.router.publish(&chat_id, &events::to_json(&event)).await;
            tracing::info!(
                "User '{}' arrived in chat '{}'",
                user.display_name.as_str(),
                chat.name.as_str()
            );
        }

        // Snapshot for the newcomer: the chat and who is present now.
        let snapshot = events::ChatJoinedEvent {
            r#type: EventType::ChatJoined,
            chat: (&chat).into(),
            present: self.present_user_dtos(&chat_id).await?,
        };
        if let Err(e) = self
            .pusher
            .push_to(&connection_id, &events::to_json(&snapshot))
            .await
        {
            tracing::warn!("Failed to send join snapshot to '{}': {}", connection_id, e);
        }

        Ok(AcceptedSession { chat, user })
    }

    async fn present_user_dtos(
        &self,
        chat_id: &ChatId,
    ) -> Result<Vec<UserDto>, ConnectSessionError> {
        let mut dtos = Vec::new();
        for user_id in self.registry.present_users(chat_id) {
            if let Some(user) = self.store.find_user(&user_id).await? {
                dtos.push((&user).into());
            }
        }
        Ok(dtos)
    }
}
