//! UseCase: post a message to a chat.
//!
//! Posting is gated on live presence, not on any stored membership:
//! "chat users" are the currently connected users. The flow is:
//! persist, clear the poster's typing entry (typing-list publish),
//! publish `messagePosted`, then the legacy single-user
//! `userStoppedTyping` signal. A store failure aborts the whole
//! operation before any broadcast.

use std::sync::Arc;

use thiserror::Error;

use agora_shared::time::get_utc_timestamp;

use crate::domain::{
    ChatId, ChatMessage, ChatStore, MessageContent, MessageId, StoreError, Timestamp, UserId,
    ValueError,
};
use crate::infrastructure::dto::websocket::{self as events, EventType};
use crate::realtime::{BroadcastRouter, ConnectionRegistry, TypingTracker};

use super::signal_typing::publish_typing_list;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostMessageError {
    #[error("{0}")]
    Validation(#[from] ValueError),
    #[error("chat not found")]
    ChatNotFound,
    #[error("user not present in chat")]
    UserNotInChat,
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Message posting usecase.
pub struct PostMessageUseCase {
    store: Arc<dyn ChatStore>,
    registry: Arc<ConnectionRegistry>,
    typing: Arc<TypingTracker>,
    router: Arc<BroadcastRouter>,
}

impl PostMessageUseCase {
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

    pub async fn execute(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        content: String,
    ) -> Result<ChatMessage, PostMessageError> {
        let content = MessageContent::new(content)?;

        if self.store.find_chat(&chat_id).await?.is_none() {
            return Err(PostMessageError::ChatNotFound);
        }
        let Some(user) = self.store.find_user(&user_id).await? else {
            return Err(PostMessageError::UserNotInChat);
        };
        if !self.registry.is_present(&chat_id, &user_id) {
            return Err(PostMessageError::UserNotInChat);
        }

        let message = ChatMessage::new(
            MessageId::generate(),
            chat_id.clone(),
            user_id.clone(),
            content,
            Timestamp::new(get_utc_timestamp()),
        );
        self.store.save_message(message.clone()).await?;

        // Persistence succeeded; broadcasts may fire. The poster's
        // typing entry clears first so the list update precedes the
        // message itself.
        self.typing.stop_typing(&chat_id, &user_id);
        publish_typing_list(&self.typing, &self.router, &chat_id).await;

        let posted = events::MessagePostedEvent {
            r#type: EventType::MessagePosted,
            message: (&message).into(),
        };
        self.router
            .publish(&chat_id, &events::to_json(&posted))
            .await;

        let stopped = events::UserStoppedTypingEvent {
            r#type: EventType::UserStoppedTyping,
            user: (&user).into(),
        };
        self.router
            .publish(&chat_id, &events::to_json(&stopped))
            .await;

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::MockChatStore;
    use crate::domain::{
        Chat, ChatName, ConnectionId, DisplayName, Tag, User,
    };
    use crate::infrastructure::store::InMemoryChatStore;
    use crate::usecase::test_support::RecordingPusher;
    use std::time::Duration;

    struct Fixture {
        store: Arc<InMemoryChatStore>,
        registry: Arc<ConnectionRegistry>,
        typing: Arc<TypingTracker>,
        pusher: Arc<RecordingPusher>,
        usecase: PostMessageUseCase,
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
        let usecase = PostMessageUseCase::new(
            store.clone(),
            registry.clone(),
            typing.clone(),
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
    async fn test_post_message_persists_and_publishes_in_order() {
        // given: alice present
        let f = fixture().await;
        let alice = connect_user(&f, "conn1", "alice").await;

        // when:
        let message = f
            .usecase
            .execute(f.chat_id.clone(), alice, "hello".to_string())
            .await
            .unwrap();

        // then: persisted
        let stored = f.store.list_messages(&f.chat_id).await.unwrap();
        assert_eq!(stored, vec![message]);

        // then: causal publish order within the chat
        let types: Vec<String> = f
            .pusher
            .broadcast_payloads()
            .iter()
            .map(|payload| {
                serde_json::from_str::<serde_json::Value>(payload).unwrap()["type"]
                    .as_str()
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(
            types,
            vec!["usersTyping", "messagePosted", "userStoppedTyping"]
        );
    }

    #[tokio::test]
    async fn test_post_clears_typing_entry() {
        // given: alice typing
        let f = fixture().await;
        let alice = connect_user(&f, "conn1", "alice").await;
        f.typing.start_typing(f.chat_id.clone(), alice.clone());

        // when:
        f.usecase
            .execute(f.chat_id.clone(), alice.clone(), "hi".to_string())
            .await
            .unwrap();

        // then: alice never appears in the typing list again
        assert!(!f.typing.list_typing(&f.chat_id).contains(&alice));
    }

    #[tokio::test]
    async fn test_post_requires_live_presence() {
        // given: bob exists in the store but holds no connection
        let f = fixture().await;
        let bob = UserId::new("bob".to_string());
        f.store
            .save_user(User::new(
                bob.clone(),
                DisplayName::new("bob".to_string()).unwrap(),
                Tag::FIRST,
                Timestamp::new(1000),
            ))
            .await
            .unwrap();

        // when:
        let result = f
            .usecase
            .execute(f.chat_id.clone(), bob, "hello".to_string())
            .await;

        // then: store membership alone does not allow posting
        assert_eq!(result, Err(PostMessageError::UserNotInChat));
        assert!(f.pusher.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn test_post_empty_content_is_validation_error() {
        // given:
        let f = fixture().await;
        let alice = connect_user(&f, "conn1", "alice").await;

        // when:
        let result = f
            .usecase
            .execute(f.chat_id.clone(), alice, " ".to_string())
            .await;

        // then:
        assert!(matches!(result, Err(PostMessageError::Validation(_))));
    }

    #[tokio::test]
    async fn test_post_to_unknown_chat_is_not_found() {
        // given:
        let f = fixture().await;
        let alice = connect_user(&f, "conn1", "alice").await;

        // when:
        let result = f
            .usecase
            .execute(
                ChatId::new("ghost".to_string()),
                alice,
                "hello".to_string(),
            )
            .await;

        // then:
        assert_eq!(result, Err(PostMessageError::ChatNotFound));
    }

    #[tokio::test]
    async fn test_store_failure_aborts_without_broadcast() {
        // given: a store that accepts reads but fails the write
        let chat_id = ChatId::new("c1".to_string());
        let user_id = UserId::new("alice".to_string());
        let mut store = MockChatStore::new();
        let chat = Chat::new(
            chat_id.clone(),
            ChatName::new("general-chat".to_string()).unwrap(),
            Timestamp::new(1000),
        );
        let user = User::new(
            user_id.clone(),
            DisplayName::new("alice".to_string()).unwrap(),
            Tag::FIRST,
            Timestamp::new(1000),
        );
        store
            .expect_find_chat()
            .returning(move |_| Ok(Some(chat.clone())));
        store
            .expect_find_user()
            .returning(move |_| Ok(Some(user.clone())));
        store
            .expect_save_message()
            .returning(|_| Err(StoreError::Backend("disk gone".to_string())));

        let registry = Arc::new(ConnectionRegistry::new());
        registry.register(
            ConnectionId::new("conn1".to_string()),
            chat_id.clone(),
            user_id.clone(),
            Timestamp::new(1000),
        );
        let (typing, _expired_rx) = TypingTracker::new(Duration::from_secs(10));
        let typing = Arc::new(typing);
        let pusher = Arc::new(RecordingPusher::new());
        let router = Arc::new(BroadcastRouter::new(registry.clone(), pusher.clone()));
        let usecase =
            PostMessageUseCase::new(Arc::new(store), registry, typing.clone(), router);

        // typing entry present before the failing post
        typing.start_typing(chat_id.clone(), user_id.clone());

        // when:
        let result = usecase
            .execute(chat_id.clone(), user_id.clone(), "hello".to_string())
            .await;

        // then: no broadcast fired, typing entry intact
        assert!(matches!(result, Err(PostMessageError::StoreFailure(_))));
        assert!(pusher.broadcasts().is_empty());
        assert!(typing.list_typing(&chat_id).contains(&user_id));
    }
}
