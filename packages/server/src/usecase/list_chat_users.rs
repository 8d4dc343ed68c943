//! UseCase: list the users of a chat.
//!
//! "Chat users" means currently connected users: the authoritative
//! membership is the live presence set, not anything stored durably.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{ChatId, ChatStore, StoreError, User};
use crate::realtime::ConnectionRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListChatUsersError {
    #[error("chat not found")]
    ChatNotFound,
    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

/// Lists present users sorted by (display name case-insensitive, tag).
pub struct ListChatUsersUseCase {
    store: Arc<dyn ChatStore>,
    registry: Arc<ConnectionRegistry>,
}

impl ListChatUsersUseCase {
    pub fn new(store: Arc<dyn ChatStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    pub async fn execute(&self, chat_id: ChatId) -> Result<Vec<User>, ListChatUsersError> {
        if self.store.find_chat(&chat_id).await?.is_none() {
            return Err(ListChatUsersError::ChatNotFound);
        }

        let present = self.registry.present_users(&chat_id);
        let mut users = Vec::with_capacity(present.len());
        for user_id in present {
            match self.store.find_user(&user_id).await? {
                Some(user) => users.push(user),
                // Presence outliving the stored user is a stale-state
                // symptom; the listing degrades rather than fails.
                None => tracing::warn!("Present user '{}' missing from store", user_id),
            }
        }

        users.sort_by(|a, b| {
            let a_key = (a.display_name.as_str().to_lowercase(), a.tag);
            let b_key = (b.display_name.as_str().to_lowercase(), b.tag);
            a_key.cmp(&b_key)
        });
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Chat, ChatName, ConnectionId, DisplayName, Tag, Timestamp, UserId,
    };
    use crate::infrastructure::store::InMemoryChatStore;

    async fn seed_chat(store: &InMemoryChatStore, id: &str) -> ChatId {
        let chat_id = ChatId::new(id.to_string());
        store
            .save_chat(Chat::new(
                chat_id.clone(),
                ChatName::new(format!("chat-{id}")).unwrap(),
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
        chat_id
    }

    async fn seed_user(store: &InMemoryChatStore, id: &str, name: &str, tag: u32) -> UserId {
        let user_id = UserId::new(id.to_string());
        store
            .save_user(User::new(
                user_id.clone(),
                DisplayName::new(name.to_string()).unwrap(),
                Tag::new(tag),
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
        user_id
    }

    #[tokio::test]
    async fn test_lists_only_present_users_sorted() {
        // given: three stored users, two of them connected
        let store = Arc::new(InMemoryChatStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let chat_id = seed_chat(&store, "c1").await;
        let bob = seed_user(&store, "u1", "Bob", 2).await;
        let alice = seed_user(&store, "u2", "alice", 1).await;
        seed_user(&store, "u3", "carol", 3).await;
        registry.register(
            ConnectionId::new("conn1".to_string()),
            chat_id.clone(),
            bob,
            Timestamp::new(1000),
        );
        registry.register(
            ConnectionId::new("conn2".to_string()),
            chat_id.clone(),
            alice,
            Timestamp::new(1000),
        );
        let usecase = ListChatUsersUseCase::new(store, registry);

        // when:
        let users = usecase.execute(chat_id).await.unwrap();

        // then: carol absent, case-insensitive name order
        let names: Vec<&str> = users.iter().map(|u| u.display_name.as_str()).collect();
        assert_eq!(names, vec!["alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_duplicate_names_ordered_by_tag() {
        // given: two connected users sharing a display name
        let store = Arc::new(InMemoryChatStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let chat_id = seed_chat(&store, "c1").await;
        let second = seed_user(&store, "u1", "alice", 2).await;
        let first = seed_user(&store, "u2", "alice", 1).await;
        registry.register(
            ConnectionId::new("conn1".to_string()),
            chat_id.clone(),
            second,
            Timestamp::new(1000),
        );
        registry.register(
            ConnectionId::new("conn2".to_string()),
            chat_id.clone(),
            first,
            Timestamp::new(1000),
        );
        let usecase = ListChatUsersUseCase::new(store, registry);

        // when:
        let users = usecase.execute(chat_id).await.unwrap();

        // then: ascending tag breaks the tie
        let tags: Vec<u32> = users.iter().map(|u| u.tag.value()).collect();
        assert_eq!(tags, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_unknown_chat_is_not_found() {
        // given:
        let store = Arc::new(InMemoryChatStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let usecase = ListChatUsersUseCase::new(store, registry);

        // when:
        let result = usecase.execute(ChatId::new("ghost".to_string())).await;

        // then:
        assert_eq!(result, Err(ListChatUsersError::ChatNotFound));
    }

    #[tokio::test]
    async fn test_empty_chat_lists_no_users() {
        // given: a chat with no connections
        let store = Arc::new(InMemoryChatStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let chat_id = seed_chat(&store, "c1").await;
        let usecase = ListChatUsersUseCase::new(store, registry);

        // when:
        let users = usecase.execute(chat_id).await.unwrap();

        // then:
        assert!(users.is_empty());
    }
}
