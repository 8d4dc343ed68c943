//! Connection registry: maps live transport connections to
//! (chat, user) pairs.
//!
//! One mutual-exclusion domain guards all maps. The presence edge for
//! a mutation is computed from the post-mutation count inside that
//! lock, which makes edge detection linearizable with the mutation
//! itself. No method suspends.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::domain::{ChatId, ConnectionId, Timestamp, UserId};

use super::presence::{self, PresenceTransition};

/// One live connection.
#[derive(Debug, Clone)]
struct ConnectionEntry {
    chat_id: ChatId,
    user_id: UserId,
    #[allow(dead_code)]
    joined_at: Timestamp,
}

/// Result of unregistering a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub transition: PresenceTransition,
}

#[derive(Default)]
struct RegistryInner {
    connections: HashMap<ConnectionId, ConnectionEntry>,
    by_chat: HashMap<ChatId, HashSet<ConnectionId>>,
    counts: HashMap<(ChatId, UserId), usize>,
}

/// Registry of live connections, shared behind `Arc`.
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: Mutex<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and report the presence transition.
    ///
    /// The caller is responsible for having validated that the chat
    /// and user exist; an unvalidated register is a caller bug, not a
    /// runtime fault the registry detects.
    pub fn register(
        &self,
        connection_id: ConnectionId,
        chat_id: ChatId,
        user_id: UserId,
        joined_at: Timestamp,
    ) -> PresenceTransition {
        let mut inner = self.inner.lock().expect("registry lock poisoned");

        inner
            .by_chat
            .entry(chat_id.clone())
            .or_default()
            .insert(connection_id.clone());
        let count = inner
            .counts
            .entry((chat_id.clone(), user_id.clone()))
            .or_insert(0);
        *count += 1;
        let count_after = *count;
        inner.connections.insert(
            connection_id,
            ConnectionEntry {
                chat_id,
                user_id,
                joined_at,
            },
        );

        presence::on_connection_added(count_after)
    }

    /// Unregister a connection. Idempotent: returns `None` for an
    /// unknown connection, so a disconnect handler may run twice.
    pub fn unregister(&self, connection_id: &ConnectionId) -> Option<Departure> {
        let mut inner = self.inner.lock().expect("registry lock poisoned");

        let entry = inner.connections.remove(connection_id)?;
        if let Some(set) = inner.by_chat.get_mut(&entry.chat_id) {
            set.remove(connection_id);
            if set.is_empty() {
                inner.by_chat.remove(&entry.chat_id);
            }
        }

        let key = (entry.chat_id.clone(), entry.user_id.clone());
        let count_after = match inner.counts.get_mut(&key) {
            Some(count) => {
                *count = count.saturating_sub(1);
                let after = *count;
                if after == 0 {
                    inner.counts.remove(&key);
                }
                after
            }
            None => 0,
        };

        Some(Departure {
            chat_id: entry.chat_id,
            user_id: entry.user_id,
            transition: presence::on_connection_removed(count_after),
        })
    }

    /// Snapshot of all connections joined to a chat.
    pub fn connections_for_chat(&self, chat_id: &ChatId) -> Vec<ConnectionId> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        inner
            .by_chat
            .get(chat_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of every live connection regardless of chat.
    pub fn all_connections(&self) -> Vec<ConnectionId> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        inner.connections.keys().cloned().collect()
    }

    /// Number of live connections for a (chat, user) pair.
    pub fn count_for_chat_user(&self, chat_id: &ChatId, user_id: &UserId) -> usize {
        let inner = self.inner.lock().expect("registry lock poisoned");
        inner
            .counts
            .get(&(chat_id.clone(), user_id.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Whether the user holds at least one live connection to the chat.
    pub fn is_present(&self, chat_id: &ChatId, user_id: &UserId) -> bool {
        self.count_for_chat_user(chat_id, user_id) > 0
    }

    /// Deduplicated set of users currently present in a chat.
    pub fn present_users(&self, chat_id: &ChatId) -> Vec<UserId> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        let mut users: Vec<UserId> = inner
            .counts
            .keys()
            .filter(|(chat, _)| chat == chat_id)
            .map(|(_, user)| user.clone())
            .collect();
        users.sort();
        users
    }

    /// Remove every connection referencing a chat, returning the
    /// evicted connections. Used by the retention sweep before it
    /// deletes a chat still carrying live subscribers.
    pub fn evict_chat(&self, chat_id: &ChatId) -> Vec<ConnectionId> {
        let mut inner = self.inner.lock().expect("registry lock poisoned");

        let evicted: Vec<ConnectionId> = inner
            .by_chat
            .remove(chat_id)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default();
        for connection_id in &evicted {
            inner.connections.remove(connection_id);
        }
        inner.counts.retain(|(chat, _), _| chat != chat_id);

        evicted
    }
}
