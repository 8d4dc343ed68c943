//! Typing tracker: per-chat sets of users currently composing a
//! message, each entry bounded by an expiring timer.
//!
//! Repeated "start" signals do not reset a running timer, so worst-case
//! staleness stays bounded by the window regardless of client
//! chattiness. Expired entries are removed here and reported on a
//! channel; the orchestration layer owns publishing the refreshed
//! list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{ChatId, UserId};

/// Default expiry window for a typing entry.
pub const DEFAULT_TYPING_WINDOW: Duration = Duration::from_secs(10);

struct TypingEntry {
    /// Guards against a stale timer removing a successor entry for the
    /// same (chat, user) pair.
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct TypingInner {
    entries: HashMap<ChatId, HashMap<UserId, TypingEntry>>,
    next_generation: u64,
}

/// Tracker of who is typing in which chat.
pub struct TypingTracker {
    inner: Arc<Mutex<TypingInner>>,
    window: Duration,
    expired_tx: mpsc::UnboundedSender<ChatId>,
}

impl TypingTracker {
    /// Create a tracker with the given expiry window.
    ///
    /// The returned receiver yields the chat id of every entry removed
    /// by timeout; the consumer publishes that chat's refreshed typing
    /// list.
    pub fn new(window: Duration) -> (Self, mpsc::UnboundedReceiver<ChatId>) {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        (
            Self {
                inner: Arc::new(Mutex::new(TypingInner::default())),
                window,
                expired_tx,
            },
            expired_rx,
        )
    }

    /// Flag a user as typing. Returns `true` if a new entry was
    /// created. An existing entry is left untouched, timer included.
    pub fn start_typing(&self, chat_id: ChatId, user_id: UserId) -> bool {
        let mut inner = self.inner.lock().expect("typing lock poisoned");

        let chat_entries = inner.entries.entry(chat_id.clone()).or_default();
        if chat_entries.contains_key(&user_id) {
            return false;
        }

        let generation = inner.next_generation;
        inner.next_generation += 1;

        let timer = spawn_expiry_timer(
            self.inner.clone(),
            self.expired_tx.clone(),
            self.window,
            chat_id.clone(),
            user_id.clone(),
            generation,
        );
        inner
            .entries
            .entry(chat_id)
            .or_default()
            .insert(user_id, TypingEntry { generation, timer });

        true
    }

    /// Remove a user's typing entry and cancel its timer. Returns
    /// `true` if an entry existed. No expiry event is emitted.
    pub fn stop_typing(&self, chat_id: &ChatId, user_id: &UserId) -> bool {
        let mut inner = self.inner.lock().expect("typing lock poisoned");

        let Some(chat_entries) = inner.entries.get_mut(chat_id) else {
            return false;
        };
        let Some(entry) = chat_entries.remove(user_id) else {
            return false;
        };
        if chat_entries.is_empty() {
            inner.entries.remove(chat_id);
        }
        entry.timer.abort();

        true
    }

    /// Users currently flagged as typing in a chat.
    ///
    /// The count carries the consumer's formatting contract (singular
    /// for 1, joined list for 2–3, generic form above 3), so an entry
    /// removed by timeout is never visible here.
    pub fn list_typing(&self, chat_id: &ChatId) -> Vec<UserId> {
        let inner = self.inner.lock().expect("typing lock poisoned");
        let mut users: Vec<UserId> = inner
            .entries
            .get(chat_id)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        users.sort();
        users
    }

    /// Drop all typing state for a chat, cancelling timers. Used when
    /// the retention sweep deletes a chat.
    pub fn clear_chat(&self, chat_id: &ChatId) {
        let mut inner = self.inner.lock().expect("typing lock poisoned");
        if let Some(entries) = inner.entries.remove(chat_id) {
            for entry in entries.into_values() {
                entry.timer.abort();
            }
        }
    }
}

fn spawn_expiry_timer(
    inner: Arc<Mutex<TypingInner>>,
    expired_tx: mpsc::UnboundedSender<ChatId>,
    window: Duration,
    chat_id: ChatId,
    user_id: UserId,
    generation: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(window).await;

        let removed = {
            let mut inner = inner.lock().expect("typing lock poisoned");
            let Some(chat_entries) = inner.entries.get_mut(&chat_id) else {
                return;
            };
            let matches = chat_entries
                .get(&user_id)
                .is_some_and(|entry| entry.generation == generation);
            if matches {
                chat_entries.remove(&user_id);
                if chat_entries.is_empty() {
                    inner.entries.remove(&chat_id);
                }
            }
            matches
        };

        if removed {
            // Receiver gone means shutdown; nothing left to notify.
            let _ = expired_tx.send(chat_id);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat() -> ChatId {
        ChatId::new("chat-1".to_string())
    }

    fn user(name: &str) -> UserId {
        UserId::new(name.to_string())
    }

    #[tokio::test]
    async fn test_start_typing_creates_entry() {
        // given:
        let (tracker, _rx) = TypingTracker::new(Duration::from_secs(10));

        // when:
        let created = tracker.start_typing(chat(), user("alice"));

        // then:
        assert!(created);
        assert_eq!(tracker.list_typing(&chat()), vec![user("alice")]);
    }

    #[tokio::test]
    async fn test_repeated_start_does_not_duplicate_entry() {
        // given: alice is already typing
        let (tracker, _rx) = TypingTracker::new(Duration::from_secs(10));
        tracker.start_typing(chat(), user("alice"));

        // when: the client signals again
        let created = tracker.start_typing(chat(), user("alice"));

        // then: existing entry and timer are left untouched
        assert!(!created);
        assert_eq!(tracker.list_typing(&chat()), vec![user("alice")]);
    }

    #[tokio::test]
    async fn test_stop_typing_removes_entry_and_cancels_timer() {
        // given:
        let (tracker, mut rx) = TypingTracker::new(Duration::from_millis(50));
        tracker.start_typing(chat(), user("alice"));

        // when:
        let removed = tracker.stop_typing(&chat(), &user("alice"));

        // then: entry gone and the cancelled timer never reports expiry
        assert!(removed);
        assert!(tracker.list_typing(&chat()).is_empty());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stop_typing_absent_entry_is_noop() {
        // given:
        let (tracker, _rx) = TypingTracker::new(Duration::from_secs(10));

        // when:
        let removed = tracker.stop_typing(&chat(), &user("alice"));

        // then:
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_entry_expires_and_reports_chat() {
        // given: a short window
        let (tracker, mut rx) = TypingTracker::new(Duration::from_millis(30));
        tracker.start_typing(chat(), user("alice"));

        // when: the window elapses
        let expired = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("expiry should fire within the timeout");

        // then: the entry is gone before the notification is consumed
        assert_eq!(expired, Some(chat()));
        assert!(tracker.list_typing(&chat()).is_empty());
    }

    #[tokio::test]
    async fn test_restart_after_expiry_creates_fresh_entry() {
        // given: alice's first entry expired
        let (tracker, mut rx) = TypingTracker::new(Duration::from_millis(30));
        tracker.start_typing(chat(), user("alice"));
        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("expiry should fire within the timeout");

        // when: alice starts typing again
        let created = tracker.start_typing(chat(), user("alice"));

        // then:
        assert!(created);
        assert_eq!(tracker.list_typing(&chat()), vec![user("alice")]);
    }

    #[tokio::test]
    async fn test_list_typing_counts_for_formatting_thresholds() {
        // given: four users typing in the same chat
        let (tracker, _rx) = TypingTracker::new(Duration::from_secs(10));
        for name in ["alice", "bob", "carol", "dave"] {
            tracker.start_typing(chat(), user(name));
        }

        // then: the consumer sees the exact count it branches on
        assert_eq!(tracker.list_typing(&chat()).len(), 4);

        // when: one stops
        tracker.stop_typing(&chat(), &user("dave"));

        // then:
        assert_eq!(tracker.list_typing(&chat()).len(), 3);
    }

    #[tokio::test]
    async fn test_clear_chat_drops_all_entries_without_expiry_events() {
        // given:
        let (tracker, mut rx) = TypingTracker::new(Duration::from_millis(50));
        tracker.start_typing(chat(), user("alice"));
        tracker.start_typing(chat(), user("bob"));

        // when:
        tracker.clear_chat(&chat());

        // then:
        assert!(tracker.list_typing(&chat()).is_empty());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(rx.try_recv().is_err());
    }
}
