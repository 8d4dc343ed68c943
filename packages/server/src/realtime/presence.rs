//! Presence edge detection.
//!
//! Per (chat, user) the state machine is Absent → Present → Absent.
//! A user is present iff their connection count is above zero, so the
//! transitions are pure functions of the count after a registry
//! mutation. They must be evaluated inside the same critical section
//! as that mutation, otherwise two concurrent disconnects could both
//! observe the 1→0 edge.

/// Tagged result of a connection count change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceTransition {
    /// First connection for the (chat, user) pair: count went 0→1.
    Arrived,
    /// Last connection dropped: count went 1→0.
    Departed,
    /// Intermediate change (e.g. 1→2 or 2→1); no event fires.
    Unchanged,
}

/// Transition fired by adding a connection, given the count after the
/// addition.
pub fn on_connection_added(count_after: usize) -> PresenceTransition {
    if count_after == 1 {
        PresenceTransition::Arrived
    } else {
        PresenceTransition::Unchanged
    }
}

/// Transition fired by removing a connection, given the count after
/// the removal.
pub fn on_connection_removed(count_after: usize) -> PresenceTransition {
    if count_after == 0 {
        PresenceTransition::Departed
    } else {
        PresenceTransition::Unchanged
    }
}
