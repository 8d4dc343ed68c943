//! Multi-room chat server library.
//!
//! Tracks which users are live in which chats, deduplicates
//! multi-connection presence, manages expiring typing indicators and
//! fans events out to room-scoped WebSocket subscribers, backed by an
//! abstract durable store.

// layers
pub mod domain;
pub mod infrastructure;
pub mod realtime;
pub mod ui;
pub mod usecase;
