//! Shared utilities for the agora chat server.

pub mod logger;
pub mod time;
