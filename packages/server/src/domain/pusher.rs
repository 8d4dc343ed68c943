//! Event pusher interface: the transport-level `send` boundary.
//!
//! The broadcast router hands serialized events to this trait and its
//! job ends there: delivery is fire-and-forget, no acknowledgment,
//! no retry, no backpressure.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// Channel used to hand outbound payloads to a connection's writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Failure pushing to a single connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushError {
    #[error("connection '{0}' not registered")]
    ConnectionNotFound(String),
    #[error("push to connection failed: {0}")]
    PushFailed(String),
}

/// Outbound event delivery, keyed by connection.
///
/// Registration of a connection's sender happens on transport connect;
/// unregistration always happens on disconnect, even on error paths.
#[async_trait]
pub trait EventPusher: Send + Sync {
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// Push a payload to one connection. Errors if the connection is
    /// unknown or its channel is closed.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), PushError>;

    /// Push a payload to every target connection. Partial failure is
    /// tolerated: closed or unknown connections are skipped.
    async fn broadcast(&self, targets: Vec<ConnectionId>, content: &str)
        -> Result<(), PushError>;
}
