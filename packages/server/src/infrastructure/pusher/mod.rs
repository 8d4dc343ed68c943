//! Event pusher backends.

pub mod websocket;

pub use websocket::WebSocketEventPusher;
