//! Data Transfer Objects (DTOs) for the chat server.
//!
//! DTOs are organized by protocol:
//! - `websocket`: real-time event DTOs published to live connections
//! - `http`: HTTP API request/response DTOs
//!
//! Domain entities stay serde-free; conversion into DTOs is explicit.

pub mod conversion;
pub mod http;
pub mod websocket;
