//! Infrastructure layer: concrete store and pusher implementations
//! plus the serde DTOs spoken over the wire.

pub mod dto;
pub mod pusher;
pub mod store;
