//! HTTP and WebSocket endpoint handlers.

mod http;
mod websocket;

pub use http::{
    create_chat, health_check, list_chat_messages, list_chat_users, list_chats, login_user,
    post_message, register_user, signal_typing,
};
pub use websocket::websocket_handler;
