//! Orchestration layer: one operation per module.
//!
//! Each usecase combines store reads/writes with registry, presence
//! and typing state changes and triggers the corresponding broadcasts.
//! All errors are returned as tagged results, never raised across the
//! transport boundary.

pub mod bootstrap;
pub mod connect_session;
pub mod create_chat;
pub mod disconnect_session;
pub mod list_chat_messages;
pub mod list_chat_users;
pub mod list_chats;
pub mod login_user;
pub mod post_message;
pub mod register_user;
pub mod retention;
pub mod signal_typing;

pub use bootstrap::EnsureGeneralChatUseCase;
pub use connect_session::{ConnectSessionError, ConnectSessionUseCase};
pub use create_chat::{CreateChatError, CreateChatUseCase};
pub use disconnect_session::DisconnectSessionUseCase;
pub use list_chat_messages::{ListChatMessagesError, ListChatMessagesUseCase};
pub use list_chat_users::{ListChatUsersError, ListChatUsersUseCase};
pub use list_chats::ListChatsUseCase;
pub use login_user::{LoginUserError, LoginUserUseCase};
pub use post_message::{PostMessageError, PostMessageUseCase};
pub use register_user::{RegisterUserError, RegisterUserUseCase};
pub use retention::{RetentionReport, RetentionSweepUseCase};
pub use signal_typing::{SignalTypingError, SignalTypingUseCase};
