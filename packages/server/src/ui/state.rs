//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::usecase::{
    ConnectSessionUseCase, CreateChatUseCase, DisconnectSessionUseCase, ListChatMessagesUseCase,
    ListChatUsersUseCase, ListChatsUseCase, LoginUserUseCase, PostMessageUseCase,
    RegisterUserUseCase, SignalTypingUseCase,
};

/// One Arc per usecase; handlers never touch the store, registry or
/// pusher directly.
pub struct AppState {
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    pub login_user_usecase: Arc<LoginUserUseCase>,
    pub list_chats_usecase: Arc<ListChatsUseCase>,
    pub create_chat_usecase: Arc<CreateChatUseCase>,
    pub list_chat_users_usecase: Arc<ListChatUsersUseCase>,
    pub list_chat_messages_usecase: Arc<ListChatMessagesUseCase>,
    pub post_message_usecase: Arc<PostMessageUseCase>,
    pub signal_typing_usecase: Arc<SignalTypingUseCase>,
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
}
