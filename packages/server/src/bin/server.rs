//! Multi-room chat server with live presence and typing indicators.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin agora-server
//! cargo run --bin agora-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;
use std::time::Duration;

use agora_server::{
    domain::Timestamp,
    infrastructure::{pusher::WebSocketEventPusher, store::InMemoryChatStore},
    realtime::{BroadcastRouter, ConnectionRegistry, TypingTracker, typing::DEFAULT_TYPING_WINDOW},
    ui::{Server, state::AppState},
    usecase::{
        ConnectSessionUseCase, CreateChatUseCase, DisconnectSessionUseCase,
        EnsureGeneralChatUseCase, ListChatMessagesUseCase, ListChatUsersUseCase, ListChatsUseCase,
        LoginUserUseCase, PostMessageUseCase, RegisterUserUseCase, RetentionSweepUseCase,
        SignalTypingUseCase, signal_typing::spawn_expiry_publisher,
    },
};
use agora_shared::{logger::setup_logger, time::get_utc_timestamp};
use clap::Parser;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Parser, Debug)]
#[command(name = "agora-server")]
#[command(about = "Multi-room chat server with presence and typing indicators", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Message retention window in days
    #[arg(long, default_value = "14")]
    retention_days: u32,

    /// Typing indicator expiry window in seconds
    #[arg(long, default_value_t = DEFAULT_TYPING_WINDOW.as_secs())]
    typing_window_secs: u64,

    /// Interval between retention sweeps in seconds
    #[arg(long, default_value = "86400")]
    sweep_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("agora-server", env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Store
    // 2. EventPusher
    // 3. Live state (registry, typing, router)
    // 4. UseCases
    // 5. AppState / Server

    // 1. Create Store (in-memory database)
    let store = Arc::new(InMemoryChatStore::new());

    // 2. Create EventPusher (WebSocket implementation)
    let pusher = Arc::new(WebSocketEventPusher::new());

    // 3. Create live state
    let registry = Arc::new(ConnectionRegistry::new());
    let (typing, expired_rx) =
        TypingTracker::new(Duration::from_secs(args.typing_window_secs));
    let typing = Arc::new(typing);
    let router = Arc::new(BroadcastRouter::new(registry.clone(), pusher.clone()));

    // 4. Create UseCases
    let register_user_usecase = Arc::new(RegisterUserUseCase::new(store.clone()));
    let login_user_usecase = Arc::new(LoginUserUseCase::new(store.clone()));
    let list_chats_usecase = Arc::new(ListChatsUseCase::new(store.clone()));
    let create_chat_usecase = Arc::new(CreateChatUseCase::new(store.clone(), router.clone()));
    let list_chat_users_usecase =
        Arc::new(ListChatUsersUseCase::new(store.clone(), registry.clone()));
    let list_chat_messages_usecase = Arc::new(ListChatMessagesUseCase::new(store.clone()));
    let post_message_usecase = Arc::new(PostMessageUseCase::new(
        store.clone(),
        registry.clone(),
        typing.clone(),
        router.clone(),
    ));
    let signal_typing_usecase = Arc::new(SignalTypingUseCase::new(
        store.clone(),
        registry.clone(),
        typing.clone(),
        router.clone(),
    ));
    let connect_session_usecase = Arc::new(ConnectSessionUseCase::new(
        store.clone(),
        registry.clone(),
        pusher.clone(),
        router.clone(),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        store.clone(),
        registry.clone(),
        typing.clone(),
        pusher.clone(),
        router.clone(),
    ));
    let retention_usecase = Arc::new(RetentionSweepUseCase::new(
        store.clone(),
        registry.clone(),
        typing.clone(),
        pusher.clone(),
        router.clone(),
    ));

    // general-chat must exist before the first request arrives
    let bootstrap = EnsureGeneralChatUseCase::new(store.clone());
    if let Err(e) = bootstrap.execute().await {
        tracing::error!("Failed to bootstrap default chat: {}", e);
        std::process::exit(1);
    }

    // Background tasks: typing expiry fan-out and the retention sweep
    spawn_expiry_publisher(expired_rx, typing.clone(), router.clone());
    spawn_retention_sweep(
        retention_usecase,
        args.retention_days,
        args.sweep_interval_secs,
    );

    // 5. Create and run the server
    let server = Server::new(AppState {
        register_user_usecase,
        login_user_usecase,
        list_chats_usecase,
        create_chat_usecase,
        list_chat_users_usecase,
        list_chat_messages_usecase,
        post_message_usecase,
        signal_typing_usecase,
        connect_session_usecase,
        disconnect_session_usecase,
    });
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn spawn_retention_sweep(
    usecase: Arc<RetentionSweepUseCase>,
    retention_days: u32,
    sweep_interval_secs: u64,
) {
    let window_millis = i64::from(retention_days) * MILLIS_PER_DAY;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(sweep_interval_secs));
        loop {
            interval.tick().await;
            let cutoff = Timestamp::new(get_utc_timestamp() - window_millis);
            if let Err(e) = usecase.execute(cutoff).await {
                tracing::error!("Retention sweep failed: {}", e);
            }
        }
    });
}
