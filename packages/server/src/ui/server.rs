//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        create_chat, health_check, list_chat_messages, list_chat_users, list_chats, login_user,
        post_message, register_user, signal_typing, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Chat server over HTTP + WebSocket.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    pub fn new(app_state: AppState) -> Self {
        Self {
            app_state: Arc::new(app_state),
        }
    }

    /// Run the server until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified
    /// address or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Define handlers
        let app = Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/health", get(health_check))
            .route("/api/users", post(register_user))
            .route("/api/users/{user_id}", get(login_user))
            .route("/api/chats", get(list_chats).post(create_chat))
            .route("/api/chats/{chat_id}/users", get(list_chat_users))
            .route(
                "/api/chats/{chat_id}/messages",
                get(list_chat_messages).post(post_message),
            )
            .route("/api/chats/{chat_id}/typing", post(signal_typing))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
