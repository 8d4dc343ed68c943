//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ChatId, ConnectionId, UserId},
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
    usecase::ConnectSessionError,
    usecase::connect_session::AcceptedSession,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub chat_id: String,
    pub user_id: String,
}

/// Validates the (chat, user) pair before the protocol upgrade so an
/// invalid connection attempt is rejected with a plain 404 instead of
/// an upgraded-then-dropped socket.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let chat_id = ChatId::new(query.chat_id);
    let user_id = UserId::new(query.user_id);
    let connection_id = ConnectionId::generate();

    // Channel carrying outbound events for this connection
    let (tx, rx) = mpsc::unbounded_channel();

    match state
        .connect_session_usecase
        .execute(connection_id.clone(), chat_id, user_id, tx)
        .await
    {
        Ok(accepted) => {
            tracing::info!(
                "Connection '{}' accepted for user '{}'",
                connection_id,
                accepted.user.display_name.as_str()
            );
            Ok(ws.on_upgrade(move |socket| {
                handle_socket(socket, state, connection_id, accepted, rx)
            }))
        }
        Err(ConnectSessionError::UnknownChat) => {
            tracing::warn!("Rejecting connection '{}': unknown chat", connection_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(ConnectSessionError::UnknownUser) => {
            tracing::warn!("Rejecting connection '{}': unknown user", connection_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(ConnectSessionError::StoreFailure(e)) => {
            tracing::error!("Store failure during connect: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that drains the connection's event channel into the
/// WebSocket sink. Exits when the channel or the sink closes.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    accepted: AcceptedSession,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);

    let chat_id = accepted.chat.id.clone();
    let user_id = accepted.user.id.clone();
    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Inbound flow: typed client events, everything else non-control
    // is ignored with a warn
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(ClientEvent::Typing) => {
                        if let Err(e) = state_clone
                            .signal_typing_usecase
                            .execute_start(chat_id.clone(), user_id.clone())
                            .await
                        {
                            tracing::warn!("Typing signal dropped: {}", e);
                        }
                    }
                    Ok(ClientEvent::StopTyping) => {
                        if let Err(e) = state_clone
                            .signal_typing_usecase
                            .execute_stop(chat_id.clone(), user_id.clone())
                            .await
                        {
                            tracing::warn!("Stop-typing signal dropped: {}", e);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring unrecognized client event: {}", e);
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state
        .disconnect_session_usecase
        .execute(connection_id.clone())
        .await
    {
        tracing::warn!("Disconnect handling failed for '{}': {}", connection_id, e);
    } else {
        tracing::info!("Connection '{}' closed", connection_id);
    }
}
