use std::sync::Arc;
use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, State},
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::models::{ClientEvent, ServerEvent};
use crate::state::AppState;
use crate::ws::Session;
use super::msg_changes_handler::handle_changes_message;
use super::msg_join_handler::handle_join_message;
use super::msg_ping_handler::handle_ping_message;

/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    // Everything addressed to this client goes through one channel
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    let mut session = app_state.sessions.connect(tx);
    info!("WebSocket connection established for session {}", session.id());

    // Writer task: owns the sink and drains the channel in order
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize outbound event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Reader loop: events from one connection are handled one at a time
    loop {
        tokio::select! {
            msg = receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => dispatch(&mut session, &text).await,
                Some(Ok(Message::Close(frame))) => {
                    info!("Session {} closed by client: {:?}", session.id(), frame);
                    break;
                }
                // Binary frames are not part of the protocol, pings are answered by axum
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("WebSocket receive error for session {}: {}", session.id(), e);
                    break;
                }
                None => break,
            },
            _ = &mut send_task => {
                warn!("Writer for session {} stopped", session.id());
                break;
            }
        }
    }

    session.disconnect().await;
    send_task.abort();
    info!("WebSocket connection terminated");
}

async fn dispatch(session: &mut Session, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to parse message from session {}: {}", session.id(), e);
            return;
        }
    };

    match event {
        ClientEvent::JoinDocument(join_msg) => handle_join_message(&join_msg, session).await,
        ClientEvent::SendChanges(changes_msg) => handle_changes_message(&changes_msg, session).await,
        ClientEvent::Ping(ping_msg) => handle_ping_message(&ping_msg, session),
    }
}
