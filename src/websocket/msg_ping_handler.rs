use tracing::{debug, error};
use chrono::Utc;

use crate::models::{PingMessage, PongMessage, ServerEvent};
use crate::ws::Session;

/// Handle PingMessage - send a pong back
pub fn handle_ping_message(_ping_msg: &PingMessage, session: &Session) {
    debug!("Ping message received from session {}", session.id());

    let pong = ServerEvent::Pong(PongMessage { date: Utc::now().to_rfc3339() });
    if !session.reply(pong) {
        error!("Failed to send Pong message to session {}", session.id());
    }
}
