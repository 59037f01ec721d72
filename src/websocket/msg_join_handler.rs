use tracing::{error, info};

use crate::models::{JoinDocumentMessage, ServerEvent};
use crate::ws::{Session, LOAD_ERROR_CONTENT};

/// Handle JoinDocumentMessage - join the room and reply with its content
pub async fn handle_join_message(join_msg: &JoinDocumentMessage, session: &mut Session) {
    info!("Join message received from session {} for document {}", session.id(), join_msg.document_id);

    // Only the requesting client learns about a failed load
    let content = match session.join(&join_msg.document_id).await {
        Ok(content) => content,
        Err(e) => {
            error!("Error loading document {}: {}", join_msg.document_id, e);
            LOAD_ERROR_CONTENT.to_string()
        }
    };

    if !session.reply(ServerEvent::load_document(content)) {
        error!("Failed to send load-document for document {}", join_msg.document_id);
    }
}
