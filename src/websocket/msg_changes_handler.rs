use tracing::debug;

use crate::models::SendChangesMessage;
use crate::ws::Session;

/// Handle SendChangesMessage - broadcast, then persist in the background
pub async fn handle_changes_message(changes_msg: &SendChangesMessage, session: &mut Session) {
    match session.edit(&changes_msg.document_id, &changes_msg.content).await {
        Ok(delivered) => debug!(
            "Changes for {} from session {} sent to {} peer(s)",
            changes_msg.document_id,
            session.id(),
            delivered
        ),
        // Out-of-order client events are dropped without telling anyone
        Err(e) => debug!("Ignoring changes from session {}: {}", session.id(), e),
    }
}
