use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::ServerEvent;
use super::handle::SessionId;
use super::registry::RoomRegistry;

/// Fans a change out to every other member of a room.
#[derive(Clone)]
pub struct BroadcastRouter {
    registry: Arc<RoomRegistry>,
}

impl BroadcastRouter {
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver `payload` unchanged to everyone in `document_id` but the sender.
    ///
    /// Each recipient is sent to independently through its own channel, so a
    /// closed or slow connection never holds up the rest. Returns how many
    /// recipients accepted the event.
    pub async fn broadcast(&self, document_id: &str, sender: SessionId, payload: &str) -> usize {
        let recipients = self.registry.members_except(document_id, sender).await;
        let mut delivered = 0;
        for recipient in &recipients {
            if recipient.send(ServerEvent::receive_changes(payload)) {
                delivered += 1;
            } else {
                warn!("Dropping change for closed session {} in document {}", recipient.id(), document_id);
            }
        }
        debug!(
            "Broadcast {} bytes from {} to {}/{} members of {}",
            payload.len(),
            sender,
            delivered,
            recipients.len(),
            document_id
        );
        delivered
    }
}
