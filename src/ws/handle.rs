use tokio::sync::mpsc;
use uuid::Uuid;

use crate::models::ServerEvent;

pub type SessionId = Uuid;

/// Outbound half of a connection's event channel
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Cloneable address of one connected session.
///
/// Holding a handle never keeps the connection alive: once the writer task
/// has gone, `send` just reports failure.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    id: SessionId,
    tx: EventSender,
}

impl SessionHandle {
    pub fn new(tx: EventSender) -> Self {
        Self { id: Uuid::new_v4(), tx }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queue an event for this session. Returns false if the connection is gone.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SessionHandle {}
