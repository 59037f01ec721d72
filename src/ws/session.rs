use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::PersistPolicy;
use crate::db::{DocStore, StoreError};
use crate::models::ServerEvent;
use super::broadcast::BroadcastRouter;
use super::handle::{EventSender, SessionHandle, SessionId};
use super::persist::PersistQueue;
use super::registry::RoomRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Joined(String),
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The event is not valid in the session's current state
    InvalidState,
    InvalidDocumentId,
    Store(StoreError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidState => write!(f, "Event not valid in current session state"),
            SessionError::InvalidDocumentId => write!(f, "Document id must not be empty"),
            SessionError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

/// Shared collaborators every session works against
pub struct SessionManager {
    registry: Arc<RoomRegistry>,
    router: BroadcastRouter,
    store: Arc<dyn DocStore>,
    policy: PersistPolicy,
    active: Arc<AtomicUsize>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn DocStore>, policy: PersistPolicy) -> Self {
        let registry = Arc::new(RoomRegistry::new(store.clone(), policy.timeout));
        let router = BroadcastRouter::new(registry.clone());
        Self {
            registry,
            router,
            store,
            policy,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Open a session for a new connection whose outbound events go to `tx`.
    pub fn connect(&self, tx: EventSender) -> Session {
        let handle = SessionHandle::new(tx);
        self.active.fetch_add(1, Ordering::SeqCst);
        info!("Session {} connected", handle.id());
        Session {
            handle,
            state: SessionState::Connected,
            registry: self.registry.clone(),
            router: self.router.clone(),
            persist: Some(PersistQueue::spawn(self.store.clone(), self.policy)),
            active: self.active.clone(),
        }
    }

    /// Number of sessions that are connected, joined or not
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Per-connection state machine: `Connected -> Joined(id) -> Disconnected`.
pub struct Session {
    handle: SessionHandle,
    state: SessionState,
    registry: Arc<RoomRegistry>,
    router: BroadcastRouter,
    persist: Option<PersistQueue>,
    active: Arc<AtomicUsize>,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.handle.id()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Push an event to this session's own client
    pub fn reply(&self, event: ServerEvent) -> bool {
        self.handle.send(event)
    }

    /// Join `document_id`, leaving any previous room, and return its content.
    ///
    /// The session is `Joined` even when the store fails: it stays a room
    /// member and only the content fetch is reported as an error.
    pub async fn join(&mut self, document_id: &str) -> Result<String, SessionError> {
        if self.state == SessionState::Disconnected {
            return Err(SessionError::InvalidState);
        }
        if document_id.trim().is_empty() {
            warn!("Session {} tried to join an empty document id", self.id());
            return Err(SessionError::InvalidDocumentId);
        }

        let res = self.registry.join(document_id, &self.handle).await;
        self.state = SessionState::Joined(document_id.to_string());
        res.map_err(SessionError::Store)
    }

    /// Fan `content` out to the rest of the room and queue it for storage.
    ///
    /// The broadcast completes before this returns; the write happens in the
    /// background and its failure never affects the broadcast. Returns the
    /// number of peers the change was delivered to.
    pub async fn edit(&mut self, document_id: &str, content: &str) -> Result<usize, SessionError> {
        let joined = match &self.state {
            SessionState::Joined(id) if id == document_id => id.clone(),
            _ => {
                debug!(
                    "Session {} dropped change for {} in state {:?}",
                    self.id(),
                    document_id,
                    self.state
                );
                return Err(SessionError::InvalidState);
            }
        };

        let delivered = self.router.broadcast(&joined, self.id(), content).await;
        if let Some(persist) = &self.persist {
            persist.enqueue(&joined, content);
        }
        Ok(delivered)
    }

    /// Leave the room and finish any queued writes. Safe to call twice.
    pub async fn disconnect(&mut self) {
        if self.state == SessionState::Disconnected {
            return;
        }
        self.registry.leave(self.id()).await;
        self.state = SessionState::Disconnected;
        self.active.fetch_sub(1, Ordering::SeqCst);
        info!("Session {} disconnected", self.id());

        if let Some(persist) = self.persist.take() {
            persist.flush().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemDocStore;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn manager(store: Arc<MemDocStore>) -> SessionManager {
        SessionManager::new(store, PersistPolicy::default())
    }

    fn connect(manager: &SessionManager) -> (Session, UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (manager.connect(tx), rx)
    }

    #[tokio::test]
    async fn lifecycle_moves_through_states() {
        let manager = manager(Arc::new(MemDocStore::new()));
        let (mut session, _rx) = connect(&manager);
        assert_eq!(session.state(), &SessionState::Connected);
        assert_eq!(manager.active_connections(), 1);

        session.join("doc").await.unwrap();
        assert_eq!(session.state(), &SessionState::Joined("doc".to_string()));

        session.disconnect().await;
        assert_eq!(session.state(), &SessionState::Disconnected);
        assert_eq!(manager.active_connections(), 0);
        assert_eq!(manager.registry().room_count().await, 0);

        session.disconnect().await;
        assert_eq!(manager.active_connections(), 0);
    }

    #[tokio::test]
    async fn edit_before_join_is_invalid() {
        let manager = manager(Arc::new(MemDocStore::new()));
        let (mut session, _rx) = connect(&manager);
        assert_eq!(session.edit("doc", "text").await, Err(SessionError::InvalidState));
    }

    #[tokio::test]
    async fn edit_for_another_document_is_invalid() {
        let manager = manager(Arc::new(MemDocStore::new()));
        let (mut session, _rx) = connect(&manager);
        session.join("mine").await.unwrap();
        assert_eq!(session.edit("theirs", "text").await, Err(SessionError::InvalidState));
    }

    #[tokio::test]
    async fn join_after_disconnect_is_invalid() {
        let manager = manager(Arc::new(MemDocStore::new()));
        let (mut session, _rx) = connect(&manager);
        session.disconnect().await;
        assert_eq!(session.join("doc").await, Err(SessionError::InvalidState));
    }

    #[tokio::test]
    async fn empty_document_id_is_rejected() {
        let manager = manager(Arc::new(MemDocStore::new()));
        let (mut session, _rx) = connect(&manager);
        assert_eq!(session.join("  ").await, Err(SessionError::InvalidDocumentId));
        assert_eq!(session.state(), &SessionState::Connected);
    }

    #[tokio::test]
    async fn edit_reaches_peer_and_store() {
        let store = Arc::new(MemDocStore::new());
        let manager = manager(store.clone());
        let (mut one, _one_rx) = connect(&manager);
        let (mut two, mut two_rx) = connect(&manager);
        one.join("abcd1234").await.unwrap();
        two.join("abcd1234").await.unwrap();

        assert_eq!(one.edit("abcd1234", "hello").await, Ok(1));
        one.disconnect().await;

        assert_eq!(two_rx.try_recv().unwrap(), ServerEvent::receive_changes("hello"));
        assert_eq!(store.get("abcd1234").await.unwrap(), Some("hello".to_string()));
    }

    #[tokio::test]
    async fn rejoin_moves_session_between_rooms() {
        let manager = manager(Arc::new(MemDocStore::new()));
        let (mut mover, _mover_rx) = connect(&manager);
        let (mut old_peer, mut old_rx) = connect(&manager);
        let (mut new_peer, mut new_rx) = connect(&manager);
        mover.join("old").await.unwrap();
        old_peer.join("old").await.unwrap();
        new_peer.join("new").await.unwrap();

        mover.join("new").await.unwrap();
        mover.edit("new", "moved").await.unwrap();
        old_peer.edit("old", "stale").await.unwrap();

        assert_eq!(new_rx.try_recv().unwrap(), ServerEvent::receive_changes("moved"));
        assert!(old_rx.try_recv().is_err());
        assert_eq!(manager.registry().room_of(mover.id()).await.as_deref(), Some("new"));
    }
}
