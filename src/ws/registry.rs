use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::db::{self, DocStore, StoreError};
use super::handle::{SessionHandle, SessionId};

/// Content pushed to a client whose document could not be loaded
pub const LOAD_ERROR_CONTENT: &str = "Error loading document content.";

#[derive(Default)]
struct Membership {
    /// document id -> sessions currently in that room
    rooms: HashMap<String, HashMap<SessionId, SessionHandle>>,
    /// session id -> the one document it has joined
    joined: HashMap<SessionId, String>,
}

impl Membership {
    fn remove(&mut self, session_id: SessionId) -> Option<String> {
        let document_id = self.joined.remove(&session_id)?;
        if let Some(room) = self.rooms.get_mut(&document_id) {
            room.remove(&session_id);
            if room.is_empty() {
                self.rooms.remove(&document_id);
            }
        }
        Some(document_id)
    }
}

/// Maps document ids to the sessions viewing them.
///
/// All membership changes happen under one write lock, so concurrent joins
/// and leaves on the same room never lose updates. The lock is never held
/// across a store call.
pub struct RoomRegistry {
    membership: RwLock<Membership>,
    store: Arc<dyn DocStore>,
    fetch_timeout: Duration,
}

impl RoomRegistry {
    pub fn new(store: Arc<dyn DocStore>, fetch_timeout: Duration) -> Self {
        Self {
            membership: RwLock::new(Membership::default()),
            store,
            fetch_timeout,
        }
    }

    /// Add `session` to the room for `document_id` and return the current
    /// content, creating an empty document on first sight.
    ///
    /// A session is in at most one room: joining a new id releases the
    /// previous one. Joining the same room twice keeps a single membership
    /// but still fetches content. On store failure the membership is kept and
    /// the error is returned to the caller only.
    pub async fn join(&self, document_id: &str, session: &SessionHandle) -> Result<String, StoreError> {
        {
            let mut membership = self.membership.write().await;
            let session_id = session.id();
            if membership.joined.get(&session_id).map(String::as_str) != Some(document_id) {
                if let Some(previous) = membership.remove(session_id) {
                    info!("Session {} left document {} to join {}", session_id, previous, document_id);
                }
                membership
                    .rooms
                    .entry(document_id.to_string())
                    .or_default()
                    .insert(session_id, session.clone());
                membership.joined.insert(session_id, document_id.to_string());
            }
        }
        info!("Session {} joined document {}", session.id(), document_id);

        self.load_or_create(document_id).await
    }

    async fn load_or_create(&self, document_id: &str) -> Result<String, StoreError> {
        let existing = db::with_timeout(self.fetch_timeout, self.store.get(document_id))
            .await
            .map_err(|e| {
                error!("Error loading document {}: {}", document_id, e);
                e
            })?;

        match existing {
            Some(content) => {
                debug!("Loaded document {} ({} bytes)", document_id, content.len());
                Ok(content)
            }
            None => {
                // Another session may create the same id between get and create
                let content = db::with_timeout(self.fetch_timeout, self.store.create(document_id, ""))
                    .await
                    .map_err(|e| {
                        error!("Error creating document {}: {}", document_id, e);
                        e
                    })?;
                info!("New document created: {}", document_id);
                Ok(content)
            }
        }
    }

    /// Remove `session_id` from whatever room it is in. Returns that room's id.
    pub async fn leave(&self, session_id: SessionId) -> Option<String> {
        let left = self.membership.write().await.remove(session_id);
        if let Some(document_id) = &left {
            info!("Session {} left document {}", session_id, document_id);
        }
        left
    }

    /// Every member of the room except `session_id`
    pub async fn members_except(&self, document_id: &str, session_id: SessionId) -> Vec<SessionHandle> {
        let membership = self.membership.read().await;
        match membership.rooms.get(document_id) {
            Some(room) => room
                .values()
                .filter(|member| member.id() != session_id)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// The document `session_id` has joined, if any
    pub async fn room_of(&self, session_id: SessionId) -> Option<String> {
        self.membership.read().await.joined.get(&session_id).cloned()
    }

    pub async fn room_count(&self) -> usize {
        self.membership.read().await.rooms.len()
    }

    /// Number of sessions that are in some room
    pub async fn session_count(&self) -> usize {
        self.membership.read().await.joined.len()
    }
}
