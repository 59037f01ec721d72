use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::config::PersistPolicy;
use crate::db::{self, DocStore, StoreError};

#[derive(Debug)]
struct PendingWrite {
    document_id: String,
    content: String,
}

/// Write `content` under `document_id`, retrying with a doubling backoff.
///
/// Returns the number of attempts that were needed.
pub async fn persist_with_retry(
    store: &dyn DocStore,
    document_id: &str,
    content: &str,
    policy: PersistPolicy,
) -> Result<u32, StoreError> {
    let mut backoff = policy.backoff;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match db::with_timeout(policy.timeout, store.put(document_id, content)).await {
            Ok(()) => return Ok(attempt),
            Err(e) if attempt <= policy.retries => {
                warn!("Persist attempt {} for document {} failed: {}", attempt, document_id, e);
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Background writer owned by one session.
///
/// Edits are written in the order they were made. When writes queue up
/// behind a slow store, only the newest content per document is kept.
pub struct PersistQueue {
    tx: mpsc::UnboundedSender<PendingWrite>,
    worker: JoinHandle<()>,
}

impl PersistQueue {
    pub fn spawn(store: Arc<dyn DocStore>, policy: PersistPolicy) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_writer(rx, store, policy));
        Self { tx, worker }
    }

    /// Queue a write. Never waits on the store.
    pub fn enqueue(&self, document_id: &str, content: &str) {
        let write = PendingWrite {
            document_id: document_id.to_string(),
            content: content.to_string(),
        };
        if self.tx.send(write).is_err() {
            error!("Persist worker gone, dropping write for document {}", document_id);
        }
    }

    /// Stop accepting writes and wait until queued ones have been attempted.
    pub async fn flush(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            error!("Persist worker failed: {}", e);
        }
    }
}

async fn run_writer(
    mut rx: mpsc::UnboundedReceiver<PendingWrite>,
    store: Arc<dyn DocStore>,
    policy: PersistPolicy,
) {
    while let Some(mut latest) = rx.recv().await {
        // Coalesce whatever piled up while the previous write was running
        while let Ok(next) = rx.try_recv() {
            if next.document_id != latest.document_id {
                write_one(store.as_ref(), &latest, policy).await;
            }
            latest = next;
        }
        write_one(store.as_ref(), &latest, policy).await;
    }
}

async fn write_one(store: &dyn DocStore, write: &PendingWrite, policy: PersistPolicy) {
    match persist_with_retry(store, &write.document_id, &write.content, policy).await {
        Ok(attempts) => debug!(
            "Document {} saved ({} bytes, {} attempt(s))",
            write.document_id,
            write.content.len(),
            attempts
        ),
        Err(e) => error!("Error saving changes for document {}: {}", write.document_id, e),
    }
}
