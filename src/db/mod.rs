//! Store adapter: durable `id -> content` mapping with no business logic.
//!
//! Every backend implements [`DocStore`]. The registry and the sessions hold
//! an `Arc<dyn DocStore>` so tests can swap in doubles.

pub mod dbdoc;
pub mod memdoc;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use dbdoc::PgDocStore;
pub use memdoc::MemDocStore;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Key/value storage for document content.
///
/// There is no transaction across `get` then `put`; callers tolerate
/// read-modify-write races.
pub trait DocStore: Send + Sync {
    /// Fetch the content stored under `id`, `None` if the id is unknown.
    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Store `content` under `id`, creating the record if needed.
    fn put<'a>(&'a self, id: &'a str, content: &'a str) -> StoreFuture<'a, ()>;

    /// Create `id` with `content` unless a record already exists.
    ///
    /// Never overwrites. Returns the content that is stored once the call
    /// completes, which is the existing record's when creation lost a race.
    fn create<'a>(&'a self, id: &'a str, content: &'a str) -> StoreFuture<'a, String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Unavailable(String),
    Timeout(Duration),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(e) => write!(f, "Store unavailable: {}", e),
            StoreError::Timeout(d) => write!(f, "Store call timed out after {} ms", d.as_millis()),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Run a store call, failing with [`StoreError::Timeout`] when it takes
/// longer than `limit`.
pub async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(limit, call).await {
        Ok(res) => res,
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn with_timeout_reports_slow_calls() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, StoreError>(())
        };
        let res = with_timeout(Duration::from_millis(50), slow).await;
        assert_eq!(res, Err(StoreError::Timeout(Duration::from_millis(50))));
    }

    #[tokio::test]
    async fn with_timeout_passes_results_through() {
        let res = with_timeout(Duration::from_secs(1), async { Ok::<_, StoreError>(7) }).await;
        assert_eq!(res, Ok(7));

        let err = with_timeout(Duration::from_secs(1), async {
            Err::<(), _>(StoreError::Unavailable("down".into()))
        })
        .await;
        assert_eq!(err, Err(StoreError::Unavailable("down".into())));
    }
}
