use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{DocStore, StoreFuture};

/// Process-local document store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemDocStore {
    docs: RwLock<HashMap<String, String>>,
}

impl MemDocStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl DocStore for MemDocStore {
    fn get<'a>(&'a self, id: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move { Ok(self.docs.read().await.get(id).cloned()) })
    }

    fn put<'a>(&'a self, id: &'a str, content: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            debug!("Storing {} bytes for document {}", content.len(), id);
            self.docs.write().await.insert(id.to_string(), content.to_string());
            Ok(())
        })
    }

    fn create<'a>(&'a self, id: &'a str, content: &'a str) -> StoreFuture<'a, String> {
        Box::pin(async move {
            let mut docs = self.docs.write().await;
            Ok(docs.entry(id.to_string()).or_insert_with(|| content.to_string()).clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_returns_content() {
        let store = MemDocStore::new();
        store.put("d", "hello").await.unwrap();
        assert_eq!(store.get("d").await.unwrap(), Some("hello".to_string()));
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store = MemDocStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn put_overwrites_single_record() {
        let store = MemDocStore::new();
        store.put("d", "one").await.unwrap();
        store.put("d", "two").await.unwrap();
        assert_eq!(store.get("d").await.unwrap(), Some("two".to_string()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn create_keeps_an_existing_record() {
        let store = MemDocStore::new();
        assert_eq!(store.create("d", "").await.unwrap(), "");

        store.put("d", "written").await.unwrap();
        assert_eq!(store.create("d", "").await.unwrap(), "written");
        assert_eq!(store.get("d").await.unwrap(), Some("written".to_string()));
    }
}
