//! In-process save store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SaveStore, StoreError};
use crate::session::Snapshot;

/// Keeps snapshots in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saves: RwLock<HashMap<String, Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.saves.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.saves.read().await.is_empty()
    }
}

#[async_trait]
impl SaveStore for MemoryStore {
    async fn load(&self, lesson_id: &str) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.saves.read().await.get(lesson_id).cloned())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        self.saves
            .write()
            .await
            .insert(snapshot.lesson_id.clone(), snapshot.clone());
        Ok(())
    }

    async fn delete(&self, lesson_id: &str) -> Result<(), StoreError> {
        self.saves.write().await.remove(lesson_id);
        Ok(())
    }

    async fn exists(&self, lesson_id: &str) -> Result<bool, StoreError> {
        Ok(self.saves.read().await.contains_key(lesson_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::Node;

    #[tokio::test]
    async fn test_round_trip() {
        let store = MemoryStore::new();
        let snapshot = Snapshot {
            lesson_id: "l".into(),
            cwd: "/".into(),
            task_index: 0,
            attempts: 0,
            correct: 0,
            complete: true,
            vfs: Node::directory(),
        };
        store.save(&snapshot).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.load("l").await.unwrap(), Some(snapshot));
        store.delete("l").await.unwrap();
        assert!(store.is_empty().await);
        assert!(!store.exists("l").await.unwrap());
    }
}
