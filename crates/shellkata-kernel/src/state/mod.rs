//! Save-game persistence.
//!
//! One [`Snapshot`] per lesson, keyed by lesson id. Stores are async so a
//! front end can persist without blocking its event loop.
//!
//! - [`FileStore`]: `save_<lesson_id>.json` files under a directory
//!   (default `$XDG_DATA_HOME/shellkata/saves`)
//! - [`MemoryStore`]: process-local, for tests and transient sessions

mod file;
mod memory;
pub mod paths;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::session::Snapshot;

/// Errors from save stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{op} {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt save {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encoding save: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("invalid lesson id for a save: {0:?}")]
    InvalidKey(String),
}

/// Storage for lesson snapshots.
#[async_trait]
pub trait SaveStore: Send + Sync {
    /// The saved snapshot for `lesson_id`, if any.
    async fn load(&self, lesson_id: &str) -> Result<Option<Snapshot>, StoreError>;

    /// Store `snapshot`, replacing any previous save of the same lesson.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Remove the save for `lesson_id`. Missing saves are not an error.
    async fn delete(&self, lesson_id: &str) -> Result<(), StoreError>;

    async fn exists(&self, lesson_id: &str) -> Result<bool, StoreError> {
        Ok(self.load(lesson_id).await?.is_some())
    }
}
