//! JSON save files on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{SaveStore, StoreError};
use crate::session::Snapshot;

/// Saves as `save_<lesson_id>.json` under one directory.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write never leaves a truncated save behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A store at the default XDG location.
    pub fn default_location() -> Self {
        Self::new(super::paths::saves_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the save file for `lesson_id`.
    pub fn path_for(&self, lesson_id: &str) -> Result<PathBuf, StoreError> {
        if lesson_id.is_empty()
            || lesson_id == "."
            || lesson_id == ".."
            || lesson_id.contains(['/', '\\', '\0'])
        {
            return Err(StoreError::InvalidKey(lesson_id.to_string()));
        }
        Ok(self.dir.join(format!("save_{}.json", lesson_id)))
    }
}

#[async_trait]
impl SaveStore for FileStore {
    async fn load(&self, lesson_id: &str) -> Result<Option<Snapshot>, StoreError> {
        let path = self.path_for(lesson_id)?;
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    op: "reading",
                    path,
                    source,
                });
            }
        };
        let snapshot =
            Snapshot::from_json(&source).map_err(|source| StoreError::Corrupt { path, source })?;
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let path = self.path_for(&snapshot.lesson_id)?;
        let json = snapshot.to_json().map_err(StoreError::Encode)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StoreError::Io {
                op: "creating",
                path: self.dir.clone(),
                source,
            })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| StoreError::Io {
                op: "writing",
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StoreError::Io {
                op: "renaming",
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), "save written");
        Ok(())
    }

    async fn delete(&self, lesson_id: &str) -> Result<(), StoreError> {
        let path = self.path_for(lesson_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "save deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                op: "deleting",
                path,
                source,
            }),
        }
    }

    async fn exists(&self, lesson_id: &str) -> Result<bool, StoreError> {
        let path = self.path_for(lesson_id)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|source| StoreError::Io {
                op: "checking",
                path,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::Node;
    use tempfile::TempDir;

    fn snapshot(lesson_id: &str) -> Snapshot {
        Snapshot {
            lesson_id: lesson_id.to_string(),
            cwd: "/".to_string(),
            task_index: 1,
            attempts: 4,
            correct: 1,
            complete: false,
            vfs: Node::directory(),
        }
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("saves"));

        assert_eq!(store.load("01_paths").await.unwrap(), None);
        assert!(!store.exists("01_paths").await.unwrap());

        store.save(&snapshot("01_paths")).await.unwrap();
        assert!(tmp.path().join("saves/save_01_paths.json").is_file());
        assert!(!tmp.path().join("saves/save_01_paths.json.tmp").exists());
        assert!(store.exists("01_paths").await.unwrap());
        assert_eq!(store.load("01_paths").await.unwrap(), Some(snapshot("01_paths")));

        store.delete("01_paths").await.unwrap();
        assert!(!store.exists("01_paths").await.unwrap());
        store.delete("01_paths").await.unwrap();
    }

    #[tokio::test]
    async fn test_saves_are_per_lesson() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        store.save(&snapshot("a")).await.unwrap();
        store.save(&snapshot("b")).await.unwrap();
        store.delete("a").await.unwrap();
        assert!(store.exists("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_save() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path());
        std::fs::write(tmp.path().join("save_x.json"), "{ nope").unwrap();
        assert!(matches!(
            store.load("x").await,
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_default_location_is_the_saves_dir() {
        let store = FileStore::default_location();
        assert_eq!(store.dir(), crate::state::paths::saves_dir().as_path());
        assert_eq!(
            store.path_for("01_paths").unwrap(),
            store.dir().join("save_01_paths.json")
        );
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let store = FileStore::new("/tmp/unused");
        for id in ["", "..", "../x", "a/b"] {
            assert!(matches!(
                store.load(id).await,
                Err(StoreError::InvalidKey(_))
            ));
        }
    }
}
