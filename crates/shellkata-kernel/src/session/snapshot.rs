//! Session snapshots.
//!
//! A snapshot is everything needed to continue a lesson later: position,
//! counters and the whole filesystem tree. The last command is not kept.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{Session, SessionError};
use crate::path::collapse;
use crate::vfs::{MemoryFs, Node};

/// Serializable session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub lesson_id: String,
    pub cwd: String,
    pub task_index: usize,
    pub attempts: u32,
    pub correct: u32,
    #[serde(default)]
    pub complete: bool,
    pub vfs: Node,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

impl Session {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lesson_id: self.lesson.id.clone(),
            cwd: self.cwd.clone(),
            task_index: self.index,
            attempts: self.attempts,
            correct: self.correct,
            complete: self.complete,
            vfs: self.vfs.root().clone(),
        }
    }

    /// Replace the live state with `snapshot`.
    ///
    /// The snapshot must belong to this session's lesson. An out-of-range
    /// task index is clamped to the last task; a working directory that is
    /// not a directory in the restored tree falls back to the lesson start.
    /// On error the session is left untouched.
    pub fn rehydrate(&mut self, snapshot: Snapshot) -> Result<(), SessionError> {
        if snapshot.lesson_id != self.lesson.id {
            return Err(SessionError::LessonMismatch {
                expected: self.lesson.id.clone(),
                found: snapshot.lesson_id,
            });
        }

        let mut vfs = MemoryFs::from_root(snapshot.vfs)?;

        let last = self.lesson.tasks.len().saturating_sub(1);
        let index = if snapshot.task_index > last {
            warn!(
                lesson = %self.lesson.id,
                saved = snapshot.task_index,
                "saved task index out of range, clamping"
            );
            last
        } else {
            snapshot.task_index
        };

        let mut cwd = collapse(&snapshot.cwd);
        if !vfs.is_dir(&cwd) {
            let start = collapse(&self.lesson.start_cwd);
            warn!(saved = %cwd, fallback = %start, "saved cwd is not a directory");
            vfs.ensure_dir(&start)?;
            cwd = start;
        }

        self.vfs = vfs;
        self.cwd = cwd;
        self.index = index;
        self.attempts = snapshot.attempts;
        self.correct = snapshot.correct;
        self.complete = snapshot.complete;
        self.last_cmd.clear();
        self.last_args.clear();

        info!(lesson = %self.lesson.id, task = self.index + 1, "session restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::lesson::LessonLibrary;
    use crate::session::DEFAULT_HOME;

    fn session() -> Session {
        let library = LessonLibrary::builtin().unwrap();
        Session::new(library.require("02_files").unwrap(), DEFAULT_HOME).unwrap()
    }

    #[test]
    fn test_snapshot_restores_tree_and_counters() {
        let mut played = session();
        played.submit("mkdir notes");
        played.submit("cd notes");
        played.submit("touch todo.txt");

        let json = played.snapshot().to_json().unwrap();
        let snapshot = Snapshot::from_json(&json).unwrap();

        let mut restored = session();
        restored.rehydrate(snapshot).unwrap();
        assert_eq!(restored.cwd(), "/home/student/notes");
        assert_eq!(restored.task_index(), 3);
        assert_eq!(restored.attempts(), 3);
        assert_eq!(restored.correct(), 3);
        assert_eq!(restored.vfs(), played.vfs());
        assert_eq!(restored.last_cmd(), "");
    }

    #[test]
    fn test_wrong_lesson_is_refused() {
        let library = LessonLibrary::builtin().unwrap();
        let other = Session::new(library.require("01_paths").unwrap(), DEFAULT_HOME).unwrap();
        let mut target = session();
        target.submit("mkdir notes");
        let before = target.snapshot();

        let err = target.rehydrate(other.snapshot()).unwrap_err();
        assert!(matches!(err, SessionError::LessonMismatch { .. }));
        assert_eq!(target.snapshot(), before);
    }

    #[test]
    fn test_index_is_clamped() {
        let mut snapshot = session().snapshot();
        snapshot.task_index = 99;
        let mut restored = session();
        restored.rehydrate(snapshot).unwrap();
        assert_eq!(restored.task_index(), 4);
    }

    #[test]
    fn test_saturated_counters_stay_saturated() {
        let mut snapshot = session().snapshot();
        snapshot.attempts = u32::MAX;
        snapshot.correct = u32::MAX;
        let mut restored = session();
        restored.rehydrate(snapshot).unwrap();

        let sub = restored.submit("mkdir notes");
        assert!(sub.ok);
        assert_eq!(restored.attempts(), u32::MAX);
        assert_eq!(restored.correct(), u32::MAX);
        assert_eq!(restored.task_index(), 1);
    }

    #[test]
    fn test_missing_cwd_falls_back_to_start() {
        let mut snapshot = session().snapshot();
        snapshot.cwd = "/home/student/readme.txt".into();
        let mut restored = session();
        restored.rehydrate(snapshot).unwrap();
        assert_eq!(restored.cwd(), "/home/student");
    }

    #[test]
    fn test_file_root_is_rejected() {
        let mut snapshot = session().snapshot();
        snapshot.vfs = serde_json::from_str(r#"{"kind":"file"}"#).unwrap();
        let mut restored = session();
        assert!(matches!(
            restored.rehydrate(snapshot),
            Err(SessionError::Vfs(_))
        ));
    }

    #[test]
    fn test_complete_defaults_to_false() {
        let json = r#"{"lesson_id":"02_files","cwd":"/","task_index":0,
            "attempts":0,"correct":0,"vfs":{"kind":"dir"}}"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert!(!snapshot.complete);

        let restored = Session::restore(
            Arc::new(session().lesson().clone()),
            DEFAULT_HOME,
            snapshot,
        )
        .unwrap();
        assert_eq!(restored.cwd(), "/");
        assert!(!restored.vfs().exists("/home"));
    }
}
