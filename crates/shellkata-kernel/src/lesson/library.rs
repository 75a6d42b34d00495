//! The set of lessons a trainer can start.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::{Lesson, LessonError};

/// Lessons compiled into the binary, in catalog order.
const BUILTIN_LESSONS: &[&str] = &[
    include_str!("../../lessons/01_paths.json"),
    include_str!("../../lessons/02_files.json"),
];

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonInfo {
    pub id: String,
    pub title: String,
}

/// Ordered lesson catalog.
///
/// Inserting a lesson whose id is already present replaces it in place, so
/// a lessons directory can override a built-in lesson.
#[derive(Debug, Clone, Default)]
pub struct LessonLibrary {
    lessons: Vec<Arc<Lesson>>,
}

impl LessonLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lessons shipped with shellkata.
    pub fn builtin() -> Result<Self, LessonError> {
        let mut library = Self::new();
        for source in BUILTIN_LESSONS {
            library.insert(Lesson::from_json(source)?);
        }
        Ok(library)
    }

    /// Add every `*.json` lesson in `dir`, in file name order.
    pub async fn load_dir(&mut self, dir: &Path) -> Result<usize, LessonError> {
        let io_err = |source| LessonError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut reader = tokio::fs::read_dir(dir).await.map_err(io_err)?;
        let mut paths = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let source = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LessonError::Io {
                    path: path.clone(),
                    source,
                })?;
            let lesson = Lesson::from_json(&source)?;
            debug!(lesson = %lesson.id, path = %path.display(), "loaded lesson");
            self.insert(lesson);
        }

        info!(dir = %dir.display(), count = paths.len(), "loaded lessons directory");
        Ok(paths.len())
    }

    /// Add or replace a lesson.
    pub fn insert(&mut self, lesson: Lesson) {
        let lesson = Arc::new(lesson);
        match self.lessons.iter_mut().find(|l| l.id == lesson.id) {
            Some(slot) => *slot = lesson,
            None => self.lessons.push(lesson),
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<Lesson>> {
        self.lessons.iter().find(|l| l.id == id).cloned()
    }

    /// Like [`get`](Self::get), as a `Result`.
    pub fn require(&self, id: &str) -> Result<Arc<Lesson>, LessonError> {
        self.get(id)
            .ok_or_else(|| LessonError::NotFound(id.to_string()))
    }

    pub fn first(&self) -> Option<Arc<Lesson>> {
        self.lessons.first().cloned()
    }

    pub fn list(&self) -> Vec<LessonInfo> {
        self.lessons.iter().map(|l| l.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lessons_parse() {
        let library = LessonLibrary::builtin().unwrap();
        let ids: Vec<_> = library.list().into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["01_paths", "02_files"]);
        for info in library.list() {
            let lesson = library.get(&info.id).unwrap();
            assert!(!lesson.tasks.is_empty());
            assert!(lesson.start_cwd.starts_with('/'));
        }
    }

    #[test]
    fn test_insert_replaces_same_id() {
        let mut library = LessonLibrary::builtin().unwrap();
        let mut lesson = (*library.get("01_paths").unwrap()).clone();
        lesson.title = "Replaced".into();
        library.insert(lesson);
        assert_eq!(library.len(), 2);
        assert_eq!(library.list()[0].title, "Replaced");
    }

    #[test]
    fn test_require_unknown() {
        let library = LessonLibrary::builtin().unwrap();
        assert!(matches!(
            library.require("99_nope"),
            Err(LessonError::NotFound(id)) if id == "99_nope"
        ));
    }

    #[tokio::test]
    async fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        let lesson = r#"{
            "lesson_id": "90_custom", "title": "Custom", "start_cwd": "/home/student",
            "tasks": [{"id": "1", "title": "t", "prompt": "p", "hint": "h",
                       "success_explain": "s", "rule": {"kind": "goal", "allowed_cmds": ["pwd"]}}]
        }"#;
        std::fs::write(dir.path().join("90_custom.json"), lesson).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut library = LessonLibrary::builtin().unwrap();
        let loaded = library.load_dir(dir.path()).await.unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(library.get("90_custom").unwrap().title, "Custom");
    }

    #[tokio::test]
    async fn test_load_dir_bad_lesson() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), r#"{"lesson_id": "x"}"#).unwrap();
        let mut library = LessonLibrary::new();
        assert!(matches!(
            library.load_dir(dir.path()).await,
            Err(LessonError::Parse(_))
        ));
    }
}
