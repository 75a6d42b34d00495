//! The trainer facade.
//!
//! A [`Trainer`] owns the lesson library, one live [`Session`] and a save
//! store. Submissions are serialized through the session lock; every
//! submission is followed by a save of the new state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::lesson::{Lesson, LessonInfo, LessonLibrary, Task};
use crate::session::{EndOfLesson, Progress, Session, Submission, DEFAULT_HOME};
use crate::state::{FileStore, MemoryStore, SaveStore};
use crate::tools::ToolRegistry;

/// Configuration for a trainer.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Learner home directory inside the virtual filesystem.
    pub home: String,
    /// Whether to keep saves on disk.
    pub persist: bool,
    /// Where saves go when persisting. Defaults to the XDG data dir.
    pub save_dir: Option<PathBuf>,
    /// Extra lessons loaded on top of the built-in ones.
    pub lessons_dir: Option<PathBuf>,
    pub end_of_lesson: EndOfLesson,
    /// Lesson to open first. Defaults to the first lesson in the library.
    pub default_lesson: Option<String>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            home: DEFAULT_HOME.to_string(),
            persist: true,
            save_dir: None,
            lessons_dir: None,
            end_of_lesson: EndOfLesson::default(),
            default_lesson: None,
        }
    }
}

impl TrainerConfig {
    /// Create a transient (in-memory saves) config.
    pub fn transient() -> Self {
        Self {
            persist: false,
            ..Self::default()
        }
    }

    /// Create a persistent config saving under `save_dir`.
    pub fn persistent(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            persist: true,
            save_dir: Some(save_dir.into()),
            ..Self::default()
        }
    }
}

/// Current task with its position.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub task: Task,
    pub cwd: String,
    pub progress: Progress,
}

#[derive(Debug, Clone, Serialize)]
pub struct HintResponse {
    pub hint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HasSaveResponse {
    pub has_save: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LessonsResponse {
    pub lessons: Vec<LessonInfo>,
}

/// One learner's trainer.
pub struct Trainer {
    library: LessonLibrary,
    tools: Arc<ToolRegistry>,
    store: Arc<dyn SaveStore>,
    home: String,
    end_of_lesson: EndOfLesson,
    session: Mutex<Session>,
}

impl Trainer {
    /// Create a trainer with the store the config asks for.
    pub async fn new(config: TrainerConfig) -> Result<Self> {
        let store: Arc<dyn SaveStore> = if config.persist {
            let store = match &config.save_dir {
                Some(dir) => FileStore::new(dir.clone()),
                None => FileStore::default_location(),
            };
            info!(dir = %store.dir().display(), "saving progress to disk");
            Arc::new(store)
        } else {
            Arc::new(MemoryStore::new())
        };
        Self::with_store(config, store).await
    }

    /// Create a transient trainer.
    pub async fn transient() -> Result<Self> {
        Self::new(TrainerConfig::transient()).await
    }

    /// Create a trainer over an explicit save store.
    ///
    /// `config.persist` and `config.save_dir` are ignored.
    pub async fn with_store(config: TrainerConfig, store: Arc<dyn SaveStore>) -> Result<Self> {
        let mut library = LessonLibrary::builtin().context("loading built-in lessons")?;
        if let Some(dir) = &config.lessons_dir {
            let loaded = library
                .load_dir(dir)
                .await
                .with_context(|| format!("loading lessons from {}", dir.display()))?;
            info!(dir = %dir.display(), loaded, "extra lessons loaded");
        }

        let lesson = match &config.default_lesson {
            Some(id) => library.require(id)?,
            None => library.first().context("no lessons available")?,
        };

        let tools = Arc::new(ToolRegistry::with_builtins());
        let session = Session::new(lesson, &config.home)
            .context("starting session")?
            .with_tools(Arc::clone(&tools))
            .with_end_of_lesson(config.end_of_lesson);

        Ok(Self {
            library,
            tools,
            store,
            home: config.home,
            end_of_lesson: config.end_of_lesson,
            session: Mutex::new(session),
        })
    }

    pub fn library(&self) -> &LessonLibrary {
        &self.library
    }

    /// Id of the lesson being played.
    pub async fn lesson_id(&self) -> String {
        self.session.lock().await.lesson().id.clone()
    }

    /// Run `f` against the live session.
    pub async fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&*self.session.lock().await)
    }

    pub async fn get_task(&self) -> TaskResponse {
        task_response(&*self.session.lock().await)
    }

    pub async fn get_hint(&self) -> HintResponse {
        HintResponse {
            hint: self.session.lock().await.hint().to_string(),
        }
    }

    /// Submit one line of learner input, then save.
    ///
    /// A failed save is logged; the in-memory state stays as it is.
    pub async fn submit_command(&self, input: &str) -> Submission {
        let mut session = self.session.lock().await;
        let submission = session.submit(input);
        let snapshot = session.snapshot();
        if let Err(e) = self.store.save(&snapshot).await {
            warn!(lesson = %snapshot.lesson_id, error = %e, "saving progress failed");
        }
        submission
    }

    /// Delete the save of `lesson_id` and start it over.
    pub async fn reset_progress(&self, lesson_id: &str) -> Result<TaskResponse> {
        let lesson = self.library.require(lesson_id)?;
        self.store
            .delete(lesson_id)
            .await
            .with_context(|| format!("deleting save of {}", lesson_id))?;
        info!(lesson = %lesson_id, "progress reset");
        self.replace(self.fresh(lesson)?).await
    }

    /// Start `lesson_id` from scratch. Any save stays until the next submit.
    pub async fn start_new(&self, lesson_id: &str) -> Result<TaskResponse> {
        let lesson = self.library.require(lesson_id)?;
        self.replace(self.fresh(lesson)?).await
    }

    /// Resume `lesson_id` from its save, or start it fresh.
    ///
    /// An unreadable or inconsistent save is logged and ignored.
    pub async fn continue_game(&self, lesson_id: &str) -> Result<TaskResponse> {
        let lesson = self.library.require(lesson_id)?;
        let mut session = self.fresh(lesson)?;
        match self.store.load(lesson_id).await {
            Ok(Some(snapshot)) => {
                if let Err(e) = session.rehydrate(snapshot) {
                    warn!(lesson = %lesson_id, error = %e, "ignoring unusable save");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(lesson = %lesson_id, error = %e, "ignoring unreadable save"),
        }
        self.replace(session).await
    }

    pub async fn has_save(&self, lesson_id: &str) -> Result<HasSaveResponse> {
        let has_save = self
            .store
            .exists(lesson_id)
            .await
            .with_context(|| format!("checking save of {}", lesson_id))?;
        Ok(HasSaveResponse { has_save })
    }

    pub fn list_lessons(&self) -> LessonsResponse {
        LessonsResponse {
            lessons: self.library.list(),
        }
    }

    fn fresh(&self, lesson: Arc<Lesson>) -> Result<Session> {
        let session = Session::new(lesson, &self.home)
            .context("starting session")?
            .with_tools(Arc::clone(&self.tools))
            .with_end_of_lesson(self.end_of_lesson);
        Ok(session)
    }

    async fn replace(&self, session: Session) -> Result<TaskResponse> {
        let mut live = self.session.lock().await;
        *live = session;
        Ok(task_response(&live))
    }
}

fn task_response(session: &Session) -> TaskResponse {
    TaskResponse {
        task: session.current_task().clone(),
        cwd: session.cwd().to_string(),
        progress: session.progress(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ResultCode;

    #[tokio::test]
    async fn test_transient_starts_on_first_lesson() {
        let trainer = Trainer::transient().await.unwrap();
        let task = trainer.get_task().await;
        assert_eq!(task.progress.lesson_id, "01_paths");
        assert_eq!(task.progress.index, 1);
        assert_eq!(task.cwd, DEFAULT_HOME);
        assert!(!trainer.get_hint().await.hint.is_empty());
    }

    #[tokio::test]
    async fn test_default_lesson() {
        let config = TrainerConfig {
            default_lesson: Some("02_files".into()),
            ..TrainerConfig::transient()
        };
        let trainer = Trainer::new(config).await.unwrap();
        assert_eq!(trainer.lesson_id().await, "02_files");
    }

    #[tokio::test]
    async fn test_unknown_default_lesson_fails() {
        let config = TrainerConfig {
            default_lesson: Some("99_nope".into()),
            ..TrainerConfig::transient()
        };
        assert!(Trainer::new(config).await.is_err());
    }

    #[tokio::test]
    async fn test_submit_saves() {
        let trainer = Trainer::transient().await.unwrap();
        assert!(!trainer.has_save("01_paths").await.unwrap().has_save);
        let sub = trainer.submit_command("pwd").await;
        assert!(sub.ok);
        assert_eq!(sub.feedback.code, ResultCode::Ok);
        assert!(trainer.has_save("01_paths").await.unwrap().has_save);
    }

    #[tokio::test]
    async fn test_list_lessons() {
        let trainer = Trainer::transient().await.unwrap();
        let ids: Vec<_> = trainer
            .list_lessons()
            .lessons
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["01_paths", "02_files"]);
    }
}
