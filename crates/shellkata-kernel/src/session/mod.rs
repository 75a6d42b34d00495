//! The session state machine.
//!
//! A [`Session`] is always "awaiting input for task T". One call to
//! [`Session::submit`] is one atomic step:
//!
//! ```text
//! input ─► rule gate ─► dispatcher ─► apply effects ─► goal check ─► outcome
//!            │              │                              │
//!            └── Error ◄────┘                              ├─ GoalPending
//!                                                          └─ Success (advance)
//! ```
//!
//! Attempts are counted before anything else, so rejected input still
//! counts. Effects of a successful command stick even when the goal is not
//! met yet: a `cd` moves the learner regardless of grading.

mod snapshot;

pub use snapshot::Snapshot;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::goal::{self, GoalState};
use crate::lesson::{AssertList, Lesson, Rule, Task};
use crate::path::{collapse, segments};
use crate::result::{Category, Effects, ResultCode};
use crate::tools::{ExecContext, ToolRegistry};
use crate::validator::admit;
use crate::vfs::{MemoryFs, VfsError};

/// Default home directory of the learner.
pub const DEFAULT_HOME: &str = "/home/student";

/// Errors creating or restoring a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("filesystem: {0}")]
    Vfs(#[from] VfsError),
    #[error("snapshot belongs to lesson {found}, not {expected}")]
    LessonMismatch { expected: String, found: String },
}

/// What happens after the last task is solved.
///
/// The trainer historically just stays on the last task; `Complete` marks
/// the session finished instead. Either way the learner may keep typing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfLesson {
    #[default]
    StayOnLastTask,
    Complete,
}

/// Where the cursor went after a solved task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advance {
    /// Moved to this (0-based) task.
    Next(usize),
    /// Last task solved, cursor stays.
    StayedOnLast,
    /// Last task solved under [`EndOfLesson::Complete`].
    LessonComplete,
}

/// Classification of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { advance: Advance },
    /// The command ran, the goal is not reached yet.
    GoalPending { outstanding: Vec<String> },
    /// Rejected or failed; nothing changed except the attempt count.
    Error { code: ResultCode, message: String },
}

impl Outcome {
    pub fn code(&self) -> ResultCode {
        match self {
            Outcome::Success { .. } => ResultCode::Ok,
            Outcome::GoalPending { .. } => ResultCode::GoalNotYet,
            Outcome::Error { code, .. } => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn feedback(&self) -> Feedback {
        let text = match self {
            Outcome::Success { .. } => "Goal reached.".to_string(),
            Outcome::GoalPending { outstanding } => outstanding.join("\n"),
            Outcome::Error { message, .. } => message.clone(),
        };
        let code = self.code();
        Feedback {
            kind: code.category().into(),
            code,
            text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Warn,
    Error,
}

impl From<Category> for FeedbackKind {
    fn from(category: Category) -> Self {
        match category {
            Category::Ok => FeedbackKind::Success,
            Category::GoalPending => FeedbackKind::Warn,
            Category::Parse | Category::RuleShape | Category::Policy | Category::Command => {
                FeedbackKind::Error
            }
        }
    }
}

/// Learner-facing verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub code: ResultCode,
    pub text: String,
}

/// Public fields of a task, without its rule and hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub id: String,
    pub title: String,
    pub prompt: String,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            prompt: task.prompt.clone(),
        }
    }
}

/// Progress counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub lesson_id: String,
    pub lesson_title: String,
    /// 1-based position of the current task.
    pub index: usize,
    pub total: usize,
    pub correct: u32,
    pub attempts: u32,
    pub complete: bool,
}

/// Everything the front end needs after one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub ok: bool,
    pub terminal_lines: Vec<String>,
    pub feedback: Feedback,
    /// The current task after this submission (advanced on success).
    pub task: TaskSummary,
    pub cwd: String,
    pub progress: Progress,
    #[serde(skip)]
    pub outcome: Outcome,
}

/// One learner working through one lesson.
pub struct Session {
    lesson: Arc<Lesson>,
    tools: Arc<ToolRegistry>,
    end_of_lesson: EndOfLesson,
    home: String,
    cwd: String,
    last_cmd: String,
    last_args: Vec<String>,
    index: usize,
    attempts: u32,
    correct: u32,
    complete: bool,
    vfs: MemoryFs,
}

impl Session {
    /// Start `lesson` from scratch with a freshly seeded filesystem.
    ///
    /// The lesson's start directory is created if the seed lacks it.
    pub fn new(lesson: Arc<Lesson>, home: &str) -> Result<Self, SessionError> {
        let home = collapse(home);
        let mut vfs = MemoryFs::seeded(&home)?;
        let cwd = collapse(&lesson.start_cwd);
        vfs.ensure_dir(&cwd)?;

        info!(lesson = %lesson.id, %cwd, "session started");
        Ok(Self {
            lesson,
            tools: Arc::new(ToolRegistry::with_builtins()),
            end_of_lesson: EndOfLesson::default(),
            home,
            cwd,
            last_cmd: String::new(),
            last_args: Vec::new(),
            index: 0,
            attempts: 0,
            correct: 0,
            complete: false,
            vfs,
        })
    }

    /// Rebuild a session of `lesson` from a snapshot.
    pub fn restore(lesson: Arc<Lesson>, home: &str, snapshot: Snapshot) -> Result<Self, SessionError> {
        let mut session = Self::new(lesson, home)?;
        session.rehydrate(snapshot)?;
        Ok(session)
    }

    pub fn with_end_of_lesson(mut self, policy: EndOfLesson) -> Self {
        self.end_of_lesson = policy;
        self
    }

    /// Share a tool registry instead of the default built-ins.
    pub fn with_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn home(&self) -> &str {
        &self.home
    }

    /// Shell prompt for the next line, `<user>@trainer:<cwd>$ `. The user is
    /// the last segment of the home directory.
    pub fn prompt(&self) -> String {
        let user = segments(&self.home).last().copied().unwrap_or("student");
        format!("{}@trainer:{}$ ", user, self.cwd)
    }

    pub fn last_cmd(&self) -> &str {
        &self.last_cmd
    }

    pub fn last_args(&self) -> &[String] {
        &self.last_args
    }

    /// 0-based index of the current task.
    pub fn task_index(&self) -> usize {
        self.index
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn vfs(&self) -> &MemoryFs {
        &self.vfs
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn current_task(&self) -> &Task {
        // index is kept within 0..tasks.len() and lessons are never empty
        &self.lesson.tasks[self.index]
    }

    pub fn hint(&self) -> &str {
        &self.current_task().hint
    }

    pub fn progress(&self) -> Progress {
        Progress {
            lesson_id: self.lesson.id.clone(),
            lesson_title: self.lesson.title.clone(),
            index: self.index + 1,
            total: self.lesson.tasks.len(),
            correct: self.correct,
            attempts: self.attempts,
            complete: self.complete,
        }
    }

    /// Run one line of learner input against the current task.
    pub fn submit(&mut self, input: &str) -> Submission {
        self.attempts = self.attempts.saturating_add(1);

        let lesson = Arc::clone(&self.lesson);
        let task = &lesson.tasks[self.index];
        let echo = format!("{}{}", self.prompt(), input);

        let (outcome, output) = self.step(input, &task.rule);
        debug!(task = %task.id, code = %outcome.code(), "submission graded");

        let mut terminal_lines = vec![echo];
        terminal_lines.extend(output);
        match &outcome {
            Outcome::Success { .. } => {
                terminal_lines.push("✅ OK".to_string());
                terminal_lines.push(task.success_explain.clone());
            }
            Outcome::GoalPending { outstanding } => {
                terminal_lines.extend(outstanding.iter().map(|line| format!("⚠️ {}", line)));
            }
            Outcome::Error { message, .. } => {
                terminal_lines.push(format!("❌ {}", message));
            }
        }

        Submission {
            ok: outcome.is_success(),
            terminal_lines,
            feedback: outcome.feedback(),
            task: TaskSummary::from(self.current_task()),
            cwd: self.cwd.clone(),
            progress: self.progress(),
            outcome,
        }
    }

    /// Gate, dispatch, apply, grade. Returns the outcome and output lines.
    fn step(&mut self, input: &str, rule: &Rule) -> (Outcome, Vec<String>) {
        let admitted = match admit(input, rule, &self.tools) {
            Ok(admitted) => admitted,
            Err(rejected) => {
                return (
                    Outcome::Error {
                        code: rejected.code,
                        message: rejected.message,
                    },
                    Vec::new(),
                );
            }
        };

        let result = {
            let mut ctx = ExecContext::new(&mut self.vfs, &self.cwd, &self.home);
            self.tools.dispatch(&admitted.cmd, &admitted.args, &mut ctx)
        };
        if !result.ok() {
            return (
                Outcome::Error {
                    code: result.code,
                    message: result.message,
                },
                Vec::new(),
            );
        }

        let output = self.apply(result.effects);

        let assertions = match &rule.assertions {
            AssertList::List(list) => list.as_slice(),
            // the gate refuses malformed lists before dispatch
            AssertList::Malformed(_) => &[],
        };
        let report = goal::check(
            assertions,
            &GoalState {
                cwd: &self.cwd,
                home: &self.home,
                vfs: &self.vfs,
                last_cmd: &self.last_cmd,
                last_args: &self.last_args,
            },
        );

        if !report.met() {
            return (
                Outcome::GoalPending {
                    outstanding: report.outstanding,
                },
                output,
            );
        }

        self.correct = self.correct.saturating_add(1);
        let advance = self.advance();
        (Outcome::Success { advance }, output)
    }

    /// Apply effects to the session. Returns the output lines.
    fn apply(&mut self, effects: Effects) -> Vec<String> {
        let Effects {
            cwd,
            last_cmd,
            last_args,
            output,
        } = effects;
        if let Some(cwd) = cwd {
            self.cwd = cwd;
        }
        if let Some(cmd) = last_cmd {
            self.last_cmd = cmd;
        }
        if let Some(args) = last_args {
            self.last_args = args;
        }
        output
    }

    fn advance(&mut self) -> Advance {
        if self.index + 1 < self.lesson.tasks.len() {
            self.index += 1;
            info!(lesson = %self.lesson.id, task = self.index + 1, "advanced to next task");
            return Advance::Next(self.index);
        }
        match self.end_of_lesson {
            EndOfLesson::StayOnLastTask => Advance::StayedOnLast,
            EndOfLesson::Complete => {
                if !self.complete {
                    info!(lesson = %self.lesson.id, "lesson complete");
                }
                self.complete = true;
                Advance::LessonComplete
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("lesson", &self.lesson.id)
            .field("cwd", &self.cwd)
            .field("index", &self.index)
            .field("attempts", &self.attempts)
            .field("correct", &self.correct)
            .field("complete", &self.complete)
            .finish()
    }
}
