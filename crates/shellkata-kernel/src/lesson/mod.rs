//! Lessons, tasks and the rules that grade them.
//!
//! Lessons are JSON documents:
//!
//! ```json
//! {
//!   "lesson_id": "01_paths",
//!   "title": "Paths and navigation",
//!   "start_cwd": "/home/student",
//!   "tasks": [
//!     {
//!       "id": "1", "title": "Where am I?", "prompt": "...",
//!       "hint": "...", "success_explain": "...",
//!       "rule": {
//!         "kind": "goal",
//!         "allowed_cmds": ["pwd"],
//!         "expected_cmd": "pwd",
//!         "assert": [{"type": "last_cmd_is", "value": "pwd"}]
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Structural problems (missing keys, empty task list) are rejected at load
//! time. Problems *inside* a rule are kept and surface at submit time with
//! their own result codes, so a broken task is reported to the learner
//! instead of taking the whole lesson down.

mod assertion;
mod library;

pub use assertion::Assertion;
pub use library::{LessonInfo, LessonLibrary};

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors while loading lesson data.
#[derive(Debug, Error)]
pub enum LessonError {
    #[error("invalid lesson JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("lesson {0} has an empty task list")]
    EmptyTasks(String),
    #[error("reading lesson {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown lesson: {0}")]
    NotFound(String),
}

/// An ordered sequence of tasks plus a starting directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(rename = "lesson_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    pub start_cwd: String,
    pub tasks: Vec<Task>,
}

impl Lesson {
    /// Parse and validate a lesson document.
    pub fn from_json(source: &str) -> Result<Self, LessonError> {
        let lesson: Lesson = serde_json::from_str(source)?;
        if lesson.tasks.is_empty() {
            return Err(LessonError::EmptyTasks(lesson.id));
        }
        Ok(lesson)
    }

    pub fn info(&self) -> LessonInfo {
        LessonInfo {
            id: self.id.clone(),
            title: self.title.clone(),
        }
    }
}

/// One learner-facing goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub prompt: String,
    pub rule: Rule,
    #[serde(deserialize_with = "text")]
    pub hint: String,
    #[serde(deserialize_with = "text")]
    pub success_explain: String,
}

/// How a task is graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: RuleKind,
    /// Commands the learner may use for this task.
    #[serde(default)]
    pub allowed_cmds: CommandList,
    /// If set and non-blank, the only command accepted. A non-string value
    /// counts as unset.
    #[serde(
        default,
        deserialize_with = "string_or_unset",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_cmd: Option<String>,
    #[serde(default, rename = "assert")]
    pub assertions: AssertList,
}

impl Rule {
    /// The mandated command, lowercased, if the rule names one.
    pub fn expected(&self) -> Option<String> {
        self.expected_cmd
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Rule kind. Only `goal` is understood; any other value, string or not,
/// is kept as [`RuleKind::Other`] in its JSON spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum RuleKind {
    Goal,
    Other(String),
}

impl From<Value> for RuleKind {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) if s == "goal" => RuleKind::Goal,
            Value::String(s) => RuleKind::Other(s),
            other => RuleKind::Other(other.to_string()),
        }
    }
}

impl From<RuleKind> for String {
    fn from(kind: RuleKind) -> Self {
        match kind {
            RuleKind::Goal => "goal".to_string(),
            RuleKind::Other(s) => s,
        }
    }
}

/// `allowed_cmds` as written. Anything but a list of strings is kept as
/// [`CommandList::Malformed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandList {
    Names(Vec<String>),
    Malformed(Value),
}

impl Default for CommandList {
    fn default() -> Self {
        CommandList::Names(Vec::new())
    }
}

/// `assert` as written. Anything but a list is kept as
/// [`AssertList::Malformed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssertList {
    List(Vec<Assertion>),
    Malformed(Value),
}

impl Default for AssertList {
    fn default() -> Self {
        AssertList::List(Vec::new())
    }
}

/// Accept `"3"` or `3` for identifiers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

/// Learner-facing text. Numbers and other scalars are shown as written.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn string_or_unset<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}
