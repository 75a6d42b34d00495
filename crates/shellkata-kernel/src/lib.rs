//! shellkata-kernel: the engine of an interactive shell trainer.
//!
//! A learner types shell commands; the kernel checks them against the rules
//! of the current lesson task, runs them on a virtual filesystem and grades
//! the resulting state.
//!
//! This crate provides:
//!
//! - **VFS**: an owned in-memory tree of directories and files
//! - **Tools**: `pwd`, `ls`, `cd`, `mkdir`, `touch` behind a registry
//! - **Validator**: the rule gate run before any command executes
//! - **Goal checker**: declarative assertions over the post-command state
//! - **Session**: the per-learner state machine and its snapshots
//! - **Lessons**: JSON lesson files and the built-in library
//! - **State**: async save stores (on disk or in memory)
//! - **Trainer**: the async facade front ends talk to

pub mod goal;
pub mod lesson;
pub mod path;
pub mod result;
pub mod session;
pub mod state;
pub mod tools;
pub mod trainer;
pub mod validator;
pub mod vfs;

pub use lesson::{Lesson, LessonError, LessonLibrary, Task};
pub use result::{Category, Effects, ExecResult, ResultCode};
pub use session::{EndOfLesson, Outcome, Progress, Session, SessionError, Snapshot, Submission};
pub use state::{FileStore, MemoryStore, SaveStore, StoreError};
pub use trainer::{Trainer, TrainerConfig};
pub use vfs::{MemoryFs, VfsError};
