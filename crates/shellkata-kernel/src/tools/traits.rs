//! The Tool trait implemented by every supported command.

use super::ExecContext;
use crate::result::ExecResult;

/// A command the learner can run.
///
/// Tools are synchronous: each one is a bounded walk over the in-memory
/// tree. A tool reports what happened through its [`ExecResult`]; it may
/// mutate the VFS directly but must leave it untouched when it fails, and
/// it never changes the session itself. Directory changes travel back as
/// effects.
pub trait Tool: Send + Sync {
    /// Command name, lowercase.
    fn name(&self) -> &str;

    /// One-line description for help listings.
    fn summary(&self) -> &str;

    /// Run with the already-tokenized arguments (command name excluded).
    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ExecResult;
}
