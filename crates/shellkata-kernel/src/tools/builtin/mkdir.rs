//! mkdir: Create one directory.

use super::single_arg;
use crate::result::{ExecResult, ResultCode};
use crate::tools::{ExecContext, Tool};
use crate::vfs::VfsError;

/// Mkdir tool. Not idempotent: an existing target is an error.
pub struct Mkdir;

impl Tool for Mkdir {
    fn name(&self) -> &str {
        "mkdir"
    }

    fn summary(&self) -> &str {
        "Create a directory"
    }

    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ExecResult {
        let path = match single_arg(
            args,
            "mkdir needs a directory name.",
            "mkdir creates one directory at a time.",
        ) {
            Ok(path) => path,
            Err(result) => return result,
        };

        let target = ctx.resolve_path(path);
        match ctx.vfs.mkdir(&target) {
            Ok(()) => ExecResult::success("mkdir", args),
            Err(VfsError::AlreadyExists(_)) => {
                ExecResult::failure(ResultCode::ErrExists, format!("Already exists: {}.", target))
            }
            Err(e) => ExecResult::failure(ResultCode::ErrNotDir, format!("mkdir: {}", e)),
        }
    }
}
