//! cd: Change working directory.

use super::single_arg;
use crate::result::{ExecResult, ResultCode};
use crate::tools::{ExecContext, Tool};

/// Cd tool: change current working directory.
///
/// The new directory travels back as an effect; the session applies it.
pub struct Cd;

impl Tool for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn summary(&self) -> &str {
        "Change the current directory"
    }

    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ExecResult {
        let path = match single_arg(args, "cd needs a path.", "cd takes exactly one argument.") {
            Ok(path) => path,
            Err(result) => return result,
        };

        let target = ctx.resolve_path(path);

        if !ctx.vfs.exists(&target) {
            return ExecResult::failure(
                ResultCode::ErrNoSuchDir,
                format!("No such directory: {}.", target),
            );
        }
        if !ctx.vfs.is_dir(&target) {
            return ExecResult::failure(ResultCode::ErrNotDir, format!("Not a directory: {}.", target));
        }

        ExecResult::success("cd", args).with_cwd(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::{args, seeded, HOME};

    #[test]
    fn test_cd_subdir() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        let result = Cd.execute(&args(&["projects"]), &mut ctx);
        assert!(result.ok());
        assert_eq!(result.effects.cwd.as_deref(), Some("/home/student/projects"));
        assert_eq!(result.effects.last_cmd.as_deref(), Some("cd"));
    }

    #[test]
    fn test_cd_root_and_home() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, "/home/student/projects", HOME);

        let result = Cd.execute(&args(&["/"]), &mut ctx);
        assert_eq!(result.effects.cwd.as_deref(), Some("/"));

        let result = Cd.execute(&args(&["~"]), &mut ctx);
        assert_eq!(result.effects.cwd.as_deref(), Some(HOME));

        let result = Cd.execute(&args(&[".."]), &mut ctx);
        assert_eq!(result.effects.cwd.as_deref(), Some(HOME));
    }

    #[test]
    fn test_cd_file_fails() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        let result = Cd.execute(&args(&["readme.txt"]), &mut ctx);
        assert_eq!(result.code, ResultCode::ErrNotDir);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_cd_nonexistent() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        let result = Cd.execute(&args(&["/nope"]), &mut ctx);
        assert_eq!(result.code, ResultCode::ErrNoSuchDir);
        assert!(result.message.contains("/nope"));
    }

    #[test]
    fn test_cd_arg_count() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        assert_eq!(Cd.execute(&[], &mut ctx).code, ResultCode::ErrMissingArg);
        assert_eq!(
            Cd.execute(&args(&["a", "b"]), &mut ctx).code,
            ResultCode::ErrTooManyArgs
        );
    }
}
