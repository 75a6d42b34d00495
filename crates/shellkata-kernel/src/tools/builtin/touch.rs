//! touch: Create an empty file.

use super::single_arg;
use crate::result::{ExecResult, ResultCode};
use crate::tools::{ExecContext, Tool};

/// Touch tool. Missing parent directories are created along the way.
pub struct Touch;

impl Tool for Touch {
    fn name(&self) -> &str {
        "touch"
    }

    fn summary(&self) -> &str {
        "Create a file"
    }

    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ExecResult {
        let path = match single_arg(
            args,
            "touch needs a file name.",
            "touch creates one file at a time.",
        ) {
            Ok(path) => path,
            Err(result) => return result,
        };

        let target = ctx.resolve_path(path);
        match ctx.vfs.touch(&target) {
            Ok(()) => ExecResult::success("touch", args),
            Err(e) => ExecResult::failure(ResultCode::ErrTouch, format!("touch: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::{args, seeded, HOME};

    #[test]
    fn test_touch_with_missing_parent() {
        let mut fs = seeded();
        let cwd = "/home/student/projects";
        let mut ctx = ExecContext::new(&mut fs, cwd, HOME);
        let result = Touch.execute(&args(&["a/b.txt"]), &mut ctx);
        assert!(result.ok());
        assert!(fs.is_dir("/home/student/projects/a"));
        assert!(fs.is_file("/home/student/projects/a/b.txt"));
    }

    #[test]
    fn test_touch_existing_file() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        assert!(Touch.execute(&args(&["readme.txt"]), &mut ctx).ok());
    }

    #[test]
    fn test_touch_directory_fails() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        let result = Touch.execute(&args(&["projects"]), &mut ctx);
        assert_eq!(result.code, ResultCode::ErrTouch);
        assert!(result.message.contains("is a directory"));
    }

    #[test]
    fn test_touch_root_fails() {
        let mut fs = seeded();
        let before = fs.clone();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        let result = Touch.execute(&args(&["/"]), &mut ctx);
        assert_eq!(result.code, ResultCode::ErrTouch);
        assert_eq!(fs, before);
    }
}
