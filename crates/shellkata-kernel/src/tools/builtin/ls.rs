//! ls: List the working directory.
//!
//! Only the working directory can be listed; path arguments are refused so
//! lessons can teach `cd` first.

use crate::path::split_flags;
use crate::result::{ExecResult, ResultCode};
use crate::tools::{ExecContext, Tool};
use crate::vfs::{NodeKind, VfsError};

pub struct Ls;

impl Tool for Ls {
    fn name(&self) -> &str {
        "ls"
    }

    fn summary(&self) -> &str {
        "List the current directory (-l for long format)"
    }

    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ExecResult {
        let (flags, positionals) = split_flags(args);
        if !positionals.is_empty() {
            return ExecResult::failure(
                ResultCode::ErrUnexpectedPath,
                "ls works without a path here: use plain ls or ls -l.",
            );
        }
        let long_format = flags.iter().any(|f| f == "-l");

        let entries = match ctx.vfs.list(ctx.cwd) {
            Ok(entries) => entries,
            Err(VfsError::NotADirectory(p)) => {
                return ExecResult::failure(ResultCode::ErrNotDir, format!("Not a directory: {}.", p));
            }
            Err(e) => return ExecResult::failure(ResultCode::ErrNoSuchDir, format!("ls: {}", e)),
        };

        let lines = if long_format {
            entries
                .iter()
                .map(|e| {
                    let mode = match e.kind {
                        NodeKind::Directory => "drwxr-xr-x",
                        NodeKind::File => "-rw-r--r--",
                    };
                    format!("{}  {}", mode, e.name)
                })
                .collect()
        } else {
            let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
            vec![names.join("  ")]
        };

        ExecResult::success("ls", args).with_output(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_support::{args, seeded, HOME};

    #[test]
    fn test_ls_short() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        let result = Ls.execute(&[], &mut ctx);
        assert!(result.ok());
        assert_eq!(result.lines(), ["downloads  projects  readme.txt"]);
    }

    #[test]
    fn test_ls_long() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        let result = Ls.execute(&args(&["-l"]), &mut ctx);
        assert!(result.ok());
        assert_eq!(
            result.lines(),
            [
                "drwxr-xr-x  downloads",
                "drwxr-xr-x  projects",
                "-rw-r--r--  readme.txt",
            ]
        );
        assert_eq!(result.effects.last_args, Some(args(&["-l"])));
    }

    #[test]
    fn test_ls_empty_dir_prints_blank_line() {
        let mut fs = seeded();
        let cwd = "/home/student/projects";
        let mut ctx = ExecContext::new(&mut fs, cwd, HOME);
        let result = Ls.execute(&[], &mut ctx);
        assert!(result.ok());
        assert_eq!(result.lines(), [""]);
    }

    #[test]
    fn test_ls_rejects_path() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, HOME, HOME);
        let result = Ls.execute(&args(&["-l", "projects"]), &mut ctx);
        assert_eq!(result.code, ResultCode::ErrUnexpectedPath);
    }

    #[test]
    fn test_ls_missing_cwd() {
        let mut fs = seeded();
        let mut ctx = ExecContext::new(&mut fs, "/gone", HOME);
        let result = Ls.execute(&[], &mut ctx);
        assert_eq!(result.code, ResultCode::ErrNoSuchDir);
    }
}
