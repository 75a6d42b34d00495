//! pwd: Print working directory.

use crate::result::{ExecResult, ResultCode};
use crate::tools::{ExecContext, Tool};

pub struct Pwd;

impl Tool for Pwd {
    fn name(&self) -> &str {
        "pwd"
    }

    fn summary(&self) -> &str {
        "Print the current working directory"
    }

    fn execute(&self, args: &[String], ctx: &mut ExecContext<'_>) -> ExecResult {
        if !args.is_empty() {
            return ExecResult::failure(ResultCode::ErrUnexpectedArgs, "pwd takes no arguments.");
        }
        ExecResult::success("pwd", args).with_output(vec![ctx.cwd.to_string()])
    }
}
