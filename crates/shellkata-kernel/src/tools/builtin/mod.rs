//! Built-in commands.
//!
//! The trainer supports a deliberately small set: `pwd`, `ls`, `cd`,
//! `mkdir` and `touch`.

mod cd;
mod ls;
mod mkdir;
mod pwd;
mod touch;

use super::ToolRegistry;
use crate::result::{ExecResult, ResultCode};

/// Register all built-in tools with the registry.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(pwd::Pwd);
    registry.register(ls::Ls);
    registry.register(cd::Cd);
    registry.register(mkdir::Mkdir);
    registry.register(touch::Touch);
}

/// Require exactly one argument.
fn single_arg<'a>(
    args: &'a [String],
    missing: &str,
    too_many: &str,
) -> Result<&'a str, ExecResult> {
    match args {
        [] => Err(ExecResult::failure(ResultCode::ErrMissingArg, missing)),
        [arg] => Ok(arg.as_str()),
        _ => Err(ExecResult::failure(ResultCode::ErrTooManyArgs, too_many)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::vfs::MemoryFs;

    pub const HOME: &str = "/home/student";

    pub fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    pub fn seeded() -> MemoryFs {
        MemoryFs::seeded(HOME).unwrap()
    }
}
