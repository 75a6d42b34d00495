//! Pre-execution checks for learner input.
//!
//! The rule gate runs before any command touches the filesystem. It
//! rejects, in this order:
//!
//! - **Parse**: unbalanced quotes, empty input
//! - **Unsupported commands**: names no tool implements, whatever the task allows
//! - **Lesson defects**: unknown `rule.kind`, malformed `allowed_cmds` or `assert`
//! - **Policy**: commands outside `allowed_cmds`, or not the `expected_cmd`
//!
//! A rejected attempt comes back as a failed [`ExecResult`](crate::ExecResult)
//! carrying no effects.

mod gate;

pub use gate::{admit, tokenize, Admitted};
