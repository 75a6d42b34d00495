//! Goal checking.
//!
//! After a command succeeds and its effects are applied, every assertion of
//! the active task is evaluated. Evaluation never stops at the first
//! failure: the learner sees everything that is still missing.

use crate::lesson::Assertion;
use crate::path::{normalize, split_flags};
use crate::vfs::MemoryFs;

/// The state assertions are evaluated against, after effects are applied.
#[derive(Debug, Clone, Copy)]
pub struct GoalState<'a> {
    pub cwd: &'a str,
    pub home: &'a str,
    pub vfs: &'a MemoryFs,
    pub last_cmd: &'a str,
    pub last_args: &'a [String],
}

/// Outcome of a goal check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalReport {
    /// One line per unmet or broken assertion.
    pub outstanding: Vec<String>,
}

impl GoalReport {
    pub fn met(&self) -> bool {
        self.outstanding.is_empty()
    }

    /// Outstanding goals, one per line.
    pub fn message(&self) -> String {
        self.outstanding.join("\n")
    }
}

/// Evaluate every assertion.
pub fn check(assertions: &[Assertion], state: &GoalState<'_>) -> GoalReport {
    GoalReport {
        outstanding: assertions
            .iter()
            .filter_map(|a| evaluate(a, state))
            .collect(),
    }
}

/// `None` if the assertion holds, otherwise the diagnostic.
fn evaluate(assertion: &Assertion, state: &GoalState<'_>) -> Option<String> {
    match assertion {
        Assertion::ExistsDir { path } => {
            let p = normalize(path, state.cwd, state.home);
            (!state.vfs.is_dir(&p)).then(|| format!("Directory not there yet: {}", p))
        }
        Assertion::ExistsFile { path } => {
            let p = normalize(path, state.cwd, state.home);
            (!state.vfs.is_file(&p)).then(|| format!("File not there yet: {}", p))
        }
        Assertion::CwdIs { value } => {
            let expected = normalize(value, "/", state.home);
            (normalize(state.cwd, "/", state.home) != expected)
                .then(|| format!("You need to be in: {}", expected))
        }
        Assertion::LastCmdIs { value } => (!state.last_cmd.eq_ignore_ascii_case(value.trim()))
            .then(|| format!("The expected command is: {}", value)),
        Assertion::HasFlag { value } => {
            let (flags, _) = split_flags(state.last_args);
            (!flags.iter().any(|f| f == value))
                .then(|| format!("The command needs the flag: {}", value))
        }
        Assertion::Unknown { tag, .. } => {
            Some(format!("Lesson error: unknown assertion type '{}'.", tag))
        }
        Assertion::Malformed { reason, .. } => Some(format!("Lesson error: {}.", reason)),
    }
}
