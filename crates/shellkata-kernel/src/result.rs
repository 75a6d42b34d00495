//! ExecResult: the structured result of every command attempt.
//!
//! Whatever happens to a learner's input, from a quoting mistake to a
//! successful `cd`, it comes back as an [`ExecResult`]: a [`ResultCode`], a
//! human-readable message and the [`Effects`] the session should apply.
//! The dispatcher never decides whether a goal is met, only what happened.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, machine-readable outcome code.
///
/// Serialized in the `ERR_*` form the front end keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Ok,
    // parse
    ErrParse,
    ErrEmpty,
    // lesson shape
    ErrUnknownKind,
    ErrBadRule,
    // policy
    ErrCmdNotAllowed,
    ErrWrongCmd,
    // command execution
    ErrUnknownCmd,
    ErrUnexpectedArgs,
    ErrUnexpectedPath,
    ErrMissingArg,
    ErrTooManyArgs,
    ErrNoSuchDir,
    ErrNotDir,
    ErrExists,
    ErrTouch,
    // not an error
    GoalNotYet,
}

/// Which part of the taxonomy a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ok,
    /// Unparseable or empty input.
    Parse,
    /// The lesson itself is malformed.
    RuleShape,
    /// The learner used a command the task forbids.
    Policy,
    /// The command ran and failed.
    Command,
    /// Command succeeded, goal not reached yet.
    GoalPending,
}

impl ResultCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::ErrParse => "ERR_PARSE",
            ResultCode::ErrEmpty => "ERR_EMPTY",
            ResultCode::ErrUnknownKind => "ERR_UNKNOWN_KIND",
            ResultCode::ErrBadRule => "ERR_BAD_RULE",
            ResultCode::ErrCmdNotAllowed => "ERR_CMD_NOT_ALLOWED",
            ResultCode::ErrWrongCmd => "ERR_WRONG_CMD",
            ResultCode::ErrUnknownCmd => "ERR_UNKNOWN_CMD",
            ResultCode::ErrUnexpectedArgs => "ERR_UNEXPECTED_ARGS",
            ResultCode::ErrUnexpectedPath => "ERR_UNEXPECTED_PATH",
            ResultCode::ErrMissingArg => "ERR_MISSING_ARG",
            ResultCode::ErrTooManyArgs => "ERR_TOO_MANY_ARGS",
            ResultCode::ErrNoSuchDir => "ERR_NO_SUCH_DIR",
            ResultCode::ErrNotDir => "ERR_NOT_DIR",
            ResultCode::ErrExists => "ERR_EXISTS",
            ResultCode::ErrTouch => "ERR_TOUCH",
            ResultCode::GoalNotYet => "GOAL_NOT_YET",
        }
    }

    pub fn category(self) -> Category {
        match self {
            ResultCode::Ok => Category::Ok,
            ResultCode::ErrParse | ResultCode::ErrEmpty => Category::Parse,
            ResultCode::ErrUnknownKind | ResultCode::ErrBadRule => Category::RuleShape,
            ResultCode::ErrCmdNotAllowed | ResultCode::ErrWrongCmd => Category::Policy,
            ResultCode::GoalNotYet => Category::GoalPending,
            ResultCode::ErrUnknownCmd
            | ResultCode::ErrUnexpectedArgs
            | ResultCode::ErrUnexpectedPath
            | ResultCode::ErrMissingArg
            | ResultCode::ErrTooManyArgs
            | ResultCode::ErrNoSuchDir
            | ResultCode::ErrNotDir
            | ResultCode::ErrExists
            | ResultCode::ErrTouch => Category::Command,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State changes produced by one executed command.
///
/// Closed on purpose: the session handles every field, so a new kind of
/// effect has to be wired through explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Effects {
    /// New working directory.
    pub cwd: Option<String>,
    /// Name of the command that ran.
    pub last_cmd: Option<String>,
    /// Arguments it ran with.
    pub last_args: Option<Vec<String>>,
    /// Lines printed to the terminal.
    pub output: Vec<String>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.cwd.is_none()
            && self.last_cmd.is_none()
            && self.last_args.is_none()
            && self.output.is_empty()
    }
}

/// The result of running (or refusing to run) a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    pub code: ResultCode,
    /// Human-readable message, shown to the learner on failure.
    pub message: String,
    /// Empty unless the command succeeded.
    pub effects: Effects,
}

impl ExecResult {
    /// A successful run of `cmd` with `args`.
    pub fn success(cmd: impl Into<String>, args: &[String]) -> Self {
        Self {
            code: ResultCode::Ok,
            message: "OK".to_string(),
            effects: Effects {
                last_cmd: Some(cmd.into()),
                last_args: Some(args.to_vec()),
                ..Effects::default()
            },
        }
    }

    /// A failed attempt. Carries no effects.
    pub fn failure(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            effects: Effects::default(),
        }
    }

    /// Attach terminal output.
    pub fn with_output(mut self, lines: Vec<String>) -> Self {
        self.effects.output = lines;
        self
    }

    /// Attach a working directory change.
    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.effects.cwd = Some(cwd.into());
        self
    }

    /// True if the command succeeded.
    pub fn ok(&self) -> bool {
        self.code == ResultCode::Ok
    }

    /// Output lines.
    pub fn lines(&self) -> &[String] {
        &self.effects.output
    }
}
