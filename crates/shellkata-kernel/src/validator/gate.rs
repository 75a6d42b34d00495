//! The rule gate.

use tracing::debug;

use crate::lesson::{AssertList, CommandList, Rule, RuleKind};
use crate::result::{ExecResult, ResultCode};
use crate::tools::{unknown_command, ToolRegistry};

/// A command line that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    /// Command name, lowercased.
    pub cmd: String,
    pub args: Vec<String>,
}

/// Split input with shell quoting rules.
pub fn tokenize(input: &str) -> Result<Vec<String>, ExecResult> {
    let tokens = shell_words::split(input.trim()).map_err(|e| {
        debug!(error = %e, "unparseable input");
        ExecResult::failure(
            ResultCode::ErrParse,
            "Could not parse the command (check your quotes).",
        )
    })?;
    if tokens.is_empty() {
        return Err(ExecResult::failure(ResultCode::ErrEmpty, "Empty command."));
    }
    Ok(tokens)
}

/// Check `input` against `rule` without running anything.
pub fn admit(input: &str, rule: &Rule, registry: &ToolRegistry) -> Result<Admitted, ExecResult> {
    let mut tokens = tokenize(input)?;
    let cmd = tokens.remove(0).to_lowercase();
    let args = tokens;

    if !registry.contains(&cmd) {
        return Err(unknown_command(&cmd));
    }

    if let RuleKind::Other(kind) = &rule.kind {
        return Err(ExecResult::failure(
            ResultCode::ErrUnknownKind,
            format!("Lesson error: unknown rule kind '{}', expected 'goal'.", kind),
        ));
    }

    let allowed = match &rule.allowed_cmds {
        CommandList::Names(names) => names,
        CommandList::Malformed(_) => {
            return Err(ExecResult::failure(
                ResultCode::ErrBadRule,
                "Lesson error: allowed_cmds must be a list of strings.",
            ));
        }
    };

    if let AssertList::Malformed(_) = &rule.assertions {
        return Err(ExecResult::failure(
            ResultCode::ErrBadRule,
            "Lesson error: assert must be a list.",
        ));
    }

    if !allowed.iter().any(|name| name.to_lowercase() == cmd) {
        return Err(ExecResult::failure(
            ResultCode::ErrCmdNotAllowed,
            format!(
                "'{}' can't be used in this task. Allowed: {}",
                cmd,
                allowed.join(", ")
            ),
        ));
    }

    if let Some(expected) = rule.expected() {
        if cmd != expected {
            return Err(ExecResult::failure(
                ResultCode::ErrWrongCmd,
                format!("This task expects the command '{}'.", expected),
            ));
        }
    }

    Ok(Admitted { cmd, args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(value: serde_json::Value) -> Rule {
        serde_json::from_value(value).unwrap()
    }

    fn code_of(input: &str, r: &Rule) -> ResultCode {
        let registry = ToolRegistry::with_builtins();
        match admit(input, r, &registry) {
            Ok(_) => ResultCode::Ok,
            Err(result) => result.code,
        }
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"touch "my file.txt""#).unwrap(),
            vec!["touch", "my file.txt"]
        );
        assert_eq!(
            tokenize(r#"cd 'a b'"#).unwrap(),
            vec!["cd", "a b"]
        );
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(tokenize("cd \"oops").unwrap_err().code, ResultCode::ErrParse);
        assert_eq!(tokenize("   ").unwrap_err().code, ResultCode::ErrEmpty);
    }

    #[test]
    fn test_admit_lowercases_command() {
        let r = rule(json!({"kind": "goal", "allowed_cmds": ["CD"]}));
        let registry = ToolRegistry::with_builtins();
        let admitted = admit("Cd Projects", &r, &registry).unwrap();
        assert_eq!(admitted.cmd, "cd");
        assert_eq!(admitted.args, vec!["Projects"]);
    }

    #[test]
    fn test_unknown_command_wins_over_allowed_list() {
        let r = rule(json!({"kind": "goal", "allowed_cmds": ["foo"]}));
        assert_eq!(code_of("foo", &r), ResultCode::ErrUnknownCmd);
        let r = rule(json!({"kind": "goal", "allowed_cmds": ["pwd"]}));
        assert_eq!(code_of("foo", &r), ResultCode::ErrUnknownCmd);
    }

    #[test]
    fn test_rule_shape_errors() {
        let r = rule(json!({"kind": "quiz", "allowed_cmds": ["pwd"]}));
        assert_eq!(code_of("pwd", &r), ResultCode::ErrUnknownKind);

        let r = rule(json!({"kind": "goal", "allowed_cmds": "pwd"}));
        assert_eq!(code_of("pwd", &r), ResultCode::ErrBadRule);

        let r = rule(json!({"kind": "goal", "allowed_cmds": ["pwd"], "assert": "yes"}));
        assert_eq!(code_of("pwd", &r), ResultCode::ErrBadRule);
    }

    #[test]
    fn test_policy_errors() {
        let r = rule(json!({"kind": "goal", "allowed_cmds": ["cd", "ls"], "expected_cmd": "cd"}));
        assert_eq!(code_of("pwd", &r), ResultCode::ErrCmdNotAllowed);
        assert_eq!(code_of("ls", &r), ResultCode::ErrWrongCmd);
        assert_eq!(code_of("CD ..", &r), ResultCode::Ok);
    }

    #[test]
    fn test_not_allowed_lists_choices() {
        let r = rule(json!({"kind": "goal", "allowed_cmds": ["cd", "ls"]}));
        let registry = ToolRegistry::with_builtins();
        let err = admit("mkdir x", &r, &registry).unwrap_err();
        assert!(err.message.contains("cd, ls"));
    }
}
