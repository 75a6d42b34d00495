//! Declarative goal conditions.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One machine-checkable condition over the session state.
///
/// Lesson JSON writes these as `{"type": "exists_dir", "path": "notes"}`.
/// Records that don't parse are kept as [`Assertion::Unknown`] or
/// [`Assertion::Malformed`] rather than rejected, so the goal checker can
/// report them to the learner as lesson defects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Assertion {
    /// `path` exists and is a directory.
    ExistsDir { path: String },
    /// `path` exists and is a file.
    ExistsFile { path: String },
    /// The working directory is `value`.
    CwdIs { value: String },
    /// The last successful command was `value`.
    LastCmdIs { value: String },
    /// The last successful command was given the flag `value`.
    HasFlag { value: String },
    /// A `type` nobody implements.
    Unknown { tag: String, raw: Value },
    /// Not an object, no `type`, or missing its operand.
    Malformed { reason: String, raw: Value },
}

impl Assertion {
    /// The tag as written in lesson data.
    pub fn tag(&self) -> &str {
        match self {
            Assertion::ExistsDir { .. } => "exists_dir",
            Assertion::ExistsFile { .. } => "exists_file",
            Assertion::CwdIs { .. } => "cwd_is",
            Assertion::LastCmdIs { .. } => "last_cmd_is",
            Assertion::HasFlag { .. } => "has_flag",
            Assertion::Unknown { tag, .. } => tag,
            Assertion::Malformed { .. } => "malformed",
        }
    }
}

enum Rejected {
    Unknown(String),
    Malformed(String),
}

fn parse(raw: &Value) -> Result<Assertion, Rejected> {
    let obj = raw
        .as_object()
        .ok_or_else(|| Rejected::Malformed("assertion must be an object".to_string()))?;
    let tag = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Rejected::Malformed("assertion has no string `type`".to_string()))?;

    let operand = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Rejected::Malformed(format!("{} has no string `{}`", tag, key)))
    };

    match tag {
        "exists_dir" => Ok(Assertion::ExistsDir { path: operand("path")? }),
        "exists_file" => Ok(Assertion::ExistsFile { path: operand("path")? }),
        "cwd_is" => Ok(Assertion::CwdIs { value: operand("value")? }),
        "last_cmd_is" => Ok(Assertion::LastCmdIs { value: operand("value")? }),
        "has_flag" => Ok(Assertion::HasFlag { value: operand("value")? }),
        other => Err(Rejected::Unknown(other.to_string())),
    }
}

impl From<Value> for Assertion {
    fn from(raw: Value) -> Self {
        match parse(&raw) {
            Ok(assertion) => assertion,
            Err(Rejected::Unknown(tag)) => Assertion::Unknown { tag, raw },
            Err(Rejected::Malformed(reason)) => Assertion::Malformed { reason, raw },
        }
    }
}

impl From<Assertion> for Value {
    fn from(assertion: Assertion) -> Self {
        match assertion {
            Assertion::ExistsDir { path } => json!({"type": "exists_dir", "path": path}),
            Assertion::ExistsFile { path } => json!({"type": "exists_file", "path": path}),
            Assertion::CwdIs { value } => json!({"type": "cwd_is", "value": value}),
            Assertion::LastCmdIs { value } => json!({"type": "last_cmd_is", "value": value}),
            Assertion::HasFlag { value } => json!({"type": "has_flag", "value": value}),
            Assertion::Unknown { raw, .. } | Assertion::Malformed { raw, .. } => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(s: &str) -> Assertion {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn known_tags_parse() {
        assert_eq!(
            parse_str(r#"{"type": "exists_dir", "path": "notes"}"#),
            Assertion::ExistsDir { path: "notes".into() }
        );
        assert_eq!(
            parse_str(r#"{"type": "has_flag", "value": "-l"}"#),
            Assertion::HasFlag { value: "-l".into() }
        );
    }

    #[test]
    fn unknown_tag_is_kept() {
        let a = parse_str(r#"{"type": "is_sunny"}"#);
        assert!(matches!(&a, Assertion::Unknown { tag, .. } if tag == "is_sunny"));
        assert_eq!(a.tag(), "is_sunny");
    }

    #[test]
    fn missing_operand_is_malformed() {
        let a = parse_str(r#"{"type": "cwd_is", "path": "/tmp"}"#);
        assert!(matches!(&a, Assertion::Malformed { reason, .. } if reason.contains("cwd_is")));
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(parse_str("42"), Assertion::Malformed { .. }));
        assert!(matches!(parse_str(r#"{"path": "x"}"#), Assertion::Malformed { .. }));
    }

    #[test]
    fn serializes_back_to_lesson_form() {
        let raw = json!({"type": "exists_file", "path": "a/b.txt"});
        let a: Assertion = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&a).unwrap(), raw);

        let odd = json!({"type": "mystery", "x": 1});
        let a: Assertion = serde_json::from_value(odd.clone()).unwrap();
        assert_eq!(serde_json::to_value(&a).unwrap(), odd);
    }
}
