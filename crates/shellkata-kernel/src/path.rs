//! Lexical path handling for the virtual filesystem.
//!
//! Nothing here touches the VFS: a path is resolved against the working
//! directory and home purely by string rules, the way a POSIX shell would
//! before asking the kernel about it.

/// Resolve `raw` into a canonical absolute path.
///
/// Rules, in order:
/// 1. `~` becomes `home`, and a `~/` prefix is replaced by `home`.
/// 2. Anything not starting with `/` is joined onto `cwd`.
/// 3. `.` segments drop out, `..` pops (clamped at `/`), repeated and
///    trailing slashes collapse.
pub fn normalize(raw: &str, cwd: &str, home: &str) -> String {
    let raw = raw.trim();

    let expanded = if raw == "~" {
        home.to_string()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        format!("{}/{}", home, rest)
    } else {
        raw.to_string()
    };

    if expanded.starts_with('/') {
        collapse(&expanded)
    } else {
        collapse(&format!("{}/{}", cwd, expanded))
    }
}

/// Collapse an absolute path without any cwd or home handling.
pub fn collapse(path: &str) -> String {
    let parts = segments(path);
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Split a path into its effective segments.
///
/// The result never contains empty, `.` or `..` segments. A leading `..`
/// is dropped since the parent of `/` is `/`.
pub fn segments(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }
    parts
}

/// Partition arguments into flags and positionals.
///
/// A flag starts with `-` and is longer than one character, so a lone `-`
/// stays positional. Order within each group is preserved.
pub fn split_flags(args: &[String]) -> (Vec<String>, Vec<String>) {
    args.iter()
        .cloned()
        .partition(|arg| arg.starts_with('-') && arg.len() > 1)
}

/// True if `name` may be stored as a directory entry.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "/home/student";

    #[test]
    fn tilde_alone_is_home() {
        assert_eq!(normalize("~", "/tmp", HOME), HOME);
    }

    #[test]
    fn tilde_prefix_is_substituted() {
        assert_eq!(normalize("~/projects", "/", HOME), "/home/student/projects");
        assert_eq!(normalize("~/", "/", HOME), HOME);
    }

    #[test]
    fn tilde_user_is_not_expanded() {
        assert_eq!(normalize("~bob", "/home", HOME), "/home/~bob");
    }

    #[test]
    fn relative_joins_cwd() {
        assert_eq!(normalize("notes", HOME, HOME), "/home/student/notes");
        assert_eq!(normalize("a/b/", HOME, HOME), "/home/student/a/b");
    }

    #[test]
    fn dot_segments_collapse() {
        assert_eq!(normalize("./a/./b", "/x", HOME), "/x/a/b");
        assert_eq!(normalize("..", HOME, HOME), "/home");
        assert_eq!(normalize("../../../..", HOME, HOME), "/");
        assert_eq!(normalize("/a//b///c/", "/", HOME), "/a/b/c");
    }

    #[test]
    fn root_stays_root() {
        assert_eq!(normalize("/", HOME, HOME), "/");
        assert_eq!(normalize("//", HOME, HOME), "/");
        assert_eq!(normalize("/..", HOME, HOME), "/");
    }

    #[test]
    fn empty_input_is_cwd() {
        assert_eq!(normalize("", HOME, HOME), HOME);
        assert_eq!(normalize("   ", "/tmp", HOME), "/tmp");
    }

    #[test]
    fn split_flags_preserves_order() {
        let args: Vec<String> = ["-l", "a", "-", "--all", "b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let (flags, positionals) = split_flags(&args);
        assert_eq!(flags, vec!["-l", "--all"]);
        assert_eq!(positionals, vec!["a", "-", "b"]);
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("notes.txt"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("."));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name("a/b"));
    }
}
