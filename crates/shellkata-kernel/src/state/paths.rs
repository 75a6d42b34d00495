//! XDG Base Directory paths for shellkata state.
//!
//! | Purpose | XDG Variable | Default | shellkata Path |
//! |---------|--------------|---------|----------------|
//! | Saves | `$XDG_DATA_HOME` | `~/.local/share` | `$XDG_DATA_HOME/shellkata/saves/` |
//! | Lessons | `$XDG_DATA_HOME` | `~/.local/share` | `$XDG_DATA_HOME/shellkata/lessons/` |

use std::path::PathBuf;

use directories::BaseDirs;

/// Get the data directory for persistent state.
///
/// Uses `$XDG_DATA_HOME/shellkata` or falls back to `~/.local/share/shellkata`.
pub fn data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| home_fallback().join(".local").join("share"))
        .join("shellkata")
}

/// Directory holding one save file per lesson.
pub fn saves_dir() -> PathBuf {
    data_dir().join("saves")
}

/// Directory scanned for extra lesson files.
pub fn lessons_dir() -> PathBuf {
    data_dir().join("lessons")
}

fn home_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_data_dir() {
        let data = data_dir();
        assert!(data.ends_with("shellkata"));
        assert!(saves_dir().starts_with(&data));
        assert!(saves_dir().ends_with("saves"));
        assert!(lessons_dir().ends_with("lessons"));
    }
}
