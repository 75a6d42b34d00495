//! Execution context for tools.

use crate::path::normalize;
use crate::vfs::MemoryFs;

/// Execution context passed to tools.
///
/// Borrows the session's filesystem for the duration of one command.
pub struct ExecContext<'a> {
    /// Virtual filesystem.
    pub vfs: &'a mut MemoryFs,
    /// Current working directory (absolute, normalized).
    pub cwd: &'a str,
    /// Home directory, for `~` expansion.
    pub home: &'a str,
}

impl<'a> ExecContext<'a> {
    /// Create a new execution context.
    pub fn new(vfs: &'a mut MemoryFs, cwd: &'a str, home: &'a str) -> Self {
        Self { vfs, cwd, home }
    }

    /// Resolve a path argument relative to cwd and home.
    pub fn resolve_path(&self, raw: &str) -> String {
        normalize(raw, self.cwd, self.home)
    }
}
