//! Tool registry for looking up and dispatching commands.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::traits::Tool;
use super::ExecContext;
use crate::result::{ExecResult, ResultCode};

/// Registry of available tools.
///
/// Lookups are case-insensitive: names are stored lowercase.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in command.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::register_builtins(&mut registry);
        registry
    }

    /// Register a tool.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        let name = tool.name().to_lowercase();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(&name.to_lowercase()).cloned()
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(&name.to_lowercase())
    }

    /// List all tool names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// `(name, summary)` pairs, sorted by name.
    pub fn summaries(&self) -> Vec<(&str, &str)> {
        let mut list: Vec<_> = self
            .tools
            .iter()
            .map(|(name, tool)| (name.as_str(), tool.summary()))
            .collect();
        list.sort_by(|a, b| a.0.cmp(b.0));
        list
    }

    /// Run `name` with `args`.
    ///
    /// An unregistered name yields `ERR_UNKNOWN_CMD`.
    pub fn dispatch(&self, name: &str, args: &[String], ctx: &mut ExecContext<'_>) -> ExecResult {
        let Some(tool) = self.get(name) else {
            return unknown_command(name);
        };
        let result = tool.execute(args, ctx);
        debug!(cmd = tool.name(), ?args, code = %result.code, "dispatched");
        result
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// The result for a command nobody implements.
pub fn unknown_command(name: &str) -> ExecResult {
    ExecResult::failure(
        ResultCode::ErrUnknownCmd,
        format!("Command '{}' is not supported yet.", name.to_lowercase()),
    )
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
