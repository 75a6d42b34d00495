//! Commands the learner can run, and the registry that dispatches them.

mod builtin;
mod context;
mod registry;
mod traits;

pub use builtin::register_builtins;
pub use context::ExecContext;
pub use registry::{unknown_command, ToolRegistry};
pub use traits::Tool;
