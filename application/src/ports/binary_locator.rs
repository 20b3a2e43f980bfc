//! Binary locator port
//!
//! Resolves the executable a tool runs. Queried by the process executor
//! before anything is generated or spawned.

use std::path::PathBuf;

pub trait BinaryLocator: Send + Sync {
    /// Resolve `(plugin, tool, executable)` to an absolute path.
    ///
    /// Returns `None` when the executable cannot be found.
    fn locate(&self, plugin_id: &str, tool_name: &str, executable_name: &str) -> Option<PathBuf>;
}
