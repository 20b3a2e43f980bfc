//! Working directory port
//!
//! Every invocation runs in an exclusive directory. The directory is
//! removed when its guard is dropped, unless it has been marked to be
//! kept (debug runs).

use std::path::Path;

pub trait Workspace: Send + Sync {
    fn path(&self) -> &Path;

    /// Keep the directory on drop.
    fn keep(&mut self);

    fn is_kept(&self) -> bool;
}

pub trait WorkspaceProvider: Send + Sync {
    fn create(&self, tool_name: &str) -> std::io::Result<Box<dyn Workspace>>;
}
