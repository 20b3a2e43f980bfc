//! Per-invocation working directories
//!
//! Directory names are `<tool>-<timestamp>-<pid>-<n>`, created with
//! `create_dir` so two invocations can never share one.

use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use toolbridge_application::{Workspace, WorkspaceProvider};
use tracing::{debug, warn};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Exclusive directory removed on drop unless kept.
#[derive(Debug)]
pub struct WorkingDirectory {
    path: PathBuf,
    keep: bool,
}

impl WorkingDirectory {
    pub fn create(base: &Path, tool_name: &str) -> io::Result<Self> {
        fs::create_dir_all(base)?;
        loop {
            let name = format!(
                "{}-{}-{}-{}",
                sanitize(tool_name),
                Local::now().format("%Y%m%d%H%M%S"),
                std::process::id(),
                COUNTER.fetch_add(1, Ordering::Relaxed)
            );
            let path = base.join(name);
            match fs::create_dir(&path) {
                Ok(()) => {
                    debug!("Created working directory {}", path.display());
                    return Ok(Self { path, keep: false });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl Workspace for WorkingDirectory {
    fn path(&self) -> &Path {
        &self.path
    }

    fn keep(&mut self) {
        self.keep = true;
    }

    fn is_kept(&self) -> bool {
        self.keep
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        if self.keep {
            debug!("Keeping working directory {}", self.path.display());
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.path) {
            warn!(
                "Failed to remove working directory {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Creates working directories under a base directory.
#[derive(Debug, Clone)]
pub struct LocalWorkspaceProvider {
    base: PathBuf,
}

impl LocalWorkspaceProvider {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl Default for LocalWorkspaceProvider {
    /// `<system temp>/toolbridge`
    fn default() -> Self {
        Self::new(std::env::temp_dir().join("toolbridge"))
    }
}

impl WorkspaceProvider for LocalWorkspaceProvider {
    fn create(&self, tool_name: &str) -> io::Result<Box<dyn Workspace>> {
        Ok(Box::new(WorkingDirectory::create(&self.base, tool_name)?))
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "tool".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directories_are_exclusive_and_removed() {
        let base = tempfile::tempdir().unwrap();
        let provider = LocalWorkspaceProvider::new(base.path());

        let first = provider.create("Sort").unwrap();
        let second = provider.create("Sort").unwrap();
        assert_ne!(first.path(), second.path());
        assert!(first.path().is_dir());

        let path = first.path().to_path_buf();
        std::fs::write(path.join("scratch.txt"), "x").unwrap();
        drop(first);
        assert!(!path.exists());
        assert!(second.path().is_dir());
    }

    #[test]
    fn test_kept_directory_survives_drop() {
        let base = tempfile::tempdir().unwrap();
        let mut workspace = WorkingDirectory::create(base.path(), "Sort").unwrap();
        workspace.keep();
        assert!(workspace.is_kept());

        let path = workspace.path().to_path_buf();
        drop(workspace);
        assert!(path.is_dir());
    }

    #[test]
    fn test_tool_name_is_sanitized() {
        let base = tempfile::tempdir().unwrap();
        let workspace = WorkingDirectory::create(base.path(), "a/b c").unwrap();
        let name = workspace.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("a_b_c-"));
        assert_eq!(workspace.path().parent(), Some(base.path()));
    }
}
