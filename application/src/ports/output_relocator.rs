//! Output relocator port
//!
//! Applies a tool's relocators after a successful run: files the tool left
//! in the working directory are moved onto the paths of an output port.

use std::collections::BTreeMap;
use std::path::Path;
use toolbridge_domain::Relocator;

pub trait OutputRelocator: Send + Sync {
    /// Move matching files; returns how many were moved.
    fn relocate(
        &self,
        working_dir: &Path,
        relocators: &[Relocator],
        outputs: &BTreeMap<String, Vec<String>>,
    ) -> std::io::Result<usize>;
}

/// Relocator that leaves every file where the tool wrote it.
pub struct NoRelocation;

impl OutputRelocator for NoRelocation {
    fn relocate(
        &self,
        _working_dir: &Path,
        _relocators: &[Relocator],
        _outputs: &BTreeMap<String, Vec<String>>,
    ) -> std::io::Result<usize> {
        Ok(0)
    }
}
