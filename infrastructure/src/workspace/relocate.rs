//! Glob-based output relocation
//!
//! Each relocator names an output port and a glob relative to the working
//! directory. Matches are sorted and moved, one per planned output path.

use glob::Pattern;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use toolbridge_application::OutputRelocator;
use toolbridge_domain::Relocator;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct GlobOutputRelocator;

impl OutputRelocator for GlobOutputRelocator {
    fn relocate(
        &self,
        working_dir: &Path,
        relocators: &[Relocator],
        outputs: &BTreeMap<String, Vec<String>>,
    ) -> io::Result<usize> {
        let mut moved = 0;
        for relocator in relocators {
            let Some(targets) = outputs.get(&relocator.reference) else {
                debug!("Relocator for inactive output '{}' skipped", relocator.reference);
                continue;
            };

            let matches = matching_files(working_dir, &relocator.pattern)?;
            if matches.len() != targets.len() {
                warn!(
                    "Relocator '{}' matched {} file(s) for {} output path(s)",
                    relocator.pattern,
                    matches.len(),
                    targets.len()
                );
            }

            for (source, target) in matches.iter().zip(targets) {
                let target = Path::new(target);
                if source == target {
                    continue;
                }
                move_file(source, target)?;
                debug!("Relocated {} -> {}", source.display(), target.display());
                moved += 1;
            }
        }
        Ok(moved)
    }
}

fn matching_files(working_dir: &Path, pattern: &str) -> io::Result<Vec<PathBuf>> {
    let base = Pattern::escape(&working_dir.to_string_lossy());
    let full = format!("{}/{}", base.trim_end_matches('/'), pattern);
    let mut files: Vec<PathBuf> = glob::glob(&full)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Rename, falling back to copy and delete across file systems.
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }
    fs::copy(source, target)?;
    fs::remove_file(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs(port: &str, files: Vec<PathBuf>) -> BTreeMap<String, Vec<String>> {
        let files = files
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        BTreeMap::from([(port.to_string(), files)])
    }

    #[test]
    fn test_matches_move_to_planned_paths_in_order() {
        let work = tempfile::tempdir().unwrap();
        let results = tempfile::tempdir().unwrap();
        fs::write(work.path().join("b.sorted"), "b").unwrap();
        fs::write(work.path().join("a.sorted"), "a").unwrap();
        fs::write(work.path().join("ignored.log"), "").unwrap();

        let targets = vec![
            results.path().join("out_0.txt"),
            results.path().join("nested/out_1.txt"),
        ];
        let moved = GlobOutputRelocator
            .relocate(
                work.path(),
                &[Relocator::new("out", "*.sorted")],
                &outputs("out", targets.clone()),
            )
            .unwrap();

        assert_eq!(moved, 2);
        assert_eq!(fs::read_to_string(&targets[0]).unwrap(), "a");
        assert_eq!(fs::read_to_string(&targets[1]).unwrap(), "b");
        assert!(!work.path().join("a.sorted").exists());
        assert!(work.path().join("ignored.log").exists());
    }

    #[test]
    fn test_unbound_output_is_skipped() {
        let work = tempfile::tempdir().unwrap();
        fs::write(work.path().join("a.sorted"), "a").unwrap();

        let moved = GlobOutputRelocator
            .relocate(
                work.path(),
                &[Relocator::new("log", "*.sorted")],
                &BTreeMap::new(),
            )
            .unwrap();
        assert_eq!(moved, 0);
        assert!(work.path().join("a.sorted").exists());
    }

    #[test]
    fn test_fewer_matches_than_targets() {
        let work = tempfile::tempdir().unwrap();
        fs::write(work.path().join("only.sorted"), "x").unwrap();
        let target = work.path().join("final.txt");

        let moved = GlobOutputRelocator
            .relocate(
                work.path(),
                &[Relocator::new("out", "*.sorted")],
                &outputs("out", vec![target.clone(), work.path().join("missing.txt")]),
            )
            .unwrap();
        assert_eq!(moved, 1);
        assert!(target.exists());
    }
}
