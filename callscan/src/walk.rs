use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{ScanError, ScanResult};
use crate::filters::should_ignore;

/// Lists the regular files under `root` that are candidates for scanning.
///
/// Only the immediate entries of `root` are listed unless `recursive` is set.
/// Symlinks are kept when they resolve to a regular file; symlinked
/// directories are not descended into.
/// Hidden files and `.gitignore` rules are not applied; `ignore_patterns` is
/// the only exclusion. Extension filtering is left to the scan workers. The
/// result is sorted so sharding is reproducible.
pub fn collect_candidate_paths(
    root: &Path,
    recursive: bool,
    ignore_patterns: &[String],
) -> ScanResult<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|e| ScanError::directory_enumeration(root, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::directory_enumeration(
            root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }
    // Surface permission problems on the root itself before walking
    fs::read_dir(root).map_err(|e| ScanError::directory_enumeration(root, e))?;

    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .max_depth(if recursive { None } else { Some(1) });

    let mut paths: Vec<PathBuf> = walker
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| match entry.file_type() {
            Some(ft) if ft.is_symlink() => entry.path().is_file(),
            Some(ft) => ft.is_file(),
            None => false,
        })
        .map(|entry| entry.into_path())
        .filter(|path| !should_ignore(path, ignore_patterns))
        .collect();

    paths.sort();
    debug!("Found {} candidate files under {}", paths.len(), root.display());
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_lists_immediate_files_only() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("B.java"));
        touch(&dir.path().join("A.java"));
        touch(&dir.path().join("readme.md"));
        touch(&dir.path().join("nested/C.java"));

        let paths = collect_candidate_paths(dir.path(), false, &[]).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["A.java", "B.java", "readme.md"]);
    }

    #[test]
    fn test_recursive_listing() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("A.java"));
        touch(&dir.path().join("nested/deeper/C.java"));
        touch(&dir.path().join(".hidden/D.java"));

        let paths = collect_candidate_paths(dir.path(), true, &[]).unwrap();
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("A.java"));
        touch(&dir.path().join("generated/B.java"));

        let patterns = vec!["**/generated/**".to_string()];
        let paths = collect_candidate_paths(dir.path(), true, &patterns).unwrap();
        assert_eq!(paths, vec![dir.path().join("A.java")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_files_are_listed() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        touch(&dir.path().join("Plain.java"));
        touch(&elsewhere.path().join("Target.java"));
        touch(&elsewhere.path().join("sub/Hidden.java"));
        symlink(elsewhere.path().join("Target.java"), dir.path().join("Link.java")).unwrap();
        symlink(elsewhere.path().join("sub"), dir.path().join("linked-dir")).unwrap();
        symlink(elsewhere.path().join("Gone.java"), dir.path().join("Dangling.java")).unwrap();

        let paths = collect_candidate_paths(dir.path(), true, &[]).unwrap();
        assert_eq!(
            paths,
            vec![dir.path().join("Link.java"), dir.path().join("Plain.java")]
        );
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        let err = collect_candidate_paths(&dir.path().join("absent"), false, &[]).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryEnumeration { .. }));
    }

    #[test]
    fn test_root_is_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        touch(&file);
        let err = collect_candidate_paths(&file, false, &[]).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryEnumeration { .. }));
    }
}
