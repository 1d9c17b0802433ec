use glob::Pattern;
use std::ffi::OsStr;
use std::path::Path;

/// Checks whether `path` ends in the required extension.
///
/// The extension may be given with or without its leading dot. Comparison is
/// case-sensitive, so `Main.JAVA` does not match `java`.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.strip_prefix('.').unwrap_or(extension);
    path.extension() == Some(OsStr::new(wanted))
}

/// Checks if a file should be ignored based on glob ignore patterns.
///
/// Backslashes are matched as `/` so the same patterns work on Windows paths.
pub fn should_ignore(path: &Path, ignore_patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy().replace('\\', "/");
    ignore_patterns.iter().any(|pattern| {
        Pattern::new(pattern)
            .map(|p| p.matches(&path_str))
            .unwrap_or(false)
    })
}
