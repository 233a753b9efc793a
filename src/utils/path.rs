//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Split a branch-relative subdir into normalized components.
///
/// Rejects absolute paths, `..`, and empty components; `.` components are
/// dropped. Returns `None` for unsafe input.
pub fn subdir_components(subdir: &str) -> Option<Vec<String>> {
    let trimmed = subdir.trim_matches('/');
    if subdir.starts_with('/') || subdir.starts_with('\\') {
        return None;
    }
    let mut components = Vec::new();
    for part in trimmed.split('/') {
        match part {
            "" | "." => continue,
            ".." => return None,
            _ => components.push(part.to_string()),
        }
    }
    Some(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_subdir_components_plain() {
        assert_eq!(
            subdir_components("docs/api"),
            Some(vec!["docs".to_string(), "api".to_string()])
        );
        assert_eq!(subdir_components(""), Some(vec![]));
        assert_eq!(subdir_components("docs/"), Some(vec!["docs".to_string()]));
        assert_eq!(
            subdir_components("./docs"),
            Some(vec!["docs".to_string()])
        );
    }

    #[test]
    fn test_subdir_components_unsafe() {
        assert_eq!(subdir_components("/abs"), None);
        assert_eq!(subdir_components("../up"), None);
        assert_eq!(subdir_components("docs/../.."), None);
    }
}
