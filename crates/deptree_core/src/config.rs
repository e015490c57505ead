use log::{debug, trace, warn};
use std::{
    env, io,
    path::{Path, PathBuf},
};

use crate::constants::{DEFAULT_EXTENSIONS, JS_TS_EXTENSIONS};

/// Finds the closest enclosing git repository of the current directory.
pub fn find_git_root() -> io::Result<Option<PathBuf>> {
    let current_dir = env::current_dir()?;
    Ok(find_git_root_from(&current_dir))
}

pub fn find_git_root_from(start: &Path) -> Option<PathBuf> {
    debug!("Searching for git root from {:?}", start);
    let mut current_dir = start;

    loop {
        let git_dir = current_dir.join(".git");
        trace!("Checking for .git at: {:?}", git_dir);
        if git_dir.exists() {
            debug!("Found git root at: {:?}", current_dir);
            return Some(current_dir.to_path_buf());
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent,
            None => {
                debug!("Could not find .git directory in any parent folder");
                return None;
            }
        }
    }
}

/// Normalizes user supplied resolution extensions.
///
/// `ts` becomes `.ts`, an empty string is kept (it means the specifier as
/// written), repeats are dropped keeping the first, and an empty list yields
/// [`DEFAULT_EXTENSIONS`].
pub fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.as_ref().trim();
        let ext = if ext.is_empty() || ext.starts_with('.') {
            ext.to_string()
        } else {
            format!(".{}", ext)
        };

        if !ext.is_empty() && !JS_TS_EXTENSIONS.contains(&&ext[1..]) {
            warn!("Extension '{}' is not a JavaScript/TypeScript extension", ext);
        }
        if !out.contains(&ext) {
            out.push(ext);
        }
    }

    if out.is_empty() {
        return DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_git_root_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        let subdir = root.join("src").join("components");
        fs::create_dir_all(&subdir).unwrap();

        let git_root = find_git_root_from(&subdir).unwrap();
        assert_eq!(git_root.canonicalize().unwrap(), root.canonicalize().unwrap());
    }

    #[test]
    fn test_find_git_root_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("nested").join("deep");
        fs::create_dir_all(&subdir).unwrap();

        // A .git further up (e.g. the temp dir living inside a checkout) is still a hit,
        // so only assert that whatever is found is not below the start directory.
        if let Some(found) = find_git_root_from(&subdir) {
            assert!(!found.starts_with(temp_dir.path()));
        }
    }

    #[test]
    fn test_normalize_adds_leading_dot() {
        assert_eq!(normalize_extensions(&["ts", ".js"]), vec![".ts", ".js"]);
    }

    #[test]
    fn test_normalize_keeps_order_and_drops_repeats() {
        assert_eq!(normalize_extensions(&[".ts", "js", "ts", ".js"]), vec![".ts", ".js"]);
    }

    #[test]
    fn test_normalize_empty_list_uses_default() {
        let empty: [&str; 0] = [];
        assert_eq!(normalize_extensions(&empty), vec![".js"]);
    }

    #[test]
    fn test_normalize_keeps_empty_extension() {
        assert_eq!(normalize_extensions(&["", ".js"]), vec!["", ".js"]);
    }
}
