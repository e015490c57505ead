use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::path::PathBuf;

use crate::{config::normalize_extensions, error::GraphError, types::FilePath};

/// Turns specifiers into files by trying each configured extension in order.
#[derive(Debug)]
pub struct PathResolver {
    extensions: Vec<String>,
    cache: DashMap<(PathBuf, String), FilePath>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new::<&str>(&[])
    }
}

impl PathResolver {
    /// An empty list falls back to the default extensions.
    pub fn new<S: AsRef<str>>(extensions: &[S]) -> Self {
        Self { extensions: normalize_extensions(extensions), cache: DashMap::new() }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Resolves `specifier` as written in `from_file`.
    ///
    /// The candidate for each extension is `dirname(from_file)/specifier+ext`,
    /// cleaned lexically; the first one that is a regular file wins and is
    /// returned canonicalized.
    pub fn resolve(&self, from_file: &FilePath, specifier: &str) -> Result<FilePath, GraphError> {
        let base = from_file.dir();
        let key = (base.to_path_buf(), specifier.to_string());
        if let Some(v) = self.cache.get(&key) {
            trace!("Cache hit for resolve: '{}' from {}", specifier, from_file);
            return Ok(v.clone());
        }
        trace!("Resolving: '{}' from {}", specifier, from_file);

        let mut tried = Vec::with_capacity(self.extensions.len());
        for ext in &self.extensions {
            let candidate = clean(base.join(format!("{}{}", specifier, ext)));
            trace!("Trying candidate {}", candidate.display());
            if candidate.is_file() {
                let resolved = FilePath::canonicalize(&candidate)?;
                debug!("Resolved '{}' from {} to {}", specifier, from_file, resolved);
                self.cache.insert(key, resolved.clone());
                return Ok(resolved);
            }
            tried.push(candidate);
        }

        debug!("Failed to resolve '{}' from {}", specifier, from_file);
        Err(GraphError::UnresolvedModule {
            specifier: specifier.to_string(),
            from: from_file.as_path().to_path_buf(),
            tried,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn file_path(p: &Path) -> FilePath {
        FilePath::canonicalize(p).unwrap()
    }

    #[test]
    fn test_default_tries_js_only() {
        let resolver = PathResolver::default();
        assert_eq!(resolver.extensions(), &[".js".to_string()]);
    }

    #[test]
    fn test_resolve_sibling_with_default_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let index = create_test_file(root, "src/index.js", "");
        let util = create_test_file(root, "src/util.js", "");

        let resolver = PathResolver::default();
        let resolved = resolver.resolve(&file_path(&index), "./util").unwrap();
        assert_eq!(resolved, file_path(&util));
    }

    #[test]
    fn test_resolve_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let button = create_test_file(root, "src/components/button.js", "");
        let shared = create_test_file(root, "src/shared.js", "");

        let resolver = PathResolver::default();
        let resolved = resolver.resolve(&file_path(&button), "../shared").unwrap();
        assert_eq!(resolved, file_path(&shared));
    }

    #[test]
    fn test_extension_order_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(root, "entry.ts", "");
        let x_ts = create_test_file(root, "x.ts", "");
        create_test_file(root, "x.js", "");

        let resolver = PathResolver::new(&[".ts", ".js"]);
        for _ in 0..3 {
            assert_eq!(resolver.resolve(&file_path(&entry), "./x").unwrap(), file_path(&x_ts));
        }
        // Fresh resolver, no cache involved
        let fresh = PathResolver::new(&[".ts", ".js"]);
        assert_eq!(fresh.resolve(&file_path(&entry), "./x").unwrap(), file_path(&x_ts));
    }

    #[test]
    fn test_falls_through_to_later_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = create_test_file(root, "entry.js", "");
        let x_js = create_test_file(root, "x.js", "");

        let resolver = PathResolver::new(&["ts", "js"]);
        assert_eq!(resolver.resolve(&file_path(&entry), "./x").unwrap(), file_path(&x_js));
    }

    #[test]
    fn test_unresolved_reports_specifier_and_referrer() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = file_path(&create_test_file(root, "entry.js", ""));

        let resolver = PathResolver::new(&[".ts", ".js"]);
        let err = resolver.resolve(&entry, "./missing").unwrap_err();
        match err {
            GraphError::UnresolvedModule { specifier, from, tried } => {
                assert_eq!(specifier, "./missing");
                assert_eq!(from, entry.as_path());
                assert_eq!(tried.len(), 2);
                assert!(tried[0].ends_with("missing.ts"));
                assert!(tried[1].ends_with("missing.js"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bare_package_specifier_is_unresolved() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = file_path(&create_test_file(root, "entry.js", ""));
        create_test_file(root, "node_modules/react/index.js", "");

        let err = PathResolver::default().resolve(&entry, "react").unwrap_err();
        assert_eq!(err.kind(), "UnresolvedModuleError");
    }

    #[test]
    fn test_directory_is_not_a_match() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = file_path(&create_test_file(root, "entry.js", ""));
        fs::create_dir_all(root.join("lib.js")).unwrap();

        assert!(PathResolver::default().resolve(&entry, "./lib").is_err());
    }

    #[test]
    fn test_empty_extension_matches_specifier_as_written() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = file_path(&create_test_file(root, "entry.js", ""));
        let data = create_test_file(root, "data.json.js", "");

        let resolver = PathResolver::new(&[""]);
        assert_eq!(resolver.resolve(&entry, "./data.json.js").unwrap(), file_path(&data));
    }

    #[test]
    fn test_resolved_path_is_canonical() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let entry = file_path(&create_test_file(root, "src/index.js", ""));
        let util = create_test_file(root, "src/util.js", "");

        let resolver = PathResolver::default();
        let a = resolver.resolve(&entry, "./util").unwrap();
        let b = resolver.resolve(&entry, "../src/./util").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, file_path(&util));
    }
}
