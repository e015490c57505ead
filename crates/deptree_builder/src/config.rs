use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{debug, info};
use std::{env, path::PathBuf};

use crate::types::{BuildOptions, ErrorPolicy};

#[derive(Debug, Clone, Parser)]
#[command(name = "deptree")]
#[command(about = "Build the file dependency graph of JavaScript/TypeScript entry files")]
pub struct Config {
    /// Entry files to start from
    #[arg(required = true)]
    pub entries: Vec<PathBuf>,

    /// Directory paths are shown relative to (defaults to git root, then the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Extensions to try when resolving a specifier, in priority order
    #[arg(long, value_delimiter = ',', default_value = ".js")]
    pub extensions: Vec<String>,

    /// Also follow dynamic import() expressions with a literal source
    #[arg(long)]
    pub dynamic_imports: bool,

    /// Record unresolved or unparseable files and keep building other subtrees
    #[arg(long)]
    pub keep_going: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl Config {
    /// Resolve the display root directory
    pub fn initialize(&mut self) -> Result<()> {
        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            r.canonicalize().with_context(|| format!("Invalid root directory {}", r.display()))?
        } else {
            debug!("No root provided, searching for git root");
            match deptree_core::find_git_root()? {
                Some(root) => root,
                None => env::current_dir()?,
            }
        };
        info!("Using root directory: {}", root.display());

        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            extensions: deptree_core::normalize_extensions(&self.extensions),
            dynamic_imports: self.dynamic_imports,
            error_policy: if self.keep_going { ErrorPolicy::Record } else { ErrorPolicy::Abort },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_defaults() {
        let cfg = Config::try_parse_from(["deptree", "src/index.js"]).unwrap();
        assert_eq!(cfg.entries, vec![PathBuf::from("src/index.js")]);
        assert_eq!(cfg.extensions, vec![".js"]);
        assert!(!cfg.dynamic_imports);
        assert!(!cfg.keep_going);
        assert!(!cfg.json);

        let options = cfg.build_options();
        assert_eq!(options.error_policy, ErrorPolicy::Abort);
        assert_eq!(options.extensions, vec![".js"]);
    }

    #[test]
    fn test_parse_extension_list() {
        let cfg =
            Config::try_parse_from(["deptree", "a.ts", "b.ts", "--extensions", "ts,.js"]).unwrap();
        assert_eq!(cfg.entries.len(), 2);
        assert_eq!(cfg.build_options().extensions, vec![".ts", ".js"]);
    }

    #[test]
    fn test_keep_going_selects_record_policy() {
        let cfg = Config::try_parse_from(["deptree", "a.js", "--keep-going"]).unwrap();
        assert_eq!(cfg.build_options().error_policy, ErrorPolicy::Record);
    }

    #[test]
    fn test_entries_required() {
        assert!(Config::try_parse_from(["deptree"]).is_err());
    }

    #[test]
    fn test_root_requires_initialize() {
        let cfg = Config::try_parse_from(["deptree", "a.js"]).unwrap();
        assert!(cfg.root().is_err());
    }

    #[test]
    fn test_initialize_canonicalizes_given_root() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("app");
        std::fs::create_dir_all(&nested).unwrap();

        let mut cfg = Config::try_parse_from(["deptree", "a.js"]).unwrap();
        cfg.root = Some(nested.join("..").join("app"));
        cfg.initialize().unwrap();
        assert_eq!(cfg.root().unwrap(), &nested.canonicalize().unwrap());
    }

    #[test]
    fn test_initialize_rejects_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let mut cfg = Config::try_parse_from(["deptree", "a.js"]).unwrap();
        cfg.root = Some(temp_dir.path().join("missing"));
        assert!(cfg.initialize().is_err());
    }
}
