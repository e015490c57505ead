use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::error::GraphError;

/// Canonical, absolute path of a source file.
///
/// Only constructed through [`FilePath::canonicalize`], so two values compare
/// equal exactly when they name the same file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FilePath(PathBuf);

impl FilePath {
    pub fn canonicalize(path: &Path) -> Result<Self, GraphError> {
        path.canonicalize()
            .map(FilePath)
            .map_err(|source| GraphError::Read { path: path.to_path_buf(), source })
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Directory relative specifiers are joined onto.
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or(&self.0)
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub request: String,
    pub kind: SpecKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    /// `import ... from "x"` or `import "x"`
    Static,
    /// `require("x")`
    Require,
    /// `import("x")`
    Dynamic,
}
