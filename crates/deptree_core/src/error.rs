use std::{io, path::Path, path::PathBuf};

/// Failures raised while expanding a file during a build.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The file could not be read or canonicalized.
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The file text is not syntactically valid.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// No configured extension turned the specifier into an existing file.
    #[error("cannot resolve module '{specifier}' from {}", from.display())]
    UnresolvedModule { specifier: String, from: PathBuf, tried: Vec<PathBuf> },
}

impl GraphError {
    /// Name of the error kind as shown to users.
    pub fn kind(&self) -> &'static str {
        match self {
            GraphError::Read { .. } => "ReadError",
            GraphError::Parse { .. } => "ParseError",
            GraphError::UnresolvedModule { .. } => "UnresolvedModuleError",
        }
    }

    /// File the failure originated in.
    pub fn file(&self) -> &Path {
        match self {
            GraphError::Read { path, .. } | GraphError::Parse { path, .. } => path,
            GraphError::UnresolvedModule { from, .. } => from,
        }
    }

    pub fn specifier(&self) -> Option<&str> {
        match self {
            GraphError::UnresolvedModule { specifier, .. } => Some(specifier),
            GraphError::Read { .. } | GraphError::Parse { .. } => None,
        }
    }
}
