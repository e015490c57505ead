use deptree_core::{DEFAULT_EXTENSIONS, DependencyGraph, FilePath, GraphError};
use std::{fmt, path::PathBuf};

/// What a build does when a file other than the entry cannot be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failure and return it.
    #[default]
    Abort,
    /// Keep the failing node, collect the error, and continue with other subtrees.
    Record,
}

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Extensions tried in order when resolving a specifier
    pub extensions: Vec<String>,
    /// Follow `import("x")` with a literal source
    pub dynamic_imports: bool,
    pub error_policy: ErrorPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            dynamic_imports: false,
            error_policy: ErrorPolicy::Abort,
        }
    }
}

/// A dependency chain that returns to a file already on the current path.
///
/// The first and last element are the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub chain: Vec<FilePath>,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, file) in self.chain.iter().enumerate() {
            if idx > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", file)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct BuildOutcome {
    pub graph: DependencyGraph,
    pub cycles: Vec<Cycle>,
    /// Errors collected under [`ErrorPolicy::Record`]; always empty under `Abort`
    pub failures: Vec<GraphError>,
}

#[derive(Debug)]
pub struct EntryResult {
    pub entry: PathBuf,
    pub outcome: Result<BuildOutcome, GraphError>,
}

#[derive(Debug)]
pub struct CheckResult {
    pub entries: Vec<EntryResult>,
    pub files_analyzed: usize,
}

impl CheckResult {
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| match &e.outcome {
            Ok(outcome) => !outcome.failures.is_empty(),
            Err(_) => true,
        })
    }

    pub fn cycle_count(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().ok())
            .map(|outcome| outcome.cycles.len())
            .sum()
    }
}
