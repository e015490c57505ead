//! Core building blocks for deptree.
//!
//! This crate provides the pieces a dependency build is assembled from:
//! - Extracting import/require specifiers from JS/TS files
//! - Resolving relative specifiers to canonical file paths
//! - An append-only, registration-ordered dependency graph
//! - The error taxonomy shared by every build

mod config;
mod constants;
mod error;
mod graph;
mod parser;
mod resolver;
mod types;

// Re-export public API
pub use config::{find_git_root, find_git_root_from, normalize_extensions};
pub use constants::{DEFAULT_EXTENSIONS, JS_TS_EXTENSIONS};
pub use error::GraphError;
pub use graph::DependencyGraph;
pub use parser::SpecifierExtractor;
pub use resolver::PathResolver;
pub use types::{FilePath, SpecKind, Specifier};
