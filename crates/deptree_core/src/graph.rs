use log::trace;
use std::collections::HashMap;

use crate::types::FilePath;

/// File-to-file dependency graph that remembers registration order.
///
/// Append-only: nodes and edges can be added but never removed, and every edge
/// target is itself a node.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<(FilePath, Vec<FilePath>)>,
    index: HashMap<FilePath, usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `path` with no dependencies. No-op if already present.
    pub fn add_node(&mut self, path: &FilePath) {
        if self.index.contains_key(path) {
            return;
        }
        trace!("Registering node {}", path);
        self.index.insert(path.clone(), self.nodes.len());
        self.nodes.push((path.clone(), Vec::new()));
    }

    /// Appends `to` to the dependencies of `from`, registering either end if
    /// needed. Repeated edges are kept.
    pub fn add_edge(&mut self, from: &FilePath, to: &FilePath) {
        self.add_node(from);
        self.add_node(to);
        let idx = self.index[from];
        trace!("Adding edge {} -> {}", from, to);
        self.nodes[idx].1.push(to.clone());
    }

    /// Nodes with their dependencies, in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = (&FilePath, &[FilePath])> {
        self.nodes.iter().map(|(path, deps)| (path, deps.as_slice()))
    }

    pub fn dependencies(&self, path: &FilePath) -> Option<&[FilePath]> {
        self.index.get(path).map(|&idx| self.nodes[idx].1.as_slice())
    }

    pub fn contains(&self, path: &FilePath) -> bool {
        self.index.contains_key(path)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|(_, deps)| deps.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
