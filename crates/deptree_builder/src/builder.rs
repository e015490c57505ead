use deptree_core::{DependencyGraph, FilePath, GraphError, PathResolver, SpecifierExtractor};
use log::{debug, info, trace, warn};
use std::{collections::HashMap, path::Path};

use crate::types::{BuildOptions, BuildOutcome, Cycle, ErrorPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    OnPath,
    Finished,
}

/// One file being expanded: its resolved dependencies and how many of them
/// have been walked so far.
struct Frame {
    file: FilePath,
    deps: Vec<FilePath>,
    next: usize,
}

/// Builds [`DependencyGraph`]s with a fixed set of [`BuildOptions`].
///
/// Every call to [`GraphBuilder::build`] starts from empty parse and resolve
/// caches, so files are read as they are on disk at that moment. Use
/// [`GraphBuilder::session`] to share caches between several builds of one
/// run.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    pub fn new(options: &BuildOptions) -> Self {
        Self { options: options.clone() }
    }

    /// Opens a run whose caches are shared by every build made through it.
    pub fn session(&self) -> BuildSession {
        BuildSession::new(&self.options)
    }

    /// Builds the dependency graph reachable from `entry` in a fresh session.
    pub fn build(&self, entry: &Path) -> Result<BuildOutcome, GraphError> {
        self.session().build(entry)
    }
}

/// Walks the dependencies of entry files depth-first.
///
/// The walk keeps its own stack of frames instead of recursing, so deep
/// import chains cannot overflow the call stack. That stack is exactly the
/// current path: a dependency that is still on it closes a cycle, which is
/// recorded and not re-entered. Files are expanded at most once per build.
///
/// Parse and resolve results are memoised for the lifetime of the session,
/// which may serve several entries from several threads. Each build still
/// gets a fresh graph.
#[derive(Debug)]
pub struct BuildSession {
    extractor: SpecifierExtractor,
    resolver: PathResolver,
    error_policy: ErrorPolicy,
}

impl BuildSession {
    fn new(options: &BuildOptions) -> Self {
        let resolver = PathResolver::new(&options.extensions);
        debug!("New build session, extensions {:?}", resolver.extensions());
        Self {
            extractor: SpecifierExtractor::new(options.dynamic_imports),
            resolver,
            error_policy: options.error_policy,
        }
    }

    /// Number of distinct files parsed in this session so far.
    pub fn files_parsed(&self) -> usize {
        self.extractor.cached_files()
    }

    /// Builds the dependency graph reachable from `entry`.
    ///
    /// Fails if the entry cannot be read, parsed, or have any of its
    /// specifiers resolved. Failures further down abort the build under
    /// [`ErrorPolicy::Abort`] and are collected under [`ErrorPolicy::Record`].
    pub fn build(&self, entry: &Path) -> Result<BuildOutcome, GraphError> {
        let entry = FilePath::canonicalize(entry)?;
        info!("Building dependency graph from {}", entry);

        let mut graph = DependencyGraph::new();
        let mut cycles: Vec<Cycle> = Vec::new();
        let mut failures: Vec<GraphError> = Vec::new();
        let mut state: HashMap<FilePath, VisitState> = HashMap::new();

        graph.add_node(&entry);
        state.insert(entry.clone(), VisitState::OnPath);
        let deps = self.expand(&entry, true, &mut graph, &mut failures)?;
        let mut stack = vec![Frame { file: entry, deps, next: 0 }];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.deps.len() {
                if let Some(done) = stack.pop() {
                    trace!("Finished {}", done.file);
                    state.insert(done.file, VisitState::Finished);
                }
                continue;
            }
            let dep = frame.deps[frame.next].clone();
            frame.next += 1;

            match state.get(&dep).copied() {
                Some(VisitState::Finished) => {
                    trace!("Already expanded: {}", dep);
                }
                Some(VisitState::OnPath) => {
                    if let Some(pos) = stack.iter().position(|f| f.file == dep) {
                        let mut chain: Vec<FilePath> =
                            stack[pos..].iter().map(|f| f.file.clone()).collect();
                        chain.push(dep);
                        let cycle = Cycle { chain };
                        if !cycles.contains(&cycle) {
                            warn!("Cyclic dependency detected: {}", cycle);
                            cycles.push(cycle);
                        }
                    }
                }
                None => {
                    state.insert(dep.clone(), VisitState::OnPath);
                    let deps = self.expand(&dep, false, &mut graph, &mut failures)?;
                    stack.push(Frame { file: dep, deps, next: 0 });
                }
            }
        }

        debug!(
            "Built graph with {} files, {} edges, {} cycles, {} failures",
            graph.node_count(),
            graph.edge_count(),
            cycles.len(),
            failures.len()
        );
        Ok(BuildOutcome { graph, cycles, failures })
    }

    /// Registers every resolvable dependency of `file` as a node and an edge,
    /// in source order, and returns them.
    fn expand(
        &self,
        file: &FilePath,
        is_entry: bool,
        graph: &mut DependencyGraph,
        failures: &mut Vec<GraphError>,
    ) -> Result<Vec<FilePath>, GraphError> {
        trace!("Expanding {}", file);
        let specs = match self.extractor.imports_for(file) {
            Ok(specs) => specs,
            Err(e) => {
                self.fail(e, is_entry, failures)?;
                return Ok(Vec::new());
            }
        };

        let mut deps = Vec::with_capacity(specs.len());
        for spec in specs {
            match self.resolver.resolve(file, &spec.request) {
                Ok(dep) => {
                    trace!("{:?} dependency '{}' is {}", spec.kind, spec.request, dep);
                    graph.add_node(&dep);
                    graph.add_edge(file, &dep);
                    deps.push(dep);
                }
                Err(e) => self.fail(e, is_entry, failures)?,
            }
        }
        Ok(deps)
    }

    fn fail(
        &self,
        err: GraphError,
        is_entry: bool,
        failures: &mut Vec<GraphError>,
    ) -> Result<(), GraphError> {
        if is_entry || self.error_policy == ErrorPolicy::Abort {
            return Err(err);
        }
        warn!("{} (continuing)", err);
        failures.push(err);
        Ok(())
    }
}
