//! Dependency graph construction for JavaScript/TypeScript entry files.
//!
//! Starting from an entry file, this crate follows every static `import` and
//! literal `require()` to the file it names, records the file-to-file edges in
//! discovery order, and reports dependency cycles without breaking them.
//!
//! # Examples
//!
//! ## Single entry
//!
//! ```no_run
//! use deptree_builder::{BuildOptions, GraphBuilder};
//!
//! # fn main() -> anyhow::Result<()> {
//! let builder = GraphBuilder::new(&BuildOptions::default());
//! let outcome = builder.build(std::path::Path::new("src/index.js"))?;
//!
//! for (file, deps) in outcome.graph.nodes() {
//!     println!("{} -> {}", file, deps.len());
//! }
//! for cycle in &outcome.cycles {
//!     println!("cycle: {}", cycle);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Several entries from a CLI config
//!
//! ```no_run
//! use clap::Parser;
//! use deptree_builder::{Config, run_dependency_build};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from(["deptree", "src/a.js", "src/b.js"]);
//! let result = run_dependency_build(cfg.clone())?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! deptree_builder::print_graphs(&mut stdout, &result, &cfg)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod checker;
mod config;
mod reporter;
mod types;

// Re-export public API
pub use builder::{BuildSession, GraphBuilder};
pub use checker::run_dependency_build;
pub use config::Config;
pub use reporter::{print_cycles, print_graphs, print_json};
pub use types::{BuildOptions, BuildOutcome, CheckResult, Cycle, EntryResult, ErrorPolicy};
