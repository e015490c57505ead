use std::{
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use deptree_core::{FilePath, GraphError};
use log::{debug, trace};
use serde::Serialize;

use crate::{
    config::Config,
    types::{BuildOutcome, CheckResult, Cycle},
};

/// Show `path` relative to `root` when it lives underneath it
fn display_path(root: Option<&Path>, path: &Path) -> String {
    let Some(root) = root else {
        return path.display().to_string();
    };
    match make_relative(path, root) {
        Some(rel) if !rel.starts_with("..") => {
            let result = rel.to_string_lossy().to_string();
            trace!("Relativized '{}' to '{}'", path.display(), result);
            result
        }
        _ => path.display().to_string(),
    }
}

/// Create a relative path from `base` to `target`
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components();
    let mut base_components = base.components();

    let mut common_prefix_len = 0;
    let mut target_parts = Vec::new();
    let mut base_parts = Vec::new();

    loop {
        match (target_components.next(), base_components.next()) {
            (Some(t), Some(b)) if t == b => {
                common_prefix_len += 1;
            }
            (Some(t), Some(b)) => {
                target_parts.push(t);
                base_parts.push(b);
                break;
            }
            (Some(t), None) => {
                target_parts.push(t);
                break;
            }
            (None, Some(b)) => {
                // target is an ancestor of base
                base_parts.push(b);
                break;
            }
            (None, None) => {
                return Some(PathBuf::from("."));
            }
        }
    }

    target_parts.extend(target_components);
    base_parts.extend(base_components);

    if common_prefix_len == 0 {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in &base_parts {
        result.push("..");
    }
    for component in target_parts {
        match component {
            Component::Normal(p) => result.push(p),
            Component::CurDir => {}
            Component::ParentDir => result.push(".."),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

fn format_node_line(root: Option<&Path>, path: &FilePath, deps: &[FilePath]) -> String {
    let deps: Vec<String> = deps.iter().map(|d| display_path(root, d.as_path())).collect();
    format!("{} -> {}", display_path(root, path.as_path()), deps.join(", "))
}

fn format_cycle(root: Option<&Path>, cycle: &Cycle) -> String {
    cycle
        .chain
        .iter()
        .map(|f| display_path(root, f.as_path()))
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn format_error(root: Option<&Path>, err: &GraphError) -> String {
    let file = display_path(root, err.file());
    match err {
        GraphError::UnresolvedModule { specifier, .. } => {
            format!("cannot resolve module '{}' from {}", specifier, file)
        }
        GraphError::Parse { message, .. } => format!("{}: {}", file, message),
        GraphError::Read { source, .. } => format!("{}: {}", file, source),
    }
}

fn print_error<W: Write>(writer: &mut W, root: Option<&Path>, err: &GraphError) -> io::Result<()> {
    writeln!(
        writer,
        "{} {}",
        format!("error[{}]:", err.kind()).red().bold(),
        format_error(root, err)
    )
}

fn print_cycles_of<W: Write>(
    writer: &mut W,
    root: Option<&Path>,
    outcome: &BuildOutcome,
) -> io::Result<()> {
    for cycle in &outcome.cycles {
        writeln!(
            writer,
            "{} Cyclic dependency detected: {}",
            "⚠".yellow().bold(),
            format_cycle(root, cycle)
        )?;
    }
    Ok(())
}

/// Print every graph as `file -> dependencies` lines in registration order,
/// followed by its cycles and failures.
pub fn print_graphs<W: Write>(
    writer: &mut W,
    result: &CheckResult,
    cfg: &Config,
) -> io::Result<()> {
    debug!("Printing graphs for {} entries", result.entries.len());
    let root = cfg.root.as_deref();

    for entry in &result.entries {
        let entry_display = display_path(root, &entry.entry);
        match &entry.outcome {
            Ok(outcome) => {
                writeln!(
                    writer,
                    "{} {} ({} files, {} edges)",
                    "●".bright_blue(),
                    entry_display.bright_white().bold(),
                    outcome.graph.node_count().to_string().cyan(),
                    outcome.graph.edge_count().to_string().cyan()
                )?;
                for (path, deps) in outcome.graph.nodes() {
                    writeln!(writer, "  {}", format_node_line(root, path, deps))?;
                }
                print_cycles_of(writer, root, outcome)?;
                for err in &outcome.failures {
                    print_error(writer, root, err)?;
                }
            }
            Err(err) => {
                writeln!(writer, "{} {}", "✗".red().bold(), entry_display.bright_white().bold())?;
                print_error(writer, root, err)?;
            }
        }
        writeln!(writer)?;
    }

    print_summary(writer, result)?;
    writer.flush()?;
    Ok(())
}

/// Print only the detected cycles of every entry.
pub fn print_cycles<W: Write>(
    writer: &mut W,
    result: &CheckResult,
    cfg: &Config,
) -> io::Result<()> {
    let root = cfg.root.as_deref();

    if result.cycle_count() == 0 {
        writeln!(writer, "{} No cyclic dependencies detected.", "✓".green().bold())?;
    }
    for entry in &result.entries {
        match &entry.outcome {
            Ok(outcome) if !outcome.cycles.is_empty() => {
                writeln!(writer, "{}", display_path(root, &entry.entry).blue())?;
                print_cycles_of(writer, root, outcome)?;
                writeln!(writer)?;
            }
            Ok(_) => {}
            Err(err) => print_error(writer, root, err)?,
        }
    }

    writer.flush()?;
    Ok(())
}

fn print_summary<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    let failed = result.entries.iter().filter(|e| e.outcome.is_err()).count();
    let recorded: usize = result
        .entries
        .iter()
        .filter_map(|e| e.outcome.as_ref().ok())
        .map(|o| o.failures.len())
        .sum();

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Entries: {}", result.entries.len().to_string().cyan())?;
    writeln!(writer, "  Files analyzed: {}", result.files_analyzed.to_string().cyan())?;
    writeln!(writer, "  Cycles: {}", result.cycle_count().to_string().yellow().bold())?;
    if failed > 0 || recorded > 0 {
        writeln!(
            writer,
            "  Errors: {} failed entries, {} recorded",
            failed.to_string().red().bold(),
            recorded.to_string().red()
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct EntryReport<'a> {
    entry: String,
    nodes: Vec<NodeReport<'a>>,
    cycles: Vec<&'a [FilePath]>,
    errors: Vec<ErrorReport>,
}

#[derive(Serialize)]
struct NodeReport<'a> {
    path: &'a FilePath,
    dependencies: &'a [FilePath],
}

#[derive(Serialize)]
struct ErrorReport {
    kind: &'static str,
    file: String,
    specifier: Option<String>,
    message: String,
}

impl From<&GraphError> for ErrorReport {
    fn from(err: &GraphError) -> Self {
        ErrorReport {
            kind: err.kind(),
            file: err.file().display().to_string(),
            specifier: err.specifier().map(str::to_string),
            message: err.to_string(),
        }
    }
}

/// Print all results as a JSON array, one object per entry, with absolute paths.
pub fn print_json<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    let reports: Vec<EntryReport<'_>> = result
        .entries
        .iter()
        .map(|entry| {
            let entry_name = entry.entry.display().to_string();
            match &entry.outcome {
                Ok(outcome) => EntryReport {
                    entry: entry_name,
                    nodes: outcome
                        .graph
                        .nodes()
                        .map(|(path, dependencies)| NodeReport { path, dependencies })
                        .collect(),
                    cycles: outcome.cycles.iter().map(|c| c.chain.as_slice()).collect(),
                    errors: outcome.failures.iter().map(ErrorReport::from).collect(),
                },
                Err(err) => EntryReport {
                    entry: entry_name,
                    nodes: Vec::new(),
                    cycles: Vec::new(),
                    errors: vec![ErrorReport::from(err)],
                },
            }
        })
        .collect();

    serde_json::to_writer_pretty(&mut *writer, &reports)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
