use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use deptree_builder::{CheckResult, Config};
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "deptree")]
#[command(about = "Static module dependency graphs for JavaScript/TypeScript files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the dependency graph of each entry file
    Graph(Config),
    /// Report cyclic dependencies reachable from each entry file
    Cycles(Config),
}

fn build(mut cfg: Config) -> Result<(CheckResult, Config)> {
    info!(
        "Building {} entries (using {} threads)",
        cfg.entries.len(),
        rayon::current_num_threads()
    );
    debug!("Config: root={:?}, extensions={:?}", cfg.root, cfg.extensions);

    // Resolved root is needed again for display paths; initialize() is idempotent
    cfg.initialize()?;
    let result = deptree_builder::run_dependency_build(cfg.clone())?;
    Ok((result, cfg))
}

fn finish<W: Write>(writer: &mut W, start: Instant, result: &CheckResult) -> Result<()> {
    writeln!(
        writer,
        "\n{} Finished in {}ms on {} files.",
        "●".bright_blue(),
        start.elapsed().as_millis().to_string().cyan(),
        result.files_analyzed.to_string().cyan()
    )?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    let failed = match cli.command {
        Commands::Graph(cfg) => {
            let (result, cfg) = build(cfg)?;
            if cfg.json {
                deptree_builder::print_json(&mut stdout, &result)?;
            } else {
                deptree_builder::print_graphs(&mut stdout, &result, &cfg)?;
                finish(&mut stdout, start, &result)?;
            }
            result.has_failures()
        }
        Commands::Cycles(cfg) => {
            let (result, cfg) = build(cfg)?;
            if cfg.json {
                deptree_builder::print_json(&mut stdout, &result)?;
            } else {
                deptree_builder::print_cycles(&mut stdout, &result, &cfg)?;
                finish(&mut stdout, start, &result)?;
            }
            result.cycle_count() > 0 || result.has_failures()
        }
    };
    stdout.flush()?;

    if failed {
        // Non-zero exit to fail CI
        std::process::exit(1);
    }
    Ok(())
}
