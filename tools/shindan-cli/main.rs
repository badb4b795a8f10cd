use clap::{Parser, ValueEnum};
use shindan::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Report formats the CLI can emit.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatCli {
    Text,
    Json,
}

/// Structural, complexity and security diagnostics for workflow exports
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow JSON file to analyze
    workflow_file: PathBuf,

    /// Write the report to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = FormatCli::Text)]
    format: FormatCli,

    /// Optional TOML file overriding the heuristic table
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shindan=info,warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli);
}

fn run(cli: Cli) {
    let started = Instant::now();

    let heuristics = match &cli.config {
        Some(path) => match HeuristicTable::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load heuristics");
                return;
            }
        },
        None => HeuristicTable::default(),
    };
    let analyzer = Analyzer::builder().with_heuristics(heuristics).build();

    // Load failures are already logged by the analyzer.
    let Ok(report) = analyzer.analyze_file(&cli.workflow_file) else {
        return;
    };

    let rendered = match cli.format {
        FormatCli::Text => ReportFormatter::markdown(&report),
        FormatCli::Json => match ReportFormatter::json(&report) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize report");
                return;
            }
        },
    };

    match &cli.output {
        Some(path) => match fs::write(path, rendered) {
            Ok(()) => tracing::info!(path = %path.display(), "Report saved"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to write report"),
        },
        None => println!("{}", rendered),
    }

    tracing::debug!(elapsed = ?started.elapsed(), "Analysis complete");
}
