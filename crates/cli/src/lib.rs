// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for VDBBench results.
//!
//! This crate provides the `vdbbench` command, which loads a results
//! directory and prints its status or a filtered chart report.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use vdbbench_dashboard_core::{CaseId, FilterState};
use vdbbench_dashboard_results::io::{self as results_io, DEFAULT_RESULTS_DIR};
use vdbbench_dashboard_results::{build_report, load_result_set, markdown, LoadPolicy};

/// VDBBench results CLI.
#[derive(Parser, Debug)]
#[command(name = "vdbbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `result_*.json` files, searched recursively.
    #[arg(long, global = true, env = "RESULTS_PATH", default_value = DEFAULT_RESULTS_DIR)]
    pub results_dir: PathBuf,

    /// Fail when any result file is unreadable instead of skipping it.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown tables.
    Markdown,
    /// JSON panels.
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what was loaded from the results directory.
    Status {
        /// List files, databases and cases.
        #[arg(short, long)]
        detailed: bool,
    },

    /// Print ranked charts for the selected databases and cases.
    ///
    /// Without selections every database, the first case, and results
    /// since 2023-01-01 are shown.
    Report {
        /// Database name to include (repeatable).
        #[arg(long = "db")]
        dbs: Vec<String>,

        /// Case id to include (repeatable).
        #[arg(long = "case")]
        cases: Vec<u32>,

        /// Only results dated on or after this day (YYYY-MM-DD).
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(cli, &mut stdout.lock())
}

/// Execute a parsed command, writing its output to `out`.
pub fn execute(cli: Cli, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let policy = if cli.strict {
        LoadPolicy::AbortBatch
    } else {
        LoadPolicy::SkipInvalid
    };
    let set = load_result_set(&cli.results_dir, policy);

    match cli.command {
        Commands::Status { detailed } => {
            writeln!(out, "VDBBench Results")?;
            writeln!(out, "Version: {}", env!("CARGO_PKG_VERSION"))?;
            writeln!(out, "Results directory: {}", cli.results_dir.display())?;
            writeln!(out, "Files: {}", set.file_count())?;
            writeln!(out, "Records: {}", set.chart_data.len())?;

            if detailed {
                writeln!(out, "\nDatabases:")?;
                for db in &set.db_names {
                    writeln!(out, "  - {}", db)?;
                }
                writeln!(out, "\nCases:")?;
                for id in &set.case_ids {
                    writeln!(out, "  - {}: {}", id, id.label().unwrap_or("(unknown case)"))?;
                }
                writeln!(out, "\nFiles:")?;
                for result in &set.results {
                    writeln!(out, "  - {}", result.filename.as_deref().unwrap_or("-"))?;
                }
            }

            Ok(())
        }
        Commands::Report {
            dbs,
            cases,
            since,
            format,
            output,
        } => {
            let mut filter = FilterState::defaults_for(&set);
            if !dbs.is_empty() {
                filter.selected_dbs = dbs;
            }
            if !cases.is_empty() {
                filter.selected_cases = cases.into_iter().map(CaseId).collect();
            }
            if since.is_some() {
                filter.start_date = since;
            }

            let report = build_report(&set, filter);

            match (format, output) {
                (OutputFormat::Json, Some(path)) => results_io::write_json(&report, path)?,
                (OutputFormat::Json, None) => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?
                }
                (OutputFormat::Markdown, path) => {
                    let text = markdown::generate_panel_report(&report.panels, &report.files);
                    match path {
                        Some(path) => std::fs::write(path, text)?,
                        None => write!(out, "{}", text)?,
                    }
                }
            }

            Ok(())
        }
    }
}
