// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown output generation for benchmark results.
//!
//! Renders the same panels the dashboard charts as markdown tables, for
//! terminals and CI summaries.

use std::fmt::Write;

use vdbbench_dashboard_core::filter::FileSummary;
use vdbbench_dashboard_core::{CasePanel, ResultSet};

/// Generate a markdown overview of a loaded result set.
pub fn generate_summary(set: &ResultSet) -> String {
    let mut output = String::new();

    writeln!(output, "# VectorDB Benchmark Results").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(output).unwrap();

    if set.is_empty() {
        writeln!(output, "No data available").unwrap();
        return output;
    }

    writeln!(output, "| File | Date | Run ID | Task | Cases |").unwrap();
    writeln!(output, "|------|------|--------|------|-------|").unwrap();

    for result in &set.results {
        writeln!(
            output,
            "| {} | {} | {} | {} | {} |",
            result.filename.as_deref().unwrap_or("-"),
            result
                .file_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            result.run_id,
            result.task_label,
            result.results.len()
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "---").unwrap();
    writeln!(output, "Total files: {}", set.file_count()).unwrap();
    writeln!(output, "Total records: {}", set.chart_data.len()).unwrap();
    writeln!(output, "Databases: {}", set.db_names.join(", ")).unwrap();

    output
}

/// Generate a detailed report of chart panels.
pub fn generate_panel_report(panels: &[CasePanel], files: &FileSummary) -> String {
    let mut output = String::new();

    writeln!(output, "# VectorDB Benchmark Results").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Label format: `<db_name> (<db_label>?, <index>, <num_concurrency>[])`"
    )
    .unwrap();
    writeln!(output).unwrap();
    writeln!(output, "{} files match", files.count).unwrap();
    writeln!(output).unwrap();

    if panels.is_empty() {
        writeln!(output, "No data available").unwrap();
        return output;
    }

    for panel in panels {
        match panel.label {
            Some(label) => writeln!(output, "## {}", label).unwrap(),
            None => writeln!(output, "## Case {}", panel.case_id).unwrap(),
        }
        writeln!(output).unwrap();

        for chart in &panel.charts {
            writeln!(output, "### {}", chart.title).unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| # | Label | Value | File |").unwrap();
            writeln!(output, "|---|-------|-------|------|").unwrap();
            for (rank, bar) in chart.bars.iter().enumerate() {
                writeln!(
                    output,
                    "| {} | {} | {} | {} |",
                    rank + 1,
                    bar.label,
                    bar.value,
                    bar.filename.as_deref().unwrap_or("-")
                )
                .unwrap();
            }
            writeln!(output).unwrap();
        }
    }

    output
}
