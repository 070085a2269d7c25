// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result loading and reports for the VDBBench dashboard.
//!
//! This crate reads VectorDBBench result directories into a
//! [`ResultSet`](vdbbench_dashboard_core::ResultSet), and writes reports and
//! exports of it.
//!
//! # Quick Start
//!
//! ```no_run
//! use vdbbench_dashboard_results::{io::LoadPolicy, load_result_set};
//!
//! let set = load_result_set("./private", LoadPolicy::SkipInvalid);
//! for record in &set.chart_data {
//!     println!("{}: {:?}", record.db_label, record.metrics_set);
//! }
//! ```
//!
//! # Modules
//!
//! - [`io`] - Directory scanning, parsing and JSON export
//! - [`markdown`] - Markdown report generation
//! - [`store`] - File-backed filter profile store

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod markdown;
pub mod store;

pub use io::{load_result_set, load_results, LoadError, LoadPolicy};
pub use store::FileFilterStore;

use std::path::Path;
use vdbbench_dashboard_core::{filter, panel, FilterState, ResultSet};

/// A filtered, chart-shaped view of a result set.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    /// Filter that produced the view.
    pub filter: FilterState,
    /// Files behind the visible records.
    pub files: filter::FileSummary,
    /// Chart panels, one per case.
    pub panels: Vec<panel::CasePanel>,
}

/// Apply a filter to a result set and shape the visible records.
pub fn build_report(set: &ResultSet, state: FilterState) -> Report {
    let visible = filter::filter_records(&set.chart_data, &state);
    let panels = panel::build_panels(&visible);
    let files = filter::matching_files(&set.chart_data, state.start_date);

    Report {
        filter: state,
        files,
        panels,
    }
}

/// Load `base` and build the report for `state`, or the default filter.
pub fn report_for_dir(
    base: impl AsRef<Path>,
    policy: LoadPolicy,
    state: Option<FilterState>,
) -> (ResultSet, Report) {
    let set = load_result_set(base, policy);
    let state = state.unwrap_or_else(|| FilterState::defaults_for(&set));
    let report = build_report(&set, state);
    (set, report)
}
