// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Normalization of result files into chart records.
//!
//! Every [`CaseResult`] of every loaded file becomes one [`ChartRecord`]
//! carrying its provenance, a composite display label, the names of the
//! metrics it actually measured, and display-rounded metric values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::case::CaseId;
use crate::metric;
use crate::result::{CaseResult, Metric, ResultFile, TaskConfig};

/// Longest db label shown before truncation.
const LABEL_MAX_CHARS: usize = 10;

/// Shown when a case has no index configured.
pub const NO_INDEX_INFO: &str = "No index info";

/// One chart-ready row per case result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    /// Raw database identifier.
    pub db: String,
    /// Display database name.
    pub db_name: String,
    /// Composite label, `<db> (<label>, <index>, <concurrency>T)`.
    pub db_label: String,
    /// Case the record belongs to.
    pub case_id: CaseId,
    /// Metrics with a measured value.
    pub metrics_set: Vec<String>,
    /// Date taken from the source filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_date: Option<NaiveDate>,
    /// Source filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Display values; untransformed fields are copied from the source.
    #[serde(flatten)]
    pub metrics: Metric,
}

impl ChartRecord {
    /// Display value of a named scalar metric.
    pub fn value(&self, name: &str) -> Option<f64> {
        match metric::descriptor(name) {
            Some(descriptor) => descriptor.value(&self.metrics),
            None => self.metrics.extra.get(name).and_then(|v| v.as_f64()),
        }
    }

    /// Whether the named metric was measured for this record.
    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics_set.iter().any(|m| m == name)
    }
}

/// Everything the presentation layer needs from one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Parsed files, in load order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ResultFile>,
    /// Normalized records, file order then case order.
    pub chart_data: Vec<ChartRecord>,
    /// Distinct display database names, first-seen order.
    pub db_names: Vec<String>,
    /// Distinct case ids, first-seen order.
    pub case_ids: Vec<CaseId>,
}

impl ResultSet {
    /// An empty set, shown as "no data".
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize loaded files and derive the filter options.
    pub fn from_files(results: Vec<ResultFile>) -> Self {
        let chart_data = normalize(&results);
        let db_names = distinct(chart_data.iter().map(|r| r.db_name.clone()));
        let case_ids = distinct(chart_data.iter().map(|r| r.case_id));

        Self {
            results,
            chart_data,
            db_names,
            case_ids,
        }
    }

    /// Whether nothing was loaded.
    pub fn is_empty(&self) -> bool {
        self.chart_data.is_empty()
    }

    /// Number of source files loaded, including files without cases.
    pub fn file_count(&self) -> usize {
        self.results.len()
    }
}

/// Flatten result files into chart records.
///
/// Pure: the same input always yields the same records, in file order
/// followed by in-file case order. No sorting is applied.
pub fn normalize(files: &[ResultFile]) -> Vec<ChartRecord> {
    files
        .iter()
        .flat_map(|file| {
            file.results
                .iter()
                .map(move |case| to_record(case, file.file_date, file.filename.as_deref()))
        })
        .collect()
}

fn to_record(case: &CaseResult, file_date: Option<NaiveDate>, filename: Option<&str>) -> ChartRecord {
    let config = &case.task_config;

    ChartRecord {
        db: config.db.clone(),
        db_name: config.resolved_db_name().to_string(),
        db_label: generate_label(config, &case.metrics),
        case_id: config.case_config.case_id,
        metrics_set: metric::valid_metric_names(&case.metrics),
        file_date,
        filename: filename.map(str::to_string),
        metrics: metric::display_values(&case.metrics),
    }
}

/// Build the composite display label of a case.
///
/// The db label is cut to ten characters, a missing index reads
/// `No index info`, and a non-empty concurrency series is rendered as
/// `1, 2T`. Missing parts are left out.
pub fn generate_label(config: &TaskConfig, metrics: &Metric) -> String {
    let short_label = config.db_label().map(truncate_label);
    let index_info = config.index().unwrap_or(NO_INDEX_INFO).to_string();
    let concurrency = metrics
        .conc_num_list
        .as_deref()
        .filter(|levels| !levels.is_empty())
        .map(|levels| {
            let joined: Vec<String> = levels.iter().map(|l| l.to_string()).collect();
            format!("{}T", joined.join(", "))
        });

    compose_label(&config.db, [short_label, Some(index_info), concurrency])
}

/// Join the present label parts inside parentheses after the db name.
///
/// With no parts the result is `"<db> ()"`.
pub fn compose_label(db: &str, parts: [Option<String>; 3]) -> String {
    let parts: Vec<String> = parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect();

    format!("{} ({})", db, parts.join(", "))
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() > LABEL_MAX_CHARS {
        let head: String = label.chars().take(LABEL_MAX_CHARS).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

fn distinct<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
