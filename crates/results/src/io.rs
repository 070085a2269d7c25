// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! I/O operations for benchmark results.
//!
//! This module scans a results directory for VectorDBBench result files,
//! parses them, and writes normalized exports back to the filesystem.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use vdbbench_dashboard_core::{ResultFile, ResultSet};
use walkdir::WalkDir;

/// Result files start with this prefix.
pub const RESULT_PREFIX: &str = "result_";

/// Result files end with this suffix.
pub const RESULT_SUFFIX: &str = ".json";

/// Default results directory, usually a symlink to the benchmark output.
pub const DEFAULT_RESULTS_DIR: &str = "private";

/// Errors that can occur while loading results.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The directory tree could not be walked.
    #[error("Failed to scan results directory '{path}': {source}")]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// A result file could not be read.
    #[error("Failed to read result file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A result file is not valid result JSON.
    #[error("Failed to parse result file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// An export could not be written.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// What to do with a result file that cannot be read or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Log the file and continue with the rest.
    #[default]
    SkipInvalid,
    /// Fail the whole load.
    AbortBatch,
}

/// Whether a file name follows the `result_*.json` convention.
pub fn is_result_file(name: &str) -> bool {
    name.starts_with(RESULT_PREFIX) && name.ends_with(RESULT_SUFFIX)
}

/// Recursively list result files under `base`, sorted by path.
///
/// Symlinks are followed. An unreadable root always fails. Entries below
/// it that cannot be visited (dangling links, unreadable subdirectories,
/// link loops) fail under [`LoadPolicy::AbortBatch`] and are logged and
/// skipped otherwise.
pub fn scan_result_files(base: impl AsRef<Path>, policy: LoadPolicy) -> Result<Vec<PathBuf>> {
    let base = base.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(base).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() > 0 && policy == LoadPolicy::SkipInvalid => {
                warn!(
                    path = ?source.path(),
                    error = %source,
                    "Skipping unreadable entry in results directory"
                );
                metrics::counter!("vdbbench_result_files_skipped_total").increment(1);
                continue;
            }
            Err(source) => {
                return Err(LoadError::Scan {
                    path: base.to_path_buf(),
                    source,
                })
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry.file_name().to_str().is_some_and(is_result_file);
        if matches {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Read and parse one result file, attaching its provenance.
pub fn read_result_file(path: impl AsRef<Path>) -> Result<ResultFile> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ResultFile = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(parsed.with_provenance(filename))
}

/// Load every result file under `base`.
///
/// An unreadable `base` always fails. Unreadable entries and files below it
/// fail under [`LoadPolicy::AbortBatch`] and are logged and skipped
/// otherwise.
pub fn load_results(base: impl AsRef<Path>, policy: LoadPolicy) -> Result<Vec<ResultFile>> {
    let base = base.as_ref();
    let paths = scan_result_files(base, policy)?;
    let mut results = Vec::with_capacity(paths.len());
    let mut skipped = 0u64;

    for path in &paths {
        match read_result_file(path) {
            Ok(result) => {
                debug!(path = %path.display(), cases = result.results.len(), "Loaded result file");
                results.push(result);
            }
            Err(e) if policy == LoadPolicy::SkipInvalid => {
                warn!(error = %e, "Skipping unreadable result file");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    metrics::counter!("vdbbench_result_files_loaded_total").increment(results.len() as u64);
    metrics::counter!("vdbbench_result_files_skipped_total").increment(skipped);

    info!(
        base = %base.display(),
        found = paths.len(),
        loaded = results.len(),
        skipped,
        "Result scan complete"
    );

    Ok(results)
}

/// Load and normalize a results directory, never failing.
///
/// Any error is logged and yields the empty result set, which the
/// dashboard shows as "no data".
pub fn load_result_set(base: impl AsRef<Path>, policy: LoadPolicy) -> ResultSet {
    match load_results(base, policy) {
        Ok(results) => {
            let set = ResultSet::from_files(results);
            metrics::gauge!("vdbbench_chart_records").set(set.chart_data.len() as f64);
            set
        }
        Err(e) => {
            error!(error = %e, "Error reading result files");
            metrics::gauge!("vdbbench_chart_records").set(0.0);
            ResultSet::empty()
        }
    }
}

/// Write a value as pretty JSON.
pub fn write_json<T: Serialize>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value).map_err(|e| LoadError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    fs::write(path, json).map_err(|source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;
    use vdbbench_dashboard_core::CaseId;

    const CAPACITY_CASE: &str = r#"{
        "metrics": {"max_load_count": 1500000, "load_duration": 0, "qps": 0,
                    "serial_latency_p99": 0, "recall": 0, "ndcg": 0,
                    "conc_qps_list": [], "conc_latency_p99_list": [], "conc_latency_avg_list": []},
        "task_config": {"db": "Milvus", "db_config": {}, "db_case_config": {"index": "HNSW"},
                        "case_config": {"case_id": 1}},
        "label": ":)"
    }"#;

    const PERFORMANCE_CASE: &str = r#"{
        "metrics": {"max_load_count": 0, "load_duration": 412.3456, "qps": 1234.6,
                    "serial_latency_p99": 0.012345, "recall": 0.9876, "ndcg": 0.99,
                    "conc_num_list": [10, 50], "conc_qps_list": [900.1, 1234.6],
                    "conc_latency_p99_list": [0.01, 0.02], "conc_latency_avg_list": [0.005, 0.01]},
        "task_config": {"db": "Milvus", "db_config": {"db_label": "2.4-standalone"},
                        "db_case_config": {"index": "HNSW"},
                        "case_config": {"case_id": 5,
                                        "concurrency_search_config": {"num_concurrency": [10, 50],
                                                                      "concurrency_duration": 30}}},
        "label": ":)"
    }"#;

    fn result_json(cases: &[&str]) -> String {
        format!(
            r#"{{"run_id": "c2f8", "task_label": "standard", "results": [{}], "timestamp": 1715472000.0}}"#,
            cases.join(",")
        )
    }

    #[test]
    fn test_is_result_file() {
        assert!(is_result_file("result_20240512_run.json"));
        assert!(!is_result_file("results_20240512.json"));
        assert!(!is_result_file("result_20240512.json.bak"));
        assert!(!is_result_file("summary.json"));
    }

    #[test]
    fn test_end_to_end_load() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("Milvus");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            nested.join("result_20240512_run.json"),
            result_json(&[CAPACITY_CASE, PERFORMANCE_CASE]),
        )
        .unwrap();
        fs::write(nested.join("notes.json"), "not a result").unwrap();

        let set = load_result_set(dir.path(), LoadPolicy::SkipInvalid);
        assert_eq!(set.results.len(), 1);
        assert_eq!(set.chart_data.len(), 2);

        let date = NaiveDate::from_ymd_opt(2024, 5, 12);
        for record in &set.chart_data {
            assert_eq!(record.file_date, date);
            assert_eq!(record.filename.as_deref(), Some("result_20240512_run.json"));
        }

        assert_eq!(set.chart_data[0].db_label, "Milvus (HNSW)");
        assert_eq!(set.chart_data[0].metrics_set, vec!["max_load_count"]);
        assert_eq!(set.chart_data[1].db_label, "Milvus (2.4-standa..., HNSW, 10, 50T)");
        assert_eq!(set.chart_data[1].value("serial_latency_p99"), Some(12.35));
        assert_eq!(set.chart_data[1].value("qps"), Some(1235.0));
        assert_eq!(set.chart_data[1].value("load_duration"), Some(412.3));

        assert_eq!(set.db_names, vec!["Milvus"]);
        assert_eq!(set.case_ids, vec![CaseId(1), CaseId(5)]);
    }

    #[test]
    fn test_missing_directory_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        assert!(matches!(
            load_results(&missing, LoadPolicy::SkipInvalid),
            Err(LoadError::Scan { .. })
        ));

        let set = load_result_set(&missing, LoadPolicy::SkipInvalid);
        assert!(set.is_empty());
        assert!(set.results.is_empty());
        assert!(set.db_names.is_empty());
        assert!(set.case_ids.is_empty());
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("result_20240101_bad.json"), "{ not json").unwrap();
        fs::write(
            dir.path().join("result_20240102_good.json"),
            result_json(&[PERFORMANCE_CASE]),
        )
        .unwrap();

        let set = load_result_set(dir.path(), LoadPolicy::SkipInvalid);
        assert_eq!(set.results.len(), 1);
        assert_eq!(set.results[0].filename.as_deref(), Some("result_20240102_good.json"));
    }

    #[test]
    fn test_malformed_file_aborts_batch() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("result_20240101_bad.json"), "{ not json").unwrap();
        fs::write(
            dir.path().join("result_20240102_good.json"),
            result_json(&[PERFORMANCE_CASE]),
        )
        .unwrap();

        assert!(matches!(
            load_results(dir.path(), LoadPolicy::AbortBatch),
            Err(LoadError::Parse { .. })
        ));
        assert!(load_result_set(dir.path(), LoadPolicy::AbortBatch).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("result_20240512_good.json"),
            result_json(&[PERFORMANCE_CASE]),
        )
        .unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("stale_link")).unwrap();

        let set = load_result_set(dir.path(), LoadPolicy::SkipInvalid);
        assert_eq!(set.file_count(), 1);
        assert_eq!(set.chart_data.len(), 1);

        assert!(matches!(
            load_results(dir.path(), LoadPolicy::AbortBatch),
            Err(LoadError::Scan { .. })
        ));
    }

    #[test]
    fn test_null_series_keeps_file() {
        let dir = TempDir::new().unwrap();
        let case = r#"{
            "metrics": {"qps": 10.0, "recall": 0.9, "conc_qps_list": null},
            "task_config": {"db": "Milvus", "case_config": {"case_id": 5}},
            "label": null
        }"#;
        fs::write(dir.path().join("result_20240512_nulls.json"), result_json(&[case])).unwrap();

        let set = load_result_set(dir.path(), LoadPolicy::AbortBatch);
        assert_eq!(set.chart_data.len(), 1);
        assert_eq!(set.chart_data[0].metrics_set, vec!["qps", "recall"]);
    }

    #[test]
    fn test_write_json_export() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("result_20240512_run.json"),
            result_json(&[PERFORMANCE_CASE]),
        )
        .unwrap();
        let set = load_result_set(dir.path(), LoadPolicy::default());

        let out = dir.path().join("chart_data.json");
        write_json(&set.chart_data, &out).unwrap();

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(written[0]["db_name"], "Milvus");
        assert_eq!(written[0]["file_date"], "2024-05-12");
        assert_eq!(written[0]["conc_num_list"], serde_json::json!([10.0, 50.0]));
    }
}
