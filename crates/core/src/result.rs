// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result file data model.
//!
//! Mirrors the JSON written by VectorDBBench for one run. Optional fields
//! are modelled as `Option` so that partially filled results still parse;
//! unknown keys are kept in the `extra` maps and copied through.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::case::CaseId;

/// One parsed `result_*.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    /// Identifier of the benchmark run.
    #[serde(default, deserialize_with = "null_as_default")]
    pub run_id: String,
    /// Task label given to the run.
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_label: String,
    /// Case outcomes, in file order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<CaseResult>,
    /// Run timestamp as written by the benchmark tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    /// Date extracted from the filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_date: Option<NaiveDate>,
    /// Base name of the source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl ResultFile {
    /// Attach provenance taken from the source file name.
    pub fn with_provenance(mut self, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        self.file_date = crate::date::extract_date_from_filename(&filename);
        self.filename = Some(filename);
        self
    }
}

/// Outcome of one benchmark case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Measured values.
    pub metrics: Metric,
    /// Configuration the case ran with.
    pub task_config: TaskConfig,
    /// Free-text label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
}

/// Measurements collected for a case.
///
/// Capacity cases never carry concurrency series; `conc_num_list` is
/// absent for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Largest number of vectors loaded (capacity cases).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_load_count: Option<f64>,
    /// Load duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_duration: Option<f64>,
    /// Queries per second.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qps: Option<f64>,
    /// Serial p99 latency in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_latency_p99: Option<f64>,
    /// Recall.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recall: Option<f64>,
    /// Normalized discounted cumulative gain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndcg: Option<f64>,
    /// Concurrency levels of a performance run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conc_num_list: Option<Vec<f64>>,
    /// QPS per concurrency level.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub conc_qps_list: Vec<f64>,
    /// p99 latency per concurrency level.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub conc_latency_p99_list: Vec<f64>,
    /// Average latency per concurrency level.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub conc_latency_avg_list: Vec<f64>,
    /// Fields this model does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Configuration of the task that produced a case result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Database identifier, e.g. `Milvus`.
    pub db: String,
    /// Display name of the database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    /// Connection-level database configuration.
    #[serde(default, deserialize_with = "null_as_default")]
    pub db_config: DbConfig,
    /// Per-case database configuration.
    #[serde(default, deserialize_with = "null_as_default")]
    pub db_case_config: DbCaseConfig,
    /// Case selection and concurrency settings.
    #[serde(default)]
    pub case_config: CaseConfig,
}

impl TaskConfig {
    /// Display database name, falling back to the raw identifier.
    pub fn resolved_db_name(&self) -> &str {
        non_empty(self.db_name.as_deref()).unwrap_or(&self.db)
    }

    /// Configured db label, if set and non-empty.
    pub fn db_label(&self) -> Option<&str> {
        non_empty(self.db_config.db_label.as_deref())
    }

    /// Configured index name, if set and non-empty.
    pub fn index(&self) -> Option<&str> {
        non_empty(self.db_case_config.index.as_deref())
    }
}

/// Connection-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DbConfig {
    /// User supplied label distinguishing runs of the same database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_label: Option<String>,
    #[serde(flatten)]
    #[allow(missing_docs)]
    pub extra: Map<String, Value>,
}

/// Per-case index configuration. Only `index` is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DbCaseConfig {
    /// Index type, e.g. `HNSW`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(flatten)]
    #[allow(missing_docs)]
    pub extra: Map<String, Value>,
}

/// Case selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Which case ran.
    pub case_id: CaseId,
    /// Concurrency search settings of performance cases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency_search_config: Option<ConcurrencySearchConfig>,
}

/// Concurrency search settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencySearchConfig {
    /// Concurrency levels to test.
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_concurrency: Vec<u32>,
    /// Seconds spent at each level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency_duration: Option<f64>,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
