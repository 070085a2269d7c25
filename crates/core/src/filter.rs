// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Filter state and predicates.
//!
//! A [`FilterState`] is plain serializable configuration. Selecting the
//! visible records is a pure function of the state and the records;
//! persistence of the state goes through a [`FilterStore`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::case::CaseId;
use crate::chart::{ChartRecord, ResultSet};
use crate::store::FilterStore;

/// Earliest start date offered, and the default one.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Selection applied to the chart records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Display database names to show.
    #[serde(default)]
    pub selected_dbs: Vec<String>,
    /// Cases to show.
    #[serde(default)]
    pub selected_cases: Vec<CaseId>,
    /// Only show results dated on or after this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl FilterState {
    /// All databases, the first case, results since 2023-01-01.
    pub fn defaults_for(set: &ResultSet) -> Self {
        Self {
            selected_dbs: set.db_names.clone(),
            selected_cases: set.case_ids.first().copied().into_iter().collect(),
            start_date: Some(default_start_date()),
        }
    }

    /// Whether a record passes this filter.
    ///
    /// Records without a file date are never excluded by the start date.
    pub fn matches(&self, record: &ChartRecord) -> bool {
        let db_selected = self.selected_dbs.iter().any(|db| *db == record.db_name);
        let case_selected = self.selected_cases.contains(&record.case_id);
        let recent_enough = match (self.start_date, record.file_date) {
            (Some(start), Some(date)) => date >= start,
            _ => true,
        };

        db_selected && case_selected && recent_enough
    }

    /// Toggle a database in the selection.
    pub fn toggle_db(&mut self, db_name: &str) {
        if let Some(pos) = self.selected_dbs.iter().position(|db| db == db_name) {
            self.selected_dbs.remove(pos);
        } else {
            self.selected_dbs.push(db_name.to_string());
        }
    }
}

/// Records passing the filter, in their original order.
pub fn filter_records<'a>(records: &'a [ChartRecord], state: &FilterState) -> Vec<&'a ChartRecord> {
    records.iter().filter(|r| state.matches(r)).collect()
}

/// Source files behind the records, for the "N files match" summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    /// Number of distinct files.
    pub count: usize,
    /// Distinct filenames, first-seen order.
    pub filenames: Vec<String>,
}

/// Distinct filenames of the records, optionally restricted by date.
///
/// With a start date only records that carry a file date on or after it
/// are counted.
pub fn matching_files(records: &[ChartRecord], start_date: Option<NaiveDate>) -> FileSummary {
    let mut filenames: Vec<String> = Vec::new();

    for record in records {
        let Some(filename) = record.filename.as_deref() else {
            continue;
        };
        let in_range = match start_date {
            None => true,
            Some(start) => record.file_date.is_some_and(|date| date >= start),
        };
        if in_range && !filenames.iter().any(|f| f == filename) {
            filenames.push(filename.to_string());
        }
    }

    FileSummary {
        count: filenames.len(),
        filenames,
    }
}

/// Stored filter state of a profile, or the defaults for `set`.
///
/// Store failures are logged and fall back to the defaults.
pub fn resolve_filters(store: &dyn FilterStore, profile: &str, set: &ResultSet) -> FilterState {
    match store.load(profile) {
        Ok(Some(state)) => state,
        Ok(None) => FilterState::defaults_for(set),
        Err(e) => {
            warn!(profile, error = %e, "Failed to load filter profile, using defaults");
            FilterState::defaults_for(set)
        }
    }
}
