// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Case catalogue.
//!
//! VectorDBBench identifies each benchmark scenario by an integer id. The
//! ids known to the dashboard form a fixed table; ids outside of it are
//! carried through unchanged but have no display label.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a benchmark case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub u32);

/// Known case ids and their display labels.
pub const CASE_LABELS: &[(u32, &str)] = &[
    (1, "Capacity (128D)"),
    (2, "Capacity (960D)"),
    (3, "Performance (100M, 768D)"),
    (4, "Performance (10M, 768D)"),
    (5, "Performance (1M, 768D)"),
    (6, "Filtering (10M, 768D, 1%)"),
    (7, "Filtering (1M, 768D, 1%)"),
    (8, "Filtering (10M, 768D, 99%)"),
    (9, "Filtering (1M, 768D, 99%)"),
    (10, "Performance (500K, 1536D)"),
    (11, "Performance (5M, 1536D)"),
    (12, "Filtering (500K, 1536D, 1%)"),
    (13, "Filtering (5M, 1536D, 1%)"),
    (14, "Filtering (500K, 1536D, 99%)"),
    (15, "Filtering (5M, 1536D, 99%)"),
    (50, "Performance (50K, 1536D)"),
    (100, "Custom"),
    (101, "Custom Dataset Performance"),
];

/// Display groups for case selection, in presentation order.
pub const CASE_GROUPS: &[(&str, &[u32])] = &[
    ("Capacity Tests", &[2, 1]),
    ("768D Performance Tests", &[3, 4, 5]),
    ("768D Filtering Tests", &[6, 7, 8, 9]),
    ("1536D Performance Tests", &[11, 10, 50]),
    ("1536D Filtering Tests", &[13, 12, 15, 14]),
    ("Custom Tests", &[100, 101]),
];

impl CaseId {
    /// Display label, or `None` for ids outside the catalogue.
    pub fn label(self) -> Option<&'static str> {
        CASE_LABELS
            .iter()
            .find(|(id, _)| *id == self.0)
            .map(|(_, label)| *label)
    }

    /// Whether the id is part of the catalogue.
    pub fn is_known(self) -> bool {
        self.label().is_some()
    }

    /// Capacity cases measure load limits and have no concurrency series.
    pub fn is_capacity(self) -> bool {
        matches!(self.0, 1 | 2)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CaseId {
    fn from(id: u32) -> Self {
        CaseId(id)
    }
}

/// A selectable case with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOption {
    /// Case id.
    pub id: CaseId,
    /// Display label.
    pub label: &'static str,
}

/// A titled group of selectable cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseGroup {
    /// Group title.
    pub title: &'static str,
    /// Cases of this group present in the data.
    pub cases: Vec<CaseOption>,
}

/// Group the available case ids for display.
///
/// Groups keep their catalogue order and drop ids missing from
/// `available`; groups left empty are omitted. Ids outside every group
/// are not offered.
pub fn group_case_options(available: &[CaseId]) -> Vec<CaseGroup> {
    CASE_GROUPS
        .iter()
        .map(|&(title, ids)| CaseGroup {
            title,
            cases: ids
                .iter()
                .map(|id| CaseId(*id))
                .filter(|id| available.contains(id))
                .filter_map(|id| id.label().map(|label| CaseOption { id, label }))
                .collect(),
        })
        .filter(|group| !group.cases.is_empty())
        .collect()
}
