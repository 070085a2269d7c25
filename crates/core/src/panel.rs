// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Grouping and ranking of filtered records into chart panels.
//!
//! A panel holds one case's charts, one chart per metric, each a ranked
//! list of bars. Rendering is left to the client.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::case::CaseId;
use crate::chart::ChartRecord;
use crate::metric::{self, Direction, MetricDescriptor};

/// One bar of a metric chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    /// Composite record label.
    pub label: String,
    /// Display database name.
    pub db_name: String,
    /// Display value.
    pub value: f64,
    /// Source file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Ranked bars for one metric within a case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricChart {
    /// Metric name.
    pub metric: &'static str,
    /// Chart title including unit and direction.
    pub title: String,
    /// Display unit.
    pub unit: &'static str,
    /// Ranking direction.
    pub direction: Direction,
    /// Bars, best first.
    pub bars: Vec<Bar>,
}

/// Charts of one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CasePanel {
    /// Case id.
    pub case_id: CaseId,
    /// Case label, absent for unknown ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    /// Non-empty charts in metric order.
    pub charts: Vec<MetricChart>,
}

/// Build chart panels from filtered records.
///
/// Panels are ordered by case id. Only charted metrics that some record
/// measured are considered, and charts without bars are dropped.
pub fn build_panels(records: &[&ChartRecord]) -> Vec<CasePanel> {
    let metrics: Vec<&MetricDescriptor> = metric::charted()
        .filter(|d| records.iter().any(|r| r.has_metric(d.name)))
        .collect();

    let mut by_case: BTreeMap<CaseId, Vec<&ChartRecord>> = BTreeMap::new();
    for &record in records {
        by_case.entry(record.case_id).or_default().push(record);
    }

    by_case
        .into_iter()
        .map(|(case_id, case_records)| CasePanel {
            case_id,
            label: case_id.label(),
            charts: metrics
                .iter()
                .filter_map(|d| build_chart(d, &case_records))
                .collect(),
        })
        .collect()
}

fn build_chart(descriptor: &MetricDescriptor, records: &[&ChartRecord]) -> Option<MetricChart> {
    let mut bars: Vec<Bar> = records
        .iter()
        .filter(|r| r.has_metric(descriptor.name))
        .filter_map(|r| {
            let value = descriptor.value(&r.metrics)?;
            metric::is_valid_value(value).then(|| Bar {
                label: r.db_label.clone(),
                db_name: r.db_name.clone(),
                value,
                filename: r.filename.clone(),
            })
        })
        .collect();

    if bars.is_empty() {
        return None;
    }

    // Stable, so equal values keep record order.
    match descriptor.direction {
        Direction::LessIsBetter => bars.sort_by(|a, b| a.value.total_cmp(&b.value)),
        Direction::MoreIsBetter => bars.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }

    Some(MetricChart {
        metric: descriptor.name,
        title: descriptor.title(),
        unit: descriptor.unit,
        direction: descriptor.direction,
        bars,
    })
}
