// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Metric descriptors.
//!
//! Every scalar metric the dashboard understands is described once here:
//! how to read it from a [`Metric`] bundle, whether a value counts as
//! measured, how it is rounded for display, its unit, and which direction
//! ranks better. Callers iterate [`METRICS`] instead of inspecting field
//! names at runtime.

use serde::Serialize;

use crate::result::Metric;

/// Values at or below this are treated as not measured.
pub const VALID_THRESHOLD: f64 = 1e-7;

/// Ranking direction of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Smaller values rank first.
    LessIsBetter,
    /// Larger values rank first.
    MoreIsBetter,
}

impl Direction {
    /// Short phrase used in chart titles.
    pub fn phrase(self) -> &'static str {
        match self {
            Direction::LessIsBetter => "less is better",
            Direction::MoreIsBetter => "more is better",
        }
    }
}

/// Description of one scalar metric.
#[derive(Clone, Copy)]
pub struct MetricDescriptor {
    /// Field name in result files and chart records.
    pub name: &'static str,
    /// Display unit.
    pub unit: &'static str,
    /// Ranking direction.
    pub direction: Direction,
    /// Whether the metric gets a chart.
    pub charted: bool,
    read: fn(&Metric) -> Option<f64>,
    write: fn(&mut Metric, f64),
    format: fn(f64) -> f64,
}

impl std::fmt::Debug for MetricDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricDescriptor")
            .field("name", &self.name)
            .field("unit", &self.unit)
            .field("direction", &self.direction)
            .field("charted", &self.charted)
            .finish_non_exhaustive()
    }
}

impl MetricDescriptor {
    /// Raw value from a metric bundle.
    pub fn value(&self, metric: &Metric) -> Option<f64> {
        (self.read)(metric)
    }

    /// Whether the bundle holds a measured value for this metric.
    pub fn is_valid(&self, metric: &Metric) -> bool {
        self.value(metric).is_some_and(is_valid_value)
    }

    /// Apply the display rounding rule to a raw value.
    pub fn format(&self, raw: f64) -> f64 {
        (self.format)(raw)
    }

    /// Replace the raw value in `metric` with its display value.
    pub fn apply_format(&self, metric: &mut Metric) {
        if let Some(raw) = self.value(metric) {
            (self.write)(metric, self.format(raw));
        }
    }

    /// Chart title, e.g. `Serial latency p99 in ms (less is better)`.
    pub fn title(&self) -> String {
        let mut chars = self.name.chars();
        let mut title: String = match chars.next() {
            Some(first) => first.to_uppercase().collect(),
            None => String::new(),
        };
        title.push_str(&chars.as_str().to_lowercase().replace('_', " "));

        if !matches!(self.name, "qps" | "recall") {
            title.push_str(" in ");
            title.push_str(self.unit);
        }
        format!("{} ({})", title, self.direction.phrase())
    }
}

/// Whether a raw value counts as measured.
pub fn is_valid_value(value: f64) -> bool {
    value > VALID_THRESHOLD
}

fn identity(value: f64) -> f64 {
    value
}

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

/// Scalar metrics in chart order. Charted metrics come first.
pub const METRICS: &[MetricDescriptor] = &[
    MetricDescriptor {
        name: "qps",
        unit: "QPS",
        direction: Direction::MoreIsBetter,
        charted: true,
        read: |m| m.qps,
        write: |m, v| m.qps = Some(v),
        format: |v| v.round(),
    },
    MetricDescriptor {
        name: "serial_latency_p99",
        unit: "ms",
        direction: Direction::LessIsBetter,
        charted: true,
        read: |m| m.serial_latency_p99,
        write: |m, v| m.serial_latency_p99 = Some(v),
        // seconds to milliseconds, two decimals
        format: |v| (v * 1000.0 * 100.0).round() / 100.0,
    },
    MetricDescriptor {
        name: "recall",
        unit: "%",
        direction: Direction::MoreIsBetter,
        charted: true,
        read: |m| m.recall,
        write: |m, v| m.recall = Some(v),
        format: identity,
    },
    MetricDescriptor {
        name: "load_duration",
        unit: "s",
        direction: Direction::LessIsBetter,
        charted: true,
        read: |m| m.load_duration,
        write: |m, v| m.load_duration = Some(v),
        format: |v| round_to(v, 10.0),
    },
    MetricDescriptor {
        name: "max_load_count",
        unit: "k",
        direction: Direction::MoreIsBetter,
        charted: true,
        read: |m| m.max_load_count,
        write: |m, v| m.max_load_count = Some(v),
        format: identity,
    },
    MetricDescriptor {
        name: "ndcg",
        unit: "",
        direction: Direction::MoreIsBetter,
        charted: false,
        read: |m| m.ndcg,
        write: |m, v| m.ndcg = Some(v),
        format: identity,
    },
];

/// Look up a descriptor by name.
pub fn descriptor(name: &str) -> Option<&'static MetricDescriptor> {
    METRICS.iter().find(|d| d.name == name)
}

/// Charted descriptors in chart order.
pub fn charted() -> impl Iterator<Item = &'static MetricDescriptor> {
    METRICS.iter().filter(|d| d.charted)
}

/// Names of the metrics holding a measured value, in descriptor order.
///
/// Unknown scalar fields kept in [`Metric::extra`] follow, using the same
/// threshold. Arrays never qualify.
pub fn valid_metric_names(metric: &Metric) -> Vec<String> {
    let known = METRICS
        .iter()
        .filter(|d| d.is_valid(metric))
        .map(|d| d.name.to_string());

    let extra = metric
        .extra
        .iter()
        .filter(|(_, value)| value.as_f64().is_some_and(is_valid_value))
        .map(|(name, _)| name.clone());

    known.chain(extra).collect()
}

/// A copy of `metric` with every descriptor's display rounding applied.
pub fn display_values(metric: &Metric) -> Metric {
    let mut out = metric.clone();
    for descriptor in METRICS {
        descriptor.apply_format(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Metric {
        Metric {
            qps: Some(1234.6),
            serial_latency_p99: Some(0.012345),
            recall: Some(0.98765),
            load_duration: Some(12.34567),
            max_load_count: Some(0.0),
            ndcg: Some(1e-8),
            conc_num_list: Some(vec![1.0, 2.0]),
            conc_qps_list: vec![100.0, 200.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_display_rounding() {
        let out = display_values(&sample());
        assert_eq!(out.serial_latency_p99, Some(12.35));
        assert_eq!(out.qps, Some(1235.0));
        assert_eq!(out.load_duration, Some(12.3));
        assert_eq!(out.recall, Some(0.98765));
        assert_eq!(out.conc_qps_list, vec![100.0, 200.0]);
    }

    #[test]
    fn test_valid_metric_names_threshold() {
        let names = valid_metric_names(&sample());
        assert_eq!(
            names,
            vec!["qps", "serial_latency_p99", "recall", "load_duration"]
        );
    }

    #[test]
    fn test_valid_metric_names_rejects_near_zero_and_negative() {
        let metric = Metric {
            qps: Some(VALID_THRESHOLD),
            recall: Some(-0.5),
            load_duration: Some(f64::NAN),
            ..Default::default()
        };
        assert!(valid_metric_names(&metric).is_empty());
    }

    #[test]
    fn test_valid_metric_names_includes_unknown_scalars_only() {
        let mut metric = Metric::default();
        metric.extra.insert("st_ideal_insert_duration".into(), json!(3.5));
        metric.extra.insert("st_search_stage_list".into(), json!([1, 2]));
        metric.extra.insert("note".into(), json!("fast"));
        metric.extra.insert("zeroed".into(), json!(0));

        assert_eq!(valid_metric_names(&metric), vec!["st_ideal_insert_duration"]);
    }

    #[test]
    fn test_titles() {
        assert_eq!(descriptor("qps").unwrap().title(), "Qps (more is better)");
        assert_eq!(
            descriptor("serial_latency_p99").unwrap().title(),
            "Serial latency p99 in ms (less is better)"
        );
        assert_eq!(
            descriptor("load_duration").unwrap().title(),
            "Load duration in s (less is better)"
        );
    }

    #[test]
    fn test_charted_order() {
        let names: Vec<_> = charted().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["qps", "serial_latency_p99", "recall", "load_duration", "max_load_count"]
        );
    }
}
