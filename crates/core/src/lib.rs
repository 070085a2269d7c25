// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core types for the VDBBench dashboard.
//!
//! This crate turns parsed VectorDBBench result files into chart-ready
//! records and shapes them for presentation. It performs no I/O; loading
//! lives in `vdbbench-dashboard-results`.
//!
//! # Quick Start
//!
//! ```
//! use vdbbench_dashboard_core::{FilterState, ResultSet};
//!
//! let set = ResultSet::from_files(Vec::new());
//! let state = FilterState::defaults_for(&set);
//! let visible = vdbbench_dashboard_core::filter::filter_records(&set.chart_data, &state);
//! assert!(visible.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`result`] - Result file data model
//! - [`date`] - Filename date extraction
//! - [`case`] - Case catalogue and display groups
//! - [`metric`] - Metric descriptors
//! - [`chart`] - Normalization into chart records
//! - [`filter`] - Filter state and predicates
//! - [`store`] - Filter profile persistence
//! - [`panel`] - Grouping and ranking for charts

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod case;
pub mod chart;
pub mod date;
pub mod filter;
pub mod metric;
pub mod panel;
pub mod result;
pub mod store;

pub use case::CaseId;
pub use chart::{ChartRecord, ResultSet};
pub use filter::FilterState;
pub use metric::{Direction, MetricDescriptor};
pub use panel::{Bar, CasePanel, MetricChart};
pub use result::{CaseResult, Metric, ResultFile, TaskConfig};
pub use store::{FilterStore, MemoryFilterStore, StoreError};
