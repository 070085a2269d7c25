// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use vdbbench_dashboard_core::filter::default_start_date;
use vdbbench_dashboard_core::{CaseId, FilterState};
use vdbbench_dashboard_results::{build_report, Report};

use crate::error::ApiError;
use crate::state::AppState;

/// Profile used when a request names none.
pub const DEFAULT_PROFILE: &str = "default";

/// Chart filter parameters. Absent ones come from the profile.
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// Comma-separated database names.
    pub dbs: Option<String>,
    /// Comma-separated case ids.
    pub cases: Option<String>,
    /// `YYYY-MM-DD`; empty resets to the default start date.
    pub since: Option<String>,
    /// Stored profile to start from.
    pub profile: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/charts", get(charts))
}

async fn charts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<Report>, ApiError> {
    let results = state.results().await;
    let profile = query.profile.as_deref().unwrap_or(DEFAULT_PROFILE);
    let base = state.resolve_filters(profile, results.clone()).await;
    let filter = apply_query(base, &query)?;

    Ok(Json(build_report(&results, filter)))
}

/// Override a base filter with the query parameters that are present.
pub fn apply_query(mut filter: FilterState, query: &ChartQuery) -> Result<FilterState, ApiError> {
    if let Some(dbs) = &query.dbs {
        filter.selected_dbs = split_list(dbs).map(str::to_string).collect();
    }

    if let Some(cases) = &query.cases {
        filter.selected_cases = split_list(cases)
            .map(|id| {
                id.parse::<u32>().map(CaseId).map_err(|_| {
                    ApiError::bad_request("INVALID_CASE_ID", format!("Invalid case id '{}'", id))
                })
            })
            .collect::<Result<_, _>>()?;
    }

    if let Some(since) = &query.since {
        filter.start_date = Some(parse_since(since)?);
    }

    Ok(filter)
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_since(value: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default_start_date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::bad_request(
            "INVALID_DATE",
            format!("Invalid date '{}', expected YYYY-MM-DD", value),
        )
    })
}
