// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use vdbbench_dashboard_core::case::{group_case_options, CaseGroup};
use vdbbench_dashboard_core::filter::default_start_date;
use vdbbench_dashboard_core::{CaseId, ChartRecord};

use crate::middleware::ReqContext;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub chart_data: Vec<ChartRecord>,
    pub db_names: Vec<String>,
    pub case_ids: Vec<CaseId>,
    pub file_count: usize,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub db_names: Vec<String>,
    pub case_groups: Vec<CaseGroup>,
    pub min_start_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub status: &'static str,
    pub request_id: String,
    pub files: usize,
    pub records: usize,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/results", get(list_results))
        .route("/api/v1/options", get(filter_options))
        .route("/api/v1/reload", post(reload_results))
}

async fn list_results(State(state): State<Arc<AppState>>) -> Json<ResultsResponse> {
    let results = state.results().await;
    Json(ResultsResponse {
        chart_data: results.chart_data.clone(),
        db_names: results.db_names.clone(),
        case_ids: results.case_ids.clone(),
        file_count: results.file_count(),
    })
}

async fn filter_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    let results = state.results().await;
    Json(OptionsResponse {
        db_names: results.db_names.clone(),
        case_groups: group_case_options(&results.case_ids),
        min_start_date: default_start_date(),
    })
}

async fn reload_results(
    State(state): State<Arc<AppState>>,
    ctx: ReqContext,
) -> Json<ReloadResponse> {
    let results = state.reload().await;

    info!(
        request_id = %ctx.request_id,
        files = results.file_count(),
        "Results reloaded on request"
    );

    Json(ReloadResponse {
        status: "reloaded",
        request_id: ctx.request_id.clone(),
        files: results.file_count(),
        records: results.chart_data.len(),
    })
}
