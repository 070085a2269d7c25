// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::info;
use vdbbench_dashboard_core::FilterState;

use crate::error::ApiError;
use crate::middleware::ReqContext;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/v1/filters/:profile", get(get_filters).put(put_filters))
}

/// Stored profile, or the defaults for the current results.
async fn get_filters(
    State(state): State<Arc<AppState>>,
    Path(profile): Path<String>,
) -> Result<Json<FilterState>, ApiError> {
    let results = state.results().await;
    let filter = match state.load_filters(&profile).await? {
        Some(filter) => filter,
        None => FilterState::defaults_for(&results),
    };
    Ok(Json(filter))
}

async fn put_filters(
    State(state): State<Arc<AppState>>,
    Path(profile): Path<String>,
    ctx: ReqContext,
    Json(filter): Json<FilterState>,
) -> Result<(StatusCode, Json<FilterState>), ApiError> {
    let filter = state.save_filters(&profile, filter).await?;

    info!(
        request_id = %ctx.request_id,
        profile = %profile,
        dbs = filter.selected_dbs.len(),
        cases = filter.selected_cases.len(),
        "Filter profile saved"
    );

    Ok((StatusCode::OK, Json(filter)))
}
