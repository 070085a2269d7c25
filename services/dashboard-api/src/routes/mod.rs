// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod charts;
pub mod filters;
pub mod health;
pub mod results;

use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::middleware::request_context_middleware;
use crate::state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(results::routes())
        .merge(charts::routes())
        .merge(filters::routes())
        .layer(middleware::from_fn(request_context_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
