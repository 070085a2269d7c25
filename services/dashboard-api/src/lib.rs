// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dashboard API service.
//!
//! Serves normalized VectorDBBench results, filter options, chart panels
//! and stored filter profiles over HTTP.

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::Settings;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
