// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dashboard API entry point.

use anyhow::Context;
use dashboard_api::{logging, router, state, AppState, Settings};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Environment variable naming an explicit settings file.
const CONFIG_ENV: &str = "DASHBOARD_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref()).context("Failed to load settings")?;
    logging::init(&settings.logging);

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;
    let store = state::build_store(&settings.filters).context("Failed to open filter store")?;

    let app_state = AppState::load(&settings, store).await.with_metrics(handle);
    let app = router(Arc::new(app_state));

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        addr = %addr,
        results = %settings.results.path.display(),
        "Dashboard API listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Dashboard API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
