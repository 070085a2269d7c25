// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared application state.

use metrics_exporter_prometheus::PrometheusHandle;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinError;
use tracing::{error, info};
use vdbbench_dashboard_core::filter::resolve_filters;
use vdbbench_dashboard_core::{FilterState, FilterStore, MemoryFilterStore, ResultSet};
use vdbbench_dashboard_results::{load_result_set, FileFilterStore, LoadPolicy};

use crate::config::{FilterStoreSettings, Settings, StoreBackend};
use crate::error::ApiError;

/// State shared by all handlers.
///
/// The loaded result set is immutable; a reload swaps in a new one.
pub struct AppState {
    results_dir: PathBuf,
    policy: LoadPolicy,
    results: RwLock<Arc<ResultSet>>,
    /// Serializes reloads so scans publish in call order.
    reload_lock: Mutex<()>,
    /// Filter profile persistence.
    pub store: Arc<dyn FilterStore>,
    /// Prometheus exporter, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State around an already loaded result set.
    pub fn new(settings: &Settings, set: ResultSet, store: Arc<dyn FilterStore>) -> Self {
        Self {
            results_dir: settings.results.path.clone(),
            policy: settings.results.policy,
            results: RwLock::new(Arc::new(set)),
            reload_lock: Mutex::new(()),
            store,
            metrics: None,
        }
    }

    /// Load the configured results directory and build the state.
    pub async fn load(settings: &Settings, store: Arc<dyn FilterStore>) -> Self {
        let state = Self::new(settings, ResultSet::empty(), store);
        state.reload().await;
        state
    }

    /// Attach the Prometheus handle served on `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Current result set.
    pub async fn results(&self) -> Arc<ResultSet> {
        self.results.read().await.clone()
    }

    /// Rescan the results directory and replace the current set.
    pub async fn reload(&self) -> Arc<ResultSet> {
        // Held until the new set is published so scans land in call order.
        let _guard = self.reload_lock.lock().await;
        let dir = self.results_dir.clone();
        let policy = self.policy;

        let set = match tokio::task::spawn_blocking(move || load_result_set(dir, policy)).await {
            Ok(set) => set,
            Err(e) => {
                error!(error = %e, "Result loading task failed");
                ResultSet::empty()
            }
        };

        info!(
            dir = %self.results_dir.display(),
            files = set.file_count(),
            records = set.chart_data.len(),
            "Results loaded"
        );

        let set = Arc::new(set);
        *self.results.write().await = set.clone();
        set
    }

    /// Stored filter state of a profile, read on the blocking pool.
    pub async fn load_filters(&self, profile: &str) -> Result<Option<FilterState>, ApiError> {
        let store = self.store.clone();
        let profile = profile.to_string();
        let loaded = tokio::task::spawn_blocking(move || store.load(&profile))
            .await
            .map_err(task_failed)?;
        Ok(loaded?)
    }

    /// Persist a profile on the blocking pool.
    pub async fn save_filters(&self, profile: &str, filter: FilterState) -> Result<FilterState, ApiError> {
        let store = self.store.clone();
        let profile = profile.to_string();
        let saved = tokio::task::spawn_blocking(move || store.save(&profile, &filter).map(|()| filter))
            .await
            .map_err(task_failed)?;
        Ok(saved?)
    }

    /// Stored filter state of a profile, or the defaults for `set`.
    pub async fn resolve_filters(&self, profile: &str, set: Arc<ResultSet>) -> FilterState {
        let store = self.store.clone();
        let profile = profile.to_string();
        let fallback = set.clone();
        match tokio::task::spawn_blocking(move || resolve_filters(store.as_ref(), &profile, &set)).await {
            Ok(filter) => filter,
            Err(e) => {
                error!(error = %e, "Filter lookup task failed");
                FilterState::defaults_for(&fallback)
            }
        }
    }
}

/// Build the configured filter store.
pub fn build_store(settings: &FilterStoreSettings) -> io::Result<Arc<dyn FilterStore>> {
    Ok(match settings.backend {
        StoreBackend::Memory => Arc::new(MemoryFilterStore::new()),
        StoreBackend::File => Arc::new(FileFilterStore::new(&settings.dir)?),
    })
}

fn task_failed(e: JoinError) -> ApiError {
    error!(error = %e, "Blocking task failed");
    ApiError::internal("TASK_FAILED", e.to_string())
}
