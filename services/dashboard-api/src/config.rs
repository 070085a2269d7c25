// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Service configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `dashboard.toml` in the working directory, or the file named by
//!    `DASHBOARD_CONFIG`
//! 3. `DASHBOARD__<SECTION>__<KEY>` environment variables, e.g.
//!    `DASHBOARD__SERVER__PORT=9000`
//! 4. `RESULTS_PATH`, which points the loader at the benchmark output
//!
//! `.env` files are read by the binary before settings are built.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use vdbbench_dashboard_results::io::{LoadPolicy, DEFAULT_RESULTS_DIR};

/// Environment variable naming the results directory.
pub const RESULTS_PATH_ENV: &str = "RESULTS_PATH";

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub results: ResultsSettings,
    pub logging: LoggingSettings,
    pub filters: FilterStoreSettings,
}

/// HTTP listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Where results come from and how bad files are handled.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsSettings {
    pub path: PathBuf,
    pub policy: LoadPolicy,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
}

/// Filter profile backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    File,
}

/// Filter profile persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterStoreSettings {
    pub backend: StoreBackend,
    /// Directory for the file backend.
    pub dir: PathBuf,
}

impl Settings {
    /// Build settings from defaults, an optional file, and the environment.
    ///
    /// An explicit `file` must exist; the implicit `dashboard.toml` is
    /// optional.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("results.path", DEFAULT_RESULTS_DIR)?
            .set_default("results.policy", "skip_invalid")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("filters.backend", "memory")?
            .set_default("filters.dir", ".dashboard/filters")?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("dashboard").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(path) = std::env::var(RESULTS_PATH_ENV) {
            builder = builder.set_override("results.path", path)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
