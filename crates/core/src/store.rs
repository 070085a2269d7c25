// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Filter profile persistence.
//!
//! Filter selections are stored per named profile through the
//! [`FilterStore`] trait. The in-memory store lives here; a file-backed
//! store is provided by `vdbbench-dashboard-results`.

use dashmap::DashMap;
use thiserror::Error;

use crate::filter::FilterState;

/// Errors raised by filter stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Profile names are used as keys and file names.
    #[error("Invalid profile name: {0}")]
    InvalidProfile(String),

    /// Stored state could not be decoded.
    #[error("Stored filter state is corrupt: {0}")]
    Corrupt(String),

    /// Backend I/O failure.
    #[error("Filter store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Key-value persistence for filter profiles.
#[cfg_attr(test, mockall::automock)]
pub trait FilterStore: Send + Sync {
    /// Load a profile; `None` if it was never saved.
    fn load(&self, profile: &str) -> Result<Option<FilterState>>;

    /// Save a profile, replacing any previous state.
    fn save(&self, profile: &str, state: &FilterState) -> Result<()>;
}

/// Check that a profile name is usable as a key.
///
/// Accepts 1-64 ASCII alphanumerics, `-` and `_`.
pub fn validate_profile(profile: &str) -> Result<()> {
    let valid = !profile.is_empty()
        && profile.len() <= 64
        && profile
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidProfile(profile.to_string()))
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryFilterStore {
    profiles: DashMap<String, FilterState>,
}

impl MemoryFilterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profile was saved.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FilterStore for MemoryFilterStore {
    fn load(&self, profile: &str) -> Result<Option<FilterState>> {
        validate_profile(profile)?;
        Ok(self.profiles.get(profile).map(|entry| entry.value().clone()))
    }

    fn save(&self, profile: &str, state: &FilterState) -> Result<()> {
        validate_profile(profile)?;
        self.profiles.insert(profile.to_string(), state.clone());
        Ok(())
    }
}
