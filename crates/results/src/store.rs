// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! File-backed filter profile store.
//!
//! Each profile is one `<profile>.json` file in the store directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use vdbbench_dashboard_core::store::{validate_profile, Result, StoreError};
use vdbbench_dashboard_core::{FilterState, FilterStore};

/// Stores filter profiles as JSON files.
#[derive(Debug, Clone)]
pub struct FileFilterStore {
    dir: PathBuf,
}

impl FileFilterStore {
    /// Use `dir` for profiles, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the profiles.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, profile: &str) -> Result<PathBuf> {
        validate_profile(profile)?;
        Ok(self.dir.join(format!("{}.json", profile)))
    }
}

impl FilterStore for FileFilterStore {
    fn load(&self, profile: &str) -> Result<Option<FilterState>> {
        let path = self.path_for(profile)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
    }

    fn save(&self, profile: &str, state: &FilterState) -> Result<()> {
        let path = self.path_for(profile)?;
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        // Write then rename so readers never see a partial file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        debug!(profile, path = %path.display(), "Saved filter profile");
        Ok(())
    }
}
