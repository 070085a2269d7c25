// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Filename date extraction.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static DATE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{8}").expect("date token pattern is valid"));

/// Extract a `YYYYMMDD` date from a filename.
///
/// The first eight consecutive digits anywhere in the name are used, e.g.
/// `result_20240512_standard_milvus.json` yields 2024-05-12. Returns `None`
/// when the name has no such run or the digits do not form a real calendar
/// date.
pub fn extract_date_from_filename(filename: &str) -> Option<NaiveDate> {
    let token = DATE_TOKEN.find(filename)?.as_str();

    // The token is ASCII digits only, so these parses and slices cannot fail.
    let year: i32 = token[0..4].parse().ok()?;
    let month: u32 = token[4..6].parse().ok()?;
    let day: u32 = token[6..8].parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day);
    if date.is_none() {
        debug!(filename, token, "Date token is not a calendar date");
    }
    date
}
