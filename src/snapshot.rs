//! Input document types and JSON parsing for weekly snapshot documents.
//!
//! The upstream publisher emits a single JSON array of weekly snapshots,
//! newest first. Everything here mirrors that wire shape; derived metrics
//! live in [`crate::engine`].

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::engine::bands::AgeBucketed;

/// One region's reported state as of one week.
///
/// All three maps are sparse: the set of age bands reported varies by
/// snapshot and by region, and a missing band means "not reported".
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRegionSnapshot {
    pub name: String,
    pub population: AgeBucketed,
    #[serde(rename = "firstDose")]
    pub first_dose: AgeBucketed,
    #[serde(rename = "secondDose")]
    pub second_dose: AgeBucketed,
}

/// One week's complete regional statistics document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeeklySnapshot {
    pub date: NaiveDate,
    pub statistics: BTreeMap<String, RawRegionSnapshot>,
}

/// An ordered series of weekly snapshots, strictly descending by date.
/// Index 0 is the most recent week; the series may be empty.
pub type SnapshotSeries = Vec<WeeklySnapshot>;

/// Parses a snapshot series from the published JSON document.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON for an array of
/// weekly snapshots.
pub fn parse_series(json: &str) -> Result<SnapshotSeries> {
    serde_json::from_str(json).context("malformed snapshot document")
}
