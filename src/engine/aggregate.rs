//! Weekly aggregation across all regions.
//!
//! Folds the newest snapshot's regions into a single [`WeeklyAggregate`]:
//! per-region derived metrics plus the observed min/max range of each
//! plottable metric, used to scale values onto the map's color ramp.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::engine::bands::total;
use crate::engine::region::{RegionMetrics, derive_region};
use crate::snapshot::SnapshotSeries;

/// Observed range of a metric across all regions in one aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// The range before any region has been folded in.
    pub fn empty() -> Self {
        MinMax {
            min: f64::INFINITY,
            max: 0.0,
        }
    }

    pub fn fold(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// The fully derived structure the visualization layer renders from.
///
/// Rebuilt wholesale from a snapshot series on every invocation; callers
/// see either a complete aggregate or nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAggregate {
    pub last_updated: NaiveDate,

    pub first_doses: MinMax,
    pub second_doses: MinMax,
    pub overall_doses: MinMax,
    pub doses_last_week: MinMax,
    pub change_in_doses: MinMax,

    pub regions: BTreeMap<String, RegionMetrics>,
}

/// Aggregates a snapshot series into a [`WeeklyAggregate`].
///
/// Only the newest three snapshots are consulted; missing earlier weeks act
/// as zero baselines. Returns `None` for an empty series. Regions are
/// folded independently, so iteration order cannot affect the result.
pub fn aggregate(series: &SnapshotSeries) -> Option<WeeklyAggregate> {
    let newest = series.first()?;

    let mut first_doses = MinMax::empty();
    let mut second_doses = MinMax::empty();
    let mut overall_doses = MinMax::empty();
    let mut doses_last_week = MinMax::empty();
    let mut change_in_doses = MinMax::empty();
    let mut regions = BTreeMap::new();

    for (id, current) in &newest.statistics {
        let prior = series.get(1).and_then(|s| s.statistics.get(id));
        let two_weeks_ago = series.get(2).and_then(|s| s.statistics.get(id));

        let metrics = derive_region(current, prior, two_weeks_ago);

        let first = total(&metrics.first_doses) as f64;
        let second = total(&metrics.second_doses) as f64;

        first_doses.fold(first);
        second_doses.fold(second);
        overall_doses.fold(first + second);
        doses_last_week
            .fold((metrics.first_doses_this_week + metrics.second_doses_this_week) as f64);
        change_in_doses.fold(metrics.change_in_doses.abs());

        regions.insert(id.clone(), metrics);
    }

    Some(WeeklyAggregate {
        last_updated: newest.date,
        first_doses,
        second_doses,
        overall_doses,
        doses_last_week,
        change_in_doses,
        regions,
    })
}
