//! Per-mode value selection and color-scale normalization.
//!
//! The rendering layer owns the selected mode and hover state and passes
//! them in on every redraw; everything here is a pure read of the
//! aggregate built by [`crate::engine::aggregate`].

use crate::engine::aggregate::WeeklyAggregate;
use crate::engine::bands::{dose_population_ratio, total};
use crate::engine::region::RegionMetrics;

/// The metric currently rendered on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapMode {
    /// Cumulative first plus second doses.
    DosesAllTime,
    /// Doses administered since the prior snapshot.
    DosesLastWeek,
    /// First doses as a percentage of total population.
    OverallPercent,
    /// Week-over-week change in vaccination pace.
    ChangeInDoses,
    /// First-dose percentage for a single age band.
    ByAge(String),
}

impl RegionMetrics {
    /// The scalar this region plots under the given mode.
    pub fn current_value(&self, mode: &MapMode) -> f64 {
        match mode {
            MapMode::DosesAllTime => {
                (total(&self.first_doses) + total(&self.second_doses)) as f64
            }
            MapMode::DosesLastWeek => {
                (self.first_doses_this_week + self.second_doses_this_week) as f64
            }
            MapMode::OverallPercent => {
                dose_population_ratio(total(&self.first_doses), total(&self.population))
            }
            MapMode::ChangeInDoses => self.change_in_doses,
            MapMode::ByAge(band) => self.percent_first_doses.get(band).copied().unwrap_or(0.0),
        }
    }
}

impl WeeklyAggregate {
    /// The smallest value of the mode's metric across all regions.
    /// Percentage modes use a fixed 0 floor.
    pub fn lower_bound(&self, mode: &MapMode) -> f64 {
        match mode {
            MapMode::DosesAllTime => self.overall_doses.min,
            MapMode::DosesLastWeek => self.doses_last_week.min,
            MapMode::ChangeInDoses => self.change_in_doses.min,
            MapMode::OverallPercent | MapMode::ByAge(_) => 0.0,
        }
    }

    /// The largest value of the mode's metric across all regions.
    /// Percentage modes use a fixed 100 ceiling.
    pub fn upper_bound(&self, mode: &MapMode) -> f64 {
        match mode {
            MapMode::DosesAllTime => self.overall_doses.max,
            MapMode::DosesLastWeek => self.doses_last_week.max,
            MapMode::ChangeInDoses => self.change_in_doses.max,
            MapMode::OverallPercent | MapMode::ByAge(_) => 100.0,
        }
    }

    /// Scales a region's value into `[0, 1]` for the color ramp.
    ///
    /// Defined as 0 when the bounds span is not a positive finite number:
    /// a single region, all regions reporting the same value, or an
    /// aggregate with no regions at all would otherwise divide by zero.
    pub fn normalized_opacity(&self, region: &RegionMetrics, mode: &MapMode) -> f64 {
        let lower = self.lower_bound(mode);
        let span = self.upper_bound(mode) - lower;

        if span > 0.0 && span.is_finite() {
            (region.current_value(mode).abs() - lower) / span
        } else {
            0.0
        }
    }
}
