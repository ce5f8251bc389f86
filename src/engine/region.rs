//! Per-region metric derivation.
//!
//! Converts one region's raw multi-week data into the derived metrics the
//! map and detail table display. Absent earlier weeks are treated as
//! all-zero baselines, so a one-week series still produces full metrics.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::engine::bands::{AgeBucketed, combine_by_band, dose_population_ratio, total};
use crate::snapshot::RawRegionSnapshot;

/// Derived metrics for a single region in the current week.
///
/// Rebuilt wholesale on every aggregation; there is no identity carried
/// across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMetrics {
    pub name: String,

    // As reported for the current week.
    pub population: AgeBucketed,
    pub first_doses: AgeBucketed,
    pub second_doses: AgeBucketed,

    /// Per band: dose count as a capped percentage of population.
    pub percent_first_doses: BTreeMap<String, f64>,
    pub percent_second_doses: BTreeMap<String, f64>,

    /// Delta vs the prior snapshot. Negative when counts were revised down.
    pub first_doses_this_week: i64,
    pub second_doses_this_week: i64,

    /// Week-over-week change in vaccination pace, as a percentage of the
    /// prior week's cumulative total. Positive means accelerating.
    pub change_in_doses: f64,
}

fn combined_total(region: Option<&RawRegionSnapshot>) -> i64 {
    region.map_or(0, |r| (total(&r.first_dose) + total(&r.second_dose)) as i64)
}

/// Derives [`RegionMetrics`] from a region's current week plus up to two
/// prior weeks (most-recent-first).
pub fn derive_region(
    current: &RawRegionSnapshot,
    prior: Option<&RawRegionSnapshot>,
    two_weeks_ago: Option<&RawRegionSnapshot>,
) -> RegionMetrics {
    let first_doses_this_week = total(&current.first_dose) as i64
        - prior.map_or(0, |r| total(&r.first_dose) as i64);
    let second_doses_this_week = total(&current.second_dose) as i64
        - prior.map_or(0, |r| total(&r.second_dose) as i64);

    // Second derivative: how much this week's administered doses differ
    // from the prior week's, relative to the prior cumulative total.
    let total_now = combined_total(Some(current));
    let total_prior = combined_total(prior);
    let total_two_weeks = combined_total(two_weeks_ago);

    let delta_this_week = total_now - total_prior;
    let delta_prior_week = total_prior - total_two_weeks;

    let change_in_doses = if total_prior == 0 {
        0.0
    } else {
        (delta_this_week - delta_prior_week) as f64 / total_prior as f64 * 100.0
    };

    RegionMetrics {
        name: current.name.clone(),
        percent_first_doses: combine_by_band(
            &current.first_dose,
            &current.population,
            dose_population_ratio,
        ),
        percent_second_doses: combine_by_band(
            &current.second_dose,
            &current.population,
            dose_population_ratio,
        ),
        population: current.population.clone(),
        first_doses: current.first_dose.clone(),
        second_doses: current.second_dose.clone(),
        first_doses_this_week,
        second_doses_this_week,
        change_in_doses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(entries: &[(&str, u64)]) -> AgeBucketed {
        entries
            .iter()
            .map(|(band, count)| (band.to_string(), *count))
            .collect()
    }

    fn region(first: &[(&str, u64)], second: &[(&str, u64)], pop: &[(&str, u64)]) -> RawRegionSnapshot {
        RawRegionSnapshot {
            name: "R1".to_string(),
            population: bucket(pop),
            first_dose: bucket(first),
            second_dose: bucket(second),
        }
    }

    #[test]
    fn test_no_prior_weeks_delta_is_current_total() {
        let current = region(&[("80+", 400)], &[("80+", 100)], &[("80+", 1000)]);
        let metrics = derive_region(&current, None, None);

        assert_eq!(metrics.first_doses_this_week, 400);
        assert_eq!(metrics.second_doses_this_week, 100);
    }

    #[test]
    fn test_week_over_week_delta() {
        let current = region(&[("80+", 400)], &[("80+", 100)], &[("80+", 1000)]);
        let prior = region(&[("80+", 300)], &[("80+", 50)], &[("80+", 1000)]);

        let metrics = derive_region(&current, Some(&prior), None);
        assert_eq!(metrics.first_doses_this_week, 100);
        assert_eq!(metrics.second_doses_this_week, 50);
    }

    #[test]
    fn test_downward_revision_yields_negative_delta() {
        let current = region(&[("80+", 280)], &[], &[("80+", 1000)]);
        let prior = region(&[("80+", 300)], &[], &[("80+", 1000)]);

        let metrics = derive_region(&current, Some(&prior), None);
        assert_eq!(metrics.first_doses_this_week, -20);
    }

    #[test]
    fn test_steady_pace_has_zero_change() {
        // 100 combined doses administered in each of the two latest weeks.
        let current = region(&[("80+", 300)], &[], &[("80+", 1000)]);
        let prior = region(&[("80+", 200)], &[], &[("80+", 1000)]);
        let oldest = region(&[("80+", 100)], &[], &[("80+", 1000)]);

        let metrics = derive_region(&current, Some(&prior), Some(&oldest));
        assert_eq!(metrics.change_in_doses, 0.0);
    }

    #[test]
    fn test_identical_weeks_have_zero_change() {
        let week = region(&[("80+", 250)], &[("80+", 50)], &[("80+", 1000)]);
        let metrics = derive_region(&week, Some(&week), Some(&week));

        assert_eq!(metrics.change_in_doses, 0.0);
    }

    #[test]
    fn test_acceleration_is_positive_percent() {
        // Prior week administered 100, this week 150: +50 on a prior
        // cumulative of 200 is +25%.
        let current = region(&[("80+", 350)], &[], &[("80+", 1000)]);
        let prior = region(&[("80+", 200)], &[], &[("80+", 1000)]);
        let oldest = region(&[("80+", 100)], &[], &[("80+", 1000)]);

        let metrics = derive_region(&current, Some(&prior), Some(&oldest));
        assert_eq!(metrics.change_in_doses, 25.0);
    }

    #[test]
    fn test_zero_prior_total_guards_division() {
        let current = region(&[("80+", 400)], &[], &[("80+", 1000)]);
        let empty_prior = region(&[], &[], &[("80+", 1000)]);

        let metrics = derive_region(&current, Some(&empty_prior), None);
        assert_eq!(metrics.change_in_doses, 0.0);
    }

    #[test]
    fn test_percent_maps_cover_band_union() {
        // A dose-only band caps at 100, a population-only band reads 0.
        let current = region(&[("75-79", 30)], &[], &[("80+", 1000)]);
        let metrics = derive_region(&current, None, None);

        assert_eq!(metrics.percent_first_doses["75-79"], 100.0);
        assert_eq!(metrics.percent_first_doses["80+"], 0.0);
    }

    #[test]
    fn test_percent_per_band() {
        let current = region(
            &[("75-79", 250), ("80+", 400)],
            &[("80+", 100)],
            &[("75-79", 500), ("80+", 1000)],
        );
        let metrics = derive_region(&current, None, None);

        assert_eq!(metrics.percent_first_doses["75-79"], 50.0);
        assert_eq!(metrics.percent_first_doses["80+"], 40.0);
        assert_eq!(metrics.percent_second_doses["80+"], 10.0);
    }

    #[test]
    fn test_reported_counts_pass_through() {
        let current = region(&[("80+", 400)], &[("80+", 100)], &[("80+", 1000)]);
        let metrics = derive_region(&current, None, None);

        assert_eq!(metrics.first_doses, current.first_dose);
        assert_eq!(metrics.second_doses, current.second_dose);
        assert_eq!(metrics.population, current.population);
    }
}
