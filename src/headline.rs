//! National headline statistics derived from the regional series.
//!
//! The cards shown above the map summarize the country as a whole: doses
//! administered this week, the change against the prior week, overall
//! uptake, and a rough projection of when the priority cohorts would be
//! covered at the current pace. Computation only; rendering is external.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::engine::bands::total;
use crate::snapshot::SnapshotSeries;

/// People in the first four priority cohorts (care homes through over-70s).
pub const FIRST_FOUR_COHORTS: u64 = 14_600_000;
/// People in the first six priority cohorts.
pub const FIRST_SIX_COHORTS: u64 = 31_800_000;
/// Rough national population used for uptake percentages.
pub const DEFAULT_POPULATION: u64 = 68_000_000;

/// National dose counts for one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DoseTotal {
    pub first_dose: i64,
    pub second_dose: i64,
}

/// One week's national totals: cumulative counts plus the amounts
/// administered during that week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeekTotal {
    pub date: NaiveDate,
    pub this_week: DoseTotal,
    pub total: DoseTotal,
}

/// Sums every region of every snapshot into a national series, newest
/// first. `this_week` is the delta against the next-older snapshot, with a
/// zero baseline when none exists.
pub fn national_totals(series: &SnapshotSeries) -> Vec<WeekTotal> {
    let cumulative: Vec<DoseTotal> = series
        .iter()
        .map(|snapshot| {
            let mut sum = DoseTotal::default();
            for region in snapshot.statistics.values() {
                sum.first_dose += total(&region.first_dose) as i64;
                sum.second_dose += total(&region.second_dose) as i64;
            }
            sum
        })
        .collect();

    series
        .iter()
        .enumerate()
        .map(|(i, snapshot)| {
            let current = cumulative[i];
            let previous = cumulative.get(i + 1).copied().unwrap_or_default();
            WeekTotal {
                date: snapshot.date,
                this_week: DoseTotal {
                    first_dose: current.first_dose - previous.first_dose,
                    second_dose: current.second_dose - previous.second_dose,
                },
                total: current,
            }
        })
        .collect()
}

/// Direction of a week-over-week change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
}

/// Absolute and percentage change in first doses administered, against the
/// prior week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklyDifference {
    pub value: i64,
    pub percent: i64,
    pub direction: Direction,
}

/// Compares the latest week's administered first doses with the prior
/// week's. Missing weeks count as zero; a zero prior week reports 0%.
pub fn weekly_difference(totals: &[WeekTotal]) -> WeeklyDifference {
    let latest = totals.first().map_or(0, |w| w.this_week.first_dose);
    let previous = totals.get(1).map_or(0, |w| w.this_week.first_dose);
    let difference = latest - previous;

    let percent = if previous == 0 {
        0
    } else {
        (difference as f64 / previous as f64 * 100.0).round().abs() as i64
    };

    WeeklyDifference {
        value: difference.abs(),
        percent,
        direction: if difference > 0 {
            Direction::Up
        } else {
            Direction::Down
        },
    }
}

/// Overall first-dose uptake against a national population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Uptake {
    pub cumulative: i64,
    pub percent: f64,
    /// "1 in N people have had a dose"; 0 when nobody has.
    pub one_in: i64,
}

pub fn uptake(totals: &[WeekTotal], population: u64) -> Uptake {
    let cumulative = totals.first().map_or(0, |w| w.total.first_dose);
    let percent = if population == 0 {
        0.0
    } else {
        cumulative as f64 / population as f64 * 100.0
    };
    let one_in = if percent > 0.0 {
        (1.0 / (percent / 100.0)).round() as i64
    } else {
        0
    };

    Uptake {
        cumulative,
        percent,
        one_in,
    }
}

/// Projected dates by which each priority cohort would be fully covered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    pub first_four: NaiveDate,
    pub first_six: NaiveDate,
}

/// Extrapolates from the latest week's first-dose pace, assuming the weekly
/// amount is administered evenly across seven days. Returns `None` when the
/// pace is zero or negative.
pub fn project_completion(latest: &WeekTotal, today: NaiveDate) -> Option<Projection> {
    if latest.this_week.first_dose <= 0 {
        return None;
    }

    let per_day = latest.this_week.first_dose as f64 / 7.0;
    let days_until = |target: u64| {
        let remaining = target as i64 - latest.total.first_dose;
        (remaining as f64 / per_day).ceil().max(0.0) as u64
    };

    Some(Projection {
        first_four: today.checked_add_days(Days::new(days_until(FIRST_FOUR_COHORTS)))?,
        first_six: today.checked_add_days(Days::new(days_until(FIRST_SIX_COHORTS)))?,
    })
}
