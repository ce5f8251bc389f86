//! Sparse per-age-band count algebra.
//!
//! The set of age bands is open: it has changed between schema versions and
//! regions may report different bands week to week. Every operation here
//! iterates the keys actually present and treats a missing band as zero.

use std::collections::{BTreeMap, BTreeSet};

/// A sparse mapping from age-band label (e.g. `"80+"`) to a count.
/// A missing key means "not reported", not zero.
pub type AgeBucketed = BTreeMap<String, u64>;

/// Sums all present values; absent bands contribute 0.
pub fn total(bucket: &AgeBucketed) -> u64 {
    bucket.values().sum()
}

/// The union of band labels present in either input.
///
/// Union rather than intersection, so a band reported only with population
/// (or only with doses) still appears in band-wise combinations.
pub fn common_bands<'a>(a: &'a AgeBucketed, b: &'a AgeBucketed) -> BTreeSet<&'a str> {
    a.keys().chain(b.keys()).map(String::as_str).collect()
}

/// Combines two buckets band-wise over [`common_bands`], substituting 0 for
/// a band missing on either side.
pub fn combine_by_band<T, F>(a: &AgeBucketed, b: &AgeBucketed, f: F) -> BTreeMap<String, T>
where
    F: Fn(u64, u64) -> T,
{
    common_bands(a, b)
        .into_iter()
        .map(|band| {
            let left = a.get(band).copied().unwrap_or(0);
            let right = b.get(band).copied().unwrap_or(0);
            (band.to_string(), f(left, right))
        })
        .collect()
}

/// Percentage of a population that received a dose, capped at 100.
///
/// The divisor is `max(dose, population)`: dose counts occasionally exceed
/// the reported population for a band, and the larger divisor caps the
/// ratio at 100% instead of surfacing >100%. Returns 0.0 when both counts
/// are 0.
pub fn dose_population_ratio(dose: u64, population: u64) -> f64 {
    let divisor = dose.max(population);
    if divisor == 0 {
        0.0
    } else {
        dose as f64 / divisor as f64 * 100.0
    }
}
