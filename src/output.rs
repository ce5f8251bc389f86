//! Output formatting and persistence for derived aggregates.
//!
//! Supports pretty-printed JSON for the map frontend and a CSV export of
//! the per-region detail table.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::aggregate::WeeklyAggregate;
use crate::engine::bands::{dose_population_ratio, total};
use csv::WriterBuilder;
use std::fs::File;

/// Logs the aggregate as pretty-printed JSON.
pub fn print_json(aggregate: &WeeklyAggregate) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(aggregate)?);
    Ok(())
}

/// Writes the aggregate as pretty-printed JSON to a file.
pub fn write_aggregate_json(path: &str, aggregate: &WeeklyAggregate) -> Result<()> {
    debug!(path, regions = aggregate.regions.len(), "Writing aggregate JSON");
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, aggregate)?;
    Ok(())
}

/// One row of the per-region detail table.
#[derive(Serialize)]
struct RegionRow<'a> {
    id: &'a str,
    name: &'a str,
    first_doses: u64,
    second_doses: u64,
    first_doses_this_week: i64,
    second_doses_this_week: i64,
    percent_first_doses: f64,
    change_in_doses: f64,
}

/// Writes the per-region detail table as CSV, one row per region in
/// region-id order.
pub fn write_region_table(path: &str, aggregate: &WeeklyAggregate) -> Result<()> {
    debug!(path, regions = aggregate.regions.len(), "Writing region table");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    for (id, region) in &aggregate.regions {
        let first = total(&region.first_doses);
        writer.serialize(RegionRow {
            id,
            name: &region.name,
            first_doses: first,
            second_doses: total(&region.second_doses),
            first_doses_this_week: region.first_doses_this_week,
            second_doses_this_week: region.second_doses_this_week,
            percent_first_doses: dose_population_ratio(first, total(&region.population)),
            change_in_doses: region.change_in_doses,
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregate::aggregate;
    use crate::snapshot::parse_series;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_aggregate() -> WeeklyAggregate {
        let json = r#"[{
            "date": "2021-03-01",
            "statistics": {
                "R1": {
                    "name": "North",
                    "population": {"80+": 1000},
                    "firstDose": {"80+": 400},
                    "secondDose": {"80+": 100}
                },
                "R2": {
                    "name": "South",
                    "population": {"80+": 500},
                    "firstDose": {"80+": 50},
                    "secondDose": {}
                }
            }
        }]"#;
        aggregate(&parse_series(json).unwrap()).unwrap()
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&sample_aggregate()).unwrap();
    }

    #[test]
    fn test_write_aggregate_json_round_trips_regions() {
        let path = temp_path("vaccine_map_stats_test_aggregate.json");
        let _ = fs::remove_file(&path);

        write_aggregate_json(&path, &sample_aggregate()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["regions"]["R1"]["name"], "North");
        assert_eq!(value["last_updated"], "2021-03-01");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_region_table_has_header_and_one_row_per_region() {
        let path = temp_path("vaccine_map_stats_test_table.csv");
        let _ = fs::remove_file(&path);

        write_region_table(&path, &sample_aggregate()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,name,first_doses"));
        assert!(lines[1].starts_with("R1,North,400,100"));
        assert!(lines[2].starts_with("R2,South,50,0"));

        fs::remove_file(&path).unwrap();
    }
}
