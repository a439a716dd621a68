//! Machine-learning feature derivation over the canonical frame
//!
//! Adds date-part columns, categorical encodings for the venue columns,
//! and z-score normalized companions for the numeric and odds columns.
//! Malformed dates (a filename that did not encode one, or an invalid
//! month/day combination) yield nulls rather than failing the frame.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::error::DatasetError;

/// Numeric columns that get a `_normalized` companion
const NORMALIZED_COLUMNS: [&str; 4] = ["age", "weight", "exhibition_time", "start_timing"];

/// Prefix identifying merged odds columns
const ODDS_COLUMN_PREFIX: &str = "odds_";

/// Derive the ML-ready frame from the canonical one.
pub fn ml_ready_frame(df: &DataFrame) -> Result<DataFrame, DatasetError> {
    let mut out = df.clone();

    append_date_parts(&mut out)?;
    append_categorical_codes(&mut out, "venue_code")?;
    append_categorical_codes(&mut out, "venue_name")?;

    let odds_names: Vec<String> = out
        .get_column_names()
        .into_iter()
        .filter(|name| name.starts_with(ODDS_COLUMN_PREFIX))
        .map(|name| name.to_string())
        .collect();

    let mut exprs: Vec<Expr> = Vec::new();
    for name in NORMALIZED_COLUMNS {
        exprs.push(normalized_expr(name));
    }
    for name in &odds_names {
        exprs.push(normalized_expr(name));
    }

    let out = out.lazy().with_columns(exprs).collect()?;
    Ok(out)
}

/// Sample-statistics z-score: (x - mean) / std with ddof 1
fn normalized_expr(name: &str) -> Expr {
    ((col(name) - col(name).mean()) / col(name).std(1))
        .alias(&format!("{}_normalized", name))
}

fn append_date_parts(df: &mut DataFrame) -> Result<(), DatasetError> {
    let (years, months, days, weekdays) = {
        let dates = df.column("date")?.str()?;
        let mut years: Vec<Option<i32>> = Vec::with_capacity(dates.len());
        let mut months: Vec<Option<i32>> = Vec::with_capacity(dates.len());
        let mut days: Vec<Option<i32>> = Vec::with_capacity(dates.len());
        let mut weekdays: Vec<Option<i32>> = Vec::with_capacity(dates.len());

        for value in dates.into_iter() {
            let parsed = value.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
            years.push(parsed.map(|d| d.year()));
            months.push(parsed.map(|d| d.month() as i32));
            days.push(parsed.map(|d| d.day() as i32));
            // Monday = 0, matching the usual dataframe convention.
            weekdays.push(parsed.map(|d| d.weekday().num_days_from_monday() as i32));
        }
        (years, months, days, weekdays)
    };

    df.with_column(Series::new("year", years))?;
    df.with_column(Series::new("month", months))?;
    df.with_column(Series::new("day", days))?;
    df.with_column(Series::new("weekday", weekdays))?;
    Ok(())
}

/// Encode a string column as its index within the sorted unique values.
fn append_categorical_codes(df: &mut DataFrame, name: &str) -> Result<(), DatasetError> {
    let codes = {
        let values = df.column(name)?.str()?;
        let mut unique: Vec<&str> = values.into_iter().flatten().collect();
        unique.sort_unstable();
        unique.dedup();

        values
            .into_iter()
            .map(|value| {
                value
                    .and_then(|s| unique.binary_search(&s).ok())
                    .map(|idx| idx as i32)
            })
            .collect::<Vec<Option<i32>>>()
    };

    df.with_column(Series::new(&format!("{}_encoded", name), codes))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parser::RaceRecord;
    use crate::dataset::frame::records_to_frame;
    use std::collections::BTreeMap;

    fn record(date: &str, venue_code: &str, venue_name: &str, age: u8) -> RaceRecord {
        RaceRecord {
            date: date.to_string(),
            venue_code: venue_code.to_string(),
            venue_name: venue_name.to_string(),
            race_number: 1,
            frame_number: 1,
            boat_number: 1,
            racer_id: 3501,
            racer_name: "RACER".to_string(),
            age,
            weight: 52,
            exhibition_time: 6.80,
            finish_code: 0,
            start_timing: 0.10,
            race_time: String::new(),
            finish_position: 0,
            odds: BTreeMap::from([("odds_single_1".to_string(), 2.5)]),
        }
    }

    #[test]
    fn test_date_parts() {
        let records = vec![record("2024-01-15", "24", "大村", 28)];
        let df = records_to_frame(&records).unwrap();
        let ml = ml_ready_frame(&df).unwrap();

        assert_eq!(ml.column("year").unwrap().i32().unwrap().get(0), Some(2024));
        assert_eq!(ml.column("month").unwrap().i32().unwrap().get(0), Some(1));
        assert_eq!(ml.column("day").unwrap().i32().unwrap().get(0), Some(15));
        // 2024-01-15 was a Monday.
        assert_eq!(ml.column("weekday").unwrap().i32().unwrap().get(0), Some(0));
    }

    #[test]
    fn test_malformed_dates_yield_nulls() {
        let records = vec![
            record("unknown", "24", "大村", 28),
            record("2024-13-05", "24", "大村", 30),
        ];
        let df = records_to_frame(&records).unwrap();
        let ml = ml_ready_frame(&df).unwrap();

        let years = ml.column("year").unwrap().i32().unwrap();
        assert_eq!(years.get(0), None);
        assert_eq!(years.get(1), None);
        assert_eq!(years.null_count(), 2);
    }

    #[test]
    fn test_categorical_codes_sorted_unique() {
        let records = vec![
            record("2024-01-15", "24", "大村", 28),
            record("2024-02-10", "01", "桐生", 30),
            record("2024-03-05", "24", "大村", 35),
        ];
        let df = records_to_frame(&records).unwrap();
        let ml = ml_ready_frame(&df).unwrap();

        let codes = ml.column("venue_code_encoded").unwrap().i32().unwrap();
        // "01" sorts before "24".
        assert_eq!(codes.get(0), Some(1));
        assert_eq!(codes.get(1), Some(0));
        assert_eq!(codes.get(2), Some(1));
    }

    #[test]
    fn test_normalized_columns_present() {
        let records = vec![
            record("2024-01-15", "24", "大村", 28),
            record("2024-02-10", "24", "大村", 32),
        ];
        let df = records_to_frame(&records).unwrap();
        let ml = ml_ready_frame(&df).unwrap();

        let ages = ml.column("age_normalized").unwrap().f64().unwrap();
        // Sample std (ddof=1) of {28, 32} is sqrt(8), so z-scores are ±1/sqrt(2).
        assert!((ages.get(0).unwrap() + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!((ages.get(1).unwrap() - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);

        assert!(ml.column("odds_single_1_normalized").is_ok());
    }
}
