//! Tabular assembly of extracted race records
//!
//! Records become a polars DataFrame: the canonical base columns plus the
//! sorted union of every odds column seen across the corpus, null where a
//! race reported no odds for that key. CSV exports carry a UTF-8 BOM so
//! spreadsheet tools pick up the Japanese text correctly.

use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::data::parser::RaceRecord;
use crate::dataset::labels::LabelProfile;
use crate::error::DatasetError;

/// Main dataset column selection, fixed order
pub const MAIN_DATASET_COLUMNS: [&str; 11] = [
    "date",
    "venue_code",
    "venue_name",
    "race_number",
    "finish_position",
    "boat_number",
    "racer_id",
    "racer_name",
    "exhibition_time",
    "start_timing",
    "race_time",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Sorted union of odds columns across all records
pub fn odds_columns(records: &[RaceRecord]) -> Vec<String> {
    let mut keys = BTreeSet::new();
    for record in records {
        for key in record.odds.keys() {
            keys.insert(key.clone());
        }
    }
    keys.into_iter().collect()
}

/// Build the canonical frame from accumulated records.
pub fn records_to_frame(records: &[RaceRecord]) -> Result<DataFrame, DatasetError> {
    let mut df = df!(
        "date" => records.iter().map(|r| r.date.clone()).collect::<Vec<_>>(),
        "venue_code" => records.iter().map(|r| r.venue_code.clone()).collect::<Vec<_>>(),
        "venue_name" => records.iter().map(|r| r.venue_name.clone()).collect::<Vec<_>>(),
        "race_number" => records.iter().map(|r| r.race_number).collect::<Vec<_>>(),
        "frame_number" => records.iter().map(|r| r.frame_number as u32).collect::<Vec<_>>(),
        "boat_number" => records.iter().map(|r| r.boat_number as u32).collect::<Vec<_>>(),
        "racer_id" => records.iter().map(|r| r.racer_id).collect::<Vec<_>>(),
        "racer_name" => records.iter().map(|r| r.racer_name.clone()).collect::<Vec<_>>(),
        "age" => records.iter().map(|r| r.age as u32).collect::<Vec<_>>(),
        "weight" => records.iter().map(|r| r.weight as u32).collect::<Vec<_>>(),
        "exhibition_time" => records.iter().map(|r| r.exhibition_time).collect::<Vec<_>>(),
        "start_timing" => records.iter().map(|r| r.start_timing).collect::<Vec<_>>(),
        "race_time" => records.iter().map(|r| r.race_time.clone()).collect::<Vec<_>>(),
        "finish_position" => records.iter().map(|r| r.finish_position as u32).collect::<Vec<_>>(),
    )?;

    for key in odds_columns(records) {
        let values: Vec<Option<f64>> = records
            .iter()
            .map(|record| record.odds.get(&key).copied())
            .collect();
        df.with_column(Series::new(key.as_str(), values))?;
    }

    Ok(df)
}

/// Fixed 11-column main dataset view of the canonical frame
pub fn main_dataset(df: &DataFrame) -> Result<DataFrame, DatasetError> {
    Ok(df.select(MAIN_DATASET_COLUMNS)?)
}

/// Write a frame as CSV, UTF-8 with byte-order mark, renaming columns
/// through the given label profile.
pub fn write_csv(df: &DataFrame, path: &Path, profile: LabelProfile) -> Result<(), DatasetError> {
    let mut out = df.clone();
    let names: Vec<String> = out
        .get_column_names()
        .into_iter()
        .map(|name| profile.rename(name))
        .collect();
    out.set_column_names(&names)?;

    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(race_number: u32, boat_number: u8, odds: &[(&str, f64)]) -> RaceRecord {
        RaceRecord {
            date: "2024-01-15".to_string(),
            venue_code: "24".to_string(),
            venue_name: "大村".to_string(),
            race_number,
            frame_number: boat_number,
            boat_number,
            racer_id: 3500 + boat_number as u32,
            racer_name: format!("RACER{}", boat_number),
            age: 30,
            weight: 52,
            exhibition_time: 6.80,
            finish_code: 0,
            start_timing: 0.10,
            race_time: "1.49.7".to_string(),
            finish_position: 0,
            odds: odds
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_odds_columns_union_sorted() {
        let records = vec![
            record(1, 1, &[("odds_single_1", 2.5)]),
            record(2, 1, &[("odds_exacta_1_2", 4.0), ("odds_single_1", 3.1)]),
        ];
        assert_eq!(
            odds_columns(&records),
            vec!["odds_exacta_1_2".to_string(), "odds_single_1".to_string()]
        );
    }

    #[test]
    fn test_records_to_frame_shape() {
        let records = vec![
            record(1, 1, &[("odds_single_1", 2.5)]),
            record(1, 2, &[]),
        ];
        let df = records_to_frame(&records).unwrap();

        assert_eq!(df.height(), 2);
        // 14 base columns plus the single odds column.
        assert_eq!(df.width(), 15);
        // Record without that race's odds gets a null, not a zero.
        let odds = df.column("odds_single_1").unwrap().f64().unwrap();
        assert_eq!(odds.get(0), Some(2.5));
        assert_eq!(odds.get(1), None);
    }

    #[test]
    fn test_main_dataset_column_order() {
        let records = vec![record(1, 1, &[("odds_single_1", 2.5)])];
        let df = records_to_frame(&records).unwrap();
        let main = main_dataset(&df).unwrap();

        assert_eq!(main.get_column_names(), MAIN_DATASET_COLUMNS.to_vec());
    }

    #[test]
    fn test_write_csv_has_bom_and_headers() {
        let records = vec![record(1, 1, &[])];
        let df = records_to_frame(&records).unwrap();
        let main = main_dataset(&df).unwrap();

        let path = std::env::temp_dir().join("boatrace_dataset_bom_test.csv");
        write_csv(&main, &path, LabelProfile::English).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.starts_with("date,venue_code,venue_name,race_number,finish_position"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_write_csv_japanese_labels() {
        let records = vec![record(1, 1, &[("odds_single_1", 2.5)])];
        let df = records_to_frame(&records).unwrap();

        let path = std::env::temp_dir().join("boatrace_dataset_ja_test.csv");
        write_csv(&df, &path, LabelProfile::Japanese).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("日付,レース場コード,レース場名"));
        assert!(header.contains("オッズ_single_1"));

        let _ = std::fs::remove_file(&path);
    }
}
