//! Summary statistics over the accumulated records

use chrono::Utc;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::data::parser::RaceRecord;
use crate::dataset::frame::odds_columns;
use crate::dataset::labels::BASE_COLUMNS;
use crate::error::DatasetError;

/// Number of sample rows reproduced in the statistics output
const SAMPLE_ROWS: usize = 3;

/// Build the statistics object for a record corpus.
pub fn dataset_stats(records: &[RaceRecord]) -> Value {
    let mut venues = HashSet::new();
    let mut dates = HashSet::new();
    let mut racers = HashSet::new();
    let mut venue_distribution: BTreeMap<&str, u64> = BTreeMap::new();

    for record in records {
        venues.insert(record.venue_name.as_str());
        dates.insert(record.date.as_str());
        racers.insert(record.racer_id);
        *venue_distribution
            .entry(record.venue_name.as_str())
            .or_insert(0) += 1;
    }

    let odds = odds_columns(records);
    let sample_data: Vec<Value> = records
        .iter()
        .take(SAMPLE_ROWS)
        .map(|record| sample_row(record, &odds))
        .collect();

    let mut columns: Vec<&str> = BASE_COLUMNS.to_vec();
    columns.extend(odds.iter().map(|key| key.as_str()));

    json!({
        "total_records": records.len(),
        "unique_venues": venues.len(),
        "unique_dates": dates.len(),
        "unique_racers": racers.len(),
        "venue_distribution": venue_distribution,
        "date_range": {
            "start": records.iter().map(|r| r.date.as_str()).min(),
            "end": records.iter().map(|r| r.date.as_str()).max(),
        },
        "columns": columns,
        "sample_data": sample_data,
        "generated_at": Utc::now().to_rfc3339(),
    })
}

/// Write pretty-printed statistics JSON.
pub fn write_stats(records: &[RaceRecord], path: &Path) -> Result<(), DatasetError> {
    let stats = dataset_stats(records);
    let text = serde_json::to_string_pretty(&stats)?;
    fs::write(path, text)?;
    Ok(())
}

/// One record as a plain key/value object.
///
/// Scalars keep their native JSON type; odds columns the race did not
/// report become explicit nulls so every sample row has the same keys.
fn sample_row(record: &RaceRecord, odds_columns: &[String]) -> Value {
    let mut row = Map::new();
    row.insert("date".to_string(), json!(record.date));
    row.insert("venue_code".to_string(), json!(record.venue_code));
    row.insert("venue_name".to_string(), json!(record.venue_name));
    row.insert("race_number".to_string(), json!(record.race_number));
    row.insert("frame_number".to_string(), json!(record.frame_number));
    row.insert("boat_number".to_string(), json!(record.boat_number));
    row.insert("racer_id".to_string(), json!(record.racer_id));
    row.insert("racer_name".to_string(), json!(record.racer_name));
    row.insert("age".to_string(), json!(record.age));
    row.insert("weight".to_string(), json!(record.weight));
    row.insert("exhibition_time".to_string(), json!(record.exhibition_time));
    row.insert("start_timing".to_string(), json!(record.start_timing));
    row.insert("race_time".to_string(), json!(record.race_time));
    row.insert("finish_position".to_string(), json!(record.finish_position));
    for key in odds_columns {
        let value = record
            .odds
            .get(key)
            .map(|odds| json!(odds))
            .unwrap_or(Value::Null);
        row.insert(key.clone(), value);
    }
    Value::Object(row)
}
