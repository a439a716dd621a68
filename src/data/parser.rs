//! Raw extractors for boatrace kekkaf result text files
//!
//! Parses fixed-layout SHIFT_JIS-encoded result files, producing one merged
//! record per boat per race: competitor attributes from the fixed-width
//! entry lines, the finish position reconciled against the per-race result
//! line, and the race's payout odds folded in.
//!
//! # Example
//!
//! ```no_run
//! use boatrace_dataset::data::ResultFileProcessor;
//! use std::path::Path;
//!
//! let processor = ResultFileProcessor::new();
//! let mut records = Vec::new();
//! processor.process_file(Path::new("K240115.TXT"), &mut records);
//! println!("{} records", records.len());
//! ```

use encoding_rs::SHIFT_JIS;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::Path;

/// First letter of a kekkaf result filename
pub const FILENAME_MARKER: char = 'K';

/// Sentinel date for filenames that do not encode one
pub const UNKNOWN_DATE: &str = "unknown";

/// Minimum untrimmed line length for a competitor entry line
const MIN_COMPETITOR_LINE_CHARS: usize = 40;

/// Prefix applied to odds keys merged into a record
const ODDS_KEY_PREFIX: &str = "odds_";

/// First/second/third placed boat numbers for one race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishOrder {
    pub first: u8,
    pub second: u8,
    pub third: u8,
}

/// Per-file header data shared by every record of that file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHeader {
    pub date: String,
    pub venue_code: String,
    pub venue_name: String,
}

/// One row per boat per race, fully merged
///
/// `finish_code` is the single-digit code captured from the entry line
/// itself; it is carried but excluded from output column sets, the
/// authoritative `finish_position` comes from the race result line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceRecord {
    pub date: String,
    pub venue_code: String,
    pub venue_name: String,
    pub race_number: u32,
    pub frame_number: u8,
    pub boat_number: u8,
    pub racer_id: u32,
    pub racer_name: String,
    pub age: u8,
    pub weight: u16,
    pub exhibition_time: f64,
    pub finish_code: u8,
    pub start_timing: f64,
    pub race_time: String,
    /// 0 = unknown, 1/2/3 = podium, 4 = also-ran in a race with a known result
    pub finish_position: u8,
    /// Bet-type key (e.g. "odds_exacta_3_1") to decimal odds
    pub odds: BTreeMap<String, f64>,
}

/// Read a result file, decoding SHIFT_JIS with replacement.
///
/// Undecodable byte sequences are replaced rather than failing the file.
pub fn read_shift_jis_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let (decoded, _, _) = SHIFT_JIS.decode(&bytes);
    Ok(decoded.into_owned())
}

/// Derive an ISO date string from a result filename stem.
///
/// `K<yy><mm><dd>` encodes a date offset from 2000. Anything shorter than
/// 7 characters, without the marker letter, or with non-numeric date
/// characters yields [`UNKNOWN_DATE`]. Month/day ranges are not validated;
/// a malformed encoding propagates into a malformed date string.
pub fn extract_date_from_filename(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < 7 || !chars[0].eq_ignore_ascii_case(&FILENAME_MARKER) {
        return UNKNOWN_DATE.to_string();
    }

    let field = |range: std::ops::Range<usize>| -> Option<u32> {
        chars[range].iter().collect::<String>().parse().ok()
    };

    match (field(1..3), field(3..5), field(5..7)) {
        (Some(year), Some(month), Some(day)) => {
            format!("{:04}-{:02}-{:02}", 2000 + year, month, day)
        }
        _ => UNKNOWN_DATE.to_string(),
    }
}

/// Finds "<race>R <d>-<d>-<d> <count>" finish-order lines
pub struct RaceResultExtractor {
    result_pattern: Regex,
}

impl Default for RaceResultExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceResultExtractor {
    pub fn new() -> Self {
        Self {
            result_pattern: Regex::new(r"(\d+)R\s+([1-6])-([1-6])-([1-6])\s+\d+").unwrap(),
        }
    }

    /// Scan every line for finish-order entries, keyed by race number.
    ///
    /// The last matching line wins for a race number; well-formed files
    /// carry exactly one per race but uniqueness is not enforced.
    pub fn extract(&self, lines: &[&str]) -> HashMap<u32, FinishOrder> {
        let mut results = HashMap::new();
        for line in lines {
            if let Some(caps) = self.result_pattern.captures(line.trim()) {
                if let (Ok(race), Ok(first), Ok(second), Ok(third)) = (
                    caps[1].parse::<u32>(),
                    caps[2].parse::<u8>(),
                    caps[3].parse::<u8>(),
                    caps[4].parse::<u8>(),
                ) {
                    results.insert(
                        race,
                        FinishOrder {
                            first,
                            second,
                            third,
                        },
                    );
                }
            }
        }
        results
    }
}

/// Payout odds extractor
///
/// Folds over the lines threading a current-race pointer: a loose
/// "<number>R" marker (no result suffix required) opens a race context,
/// and bet lines inside that context populate the race's odds entry.
pub struct OddsExtractor {
    race_pattern: Regex,
    single_pattern: Regex,
    place_pattern: Regex,
    exacta_pattern: Regex,
    quinella_pattern: Regex,
    wide_pattern: Regex,
    trifecta_pattern: Regex,
    trio_pattern: Regex,
}

impl Default for OddsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl OddsExtractor {
    pub fn new() -> Self {
        Self {
            race_pattern: Regex::new(r"(\d+)R").unwrap(),
            single_pattern: Regex::new(r"単勝\s*(\d+)\s*(\d+\.\d+)").unwrap(),
            place_pattern: Regex::new(r"複勝\s*(\d+)\s*(\d+\.\d+)").unwrap(),
            exacta_pattern: Regex::new(r"2連単\s*(\d+)-(\d+)\s*(\d+\.\d+)").unwrap(),
            quinella_pattern: Regex::new(r"2連複\s*(\d+)-(\d+)\s*(\d+\.\d+)").unwrap(),
            wide_pattern: Regex::new(r"拡連複\s*(\d+)-(\d+)\s*(\d+\.\d+)").unwrap(),
            trifecta_pattern: Regex::new(r"3連複\s*(\d+)-(\d+)-(\d+)\s*(\d+\.\d+)").unwrap(),
            trio_pattern: Regex::new(r"3連単\s*(\d+)-(\d+)-(\d+)\s*(\d+\.\d+)").unwrap(),
        }
    }

    /// Build the race number -> {bet key -> odds} table for one file.
    pub fn extract(&self, lines: &[&str]) -> HashMap<u32, BTreeMap<String, f64>> {
        let mut odds: HashMap<u32, BTreeMap<String, f64>> = HashMap::new();
        let mut current_race: Option<u32> = None;

        for line in lines {
            let line = line.trim();

            // A marker line opens (and resets) a race context and never
            // doubles as a bet line.
            if let Some(caps) = self.race_pattern.captures(line) {
                if let Ok(race) = caps[1].parse::<u32>() {
                    odds.insert(race, BTreeMap::new());
                    current_race = Some(race);
                }
                continue;
            }

            // Bet data before any marker cannot be attributed to a race.
            let Some(race) = current_race else { continue };
            let entry = odds.entry(race).or_default();
            self.collect_bet_line(line, entry);
        }

        odds
    }

    /// Test one bet line against every category pattern.
    ///
    /// Categories are independent; a line may contribute to several.
    fn collect_bet_line(&self, line: &str, entry: &mut BTreeMap<String, f64>) {
        let singles = [
            ("single", &self.single_pattern),
            ("place", &self.place_pattern),
        ];
        for (category, pattern) in singles {
            if let Some(caps) = pattern.captures(line) {
                if let (Ok(boat), Ok(value)) = (caps[1].parse::<u8>(), caps[2].parse::<f64>()) {
                    entry.insert(format!("{}_{}", category, boat), value);
                }
            }
        }

        let pairs = [
            ("exacta", &self.exacta_pattern),
            ("quinella", &self.quinella_pattern),
            ("wide", &self.wide_pattern),
        ];
        for (category, pattern) in pairs {
            if let Some(caps) = pattern.captures(line) {
                if let (Ok(a), Ok(b), Ok(value)) = (
                    caps[1].parse::<u8>(),
                    caps[2].parse::<u8>(),
                    caps[3].parse::<f64>(),
                ) {
                    entry.insert(format!("{}_{}_{}", category, a, b), value);
                }
            }
        }

        let triples = [
            ("trifecta", &self.trifecta_pattern),
            ("trio", &self.trio_pattern),
        ];
        for (category, pattern) in triples {
            if let Some(caps) = pattern.captures(line) {
                if let (Ok(a), Ok(b), Ok(c), Ok(value)) = (
                    caps[1].parse::<u8>(),
                    caps[2].parse::<u8>(),
                    caps[3].parse::<u8>(),
                    caps[4].parse::<f64>(),
                ) {
                    entry.insert(format!("{}_{}_{}_{}", category, a, b, c), value);
                }
            }
        }
    }
}

/// Typed fields pulled from one fixed-width competitor line
struct CompetitorFields {
    frame_number: u8,
    boat_number: u8,
    racer_id: u32,
    racer_name: String,
    age: u8,
    weight: u16,
    exhibition_time: f64,
    finish_code: u8,
    start_timing: f64,
    race_time: String,
}

/// Competitor entry-line extractor
///
/// Keeps its own current-race pointer, re-detected with the same loose
/// marker pattern the odds pass uses; the two passes scan independently.
pub struct CompetitorLineExtractor {
    race_pattern: Regex,
    competitor_pattern: Regex,
}

impl Default for CompetitorLineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CompetitorLineExtractor {
    pub fn new() -> Self {
        Self {
            race_pattern: Regex::new(r"(\d+)R").unwrap(),
            competitor_pattern: Regex::new(
                r"^\s*(\d{2})\s+(\d)\s+(\d{4})\s+(.{8,12})\s+(\d{2})\s+(\d{1,3})\s+(\d\.\d{2})\s+(\d)\s+([\d\.+-]+)\s+([\d\.:]*)",
            )
            .unwrap(),
        }
    }

    /// Scan every line, appending one merged record per competitor entry.
    ///
    /// Lines shorter than the fixed-width minimum are never pattern-matched.
    /// A line that matches but fails a field conversion is skipped whole;
    /// nothing on this path is fatal to the file.
    pub fn extract(
        &self,
        lines: &[&str],
        header: &FileHeader,
        race_results: &HashMap<u32, FinishOrder>,
        odds: &HashMap<u32, BTreeMap<String, f64>>,
        records: &mut Vec<RaceRecord>,
    ) {
        let mut current_race: Option<u32> = None;

        for raw in lines {
            if let Some(caps) = self.race_pattern.captures(raw.trim()) {
                if let Ok(race) = caps[1].parse::<u32>() {
                    current_race = Some(race);
                }
            }

            let Some(race) = current_race else { continue };
            if raw.chars().count() < MIN_COMPETITOR_LINE_CHARS {
                continue;
            }
            let Some(fields) = self.parse_competitor_line(raw) else {
                continue;
            };

            let mut record = RaceRecord {
                date: header.date.clone(),
                venue_code: header.venue_code.clone(),
                venue_name: header.venue_name.clone(),
                race_number: race,
                frame_number: fields.frame_number,
                boat_number: fields.boat_number,
                racer_id: fields.racer_id,
                racer_name: fields.racer_name,
                age: fields.age,
                weight: fields.weight,
                exhibition_time: fields.exhibition_time,
                finish_code: fields.finish_code,
                start_timing: fields.start_timing,
                race_time: fields.race_time,
                finish_position: finish_position(race_results.get(&race), fields.boat_number),
                odds: BTreeMap::new(),
            };

            if let Some(race_odds) = odds.get(&race) {
                for (key, value) in race_odds {
                    record.odds.insert(format!("{}{}", ODDS_KEY_PREFIX, key), *value);
                }
            }

            records.push(record);
        }
    }

    fn parse_competitor_line(&self, line: &str) -> Option<CompetitorFields> {
        let caps = self.competitor_pattern.captures(line)?;

        let start_timing = match &caps[9] {
            "." => 0.0,
            timing => timing.parse().ok()?,
        };
        let race_time = match &caps[10] {
            "" | "." => String::new(),
            time => time.to_string(),
        };

        Some(CompetitorFields {
            frame_number: caps[1].parse().ok()?,
            boat_number: caps[2].parse().ok()?,
            racer_id: caps[3].parse().ok()?,
            racer_name: caps[4].trim().to_string(),
            age: caps[5].parse().ok()?,
            weight: caps[6].parse().ok()?,
            exhibition_time: caps[7].parse().ok()?,
            finish_code: caps[8].parse().ok()?,
            start_timing,
            race_time,
        })
    }
}

/// 1/2/3 for podium boats, 4 when the race has a known order, 0 otherwise
fn finish_position(order: Option<&FinishOrder>, boat_number: u8) -> u8 {
    match order {
        Some(order) if order.first == boat_number => 1,
        Some(order) if order.second == boat_number => 2,
        Some(order) if order.third == boat_number => 3,
        Some(_) => 4,
        None => 0,
    }
}
