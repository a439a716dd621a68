//! File and directory processing for kekkaf result files
//!
//! One file is decoded fully, then the independent extraction passes run
//! over its lines and append merged records. Directory processing samples
//! the lexicographically first result file per month subdirectory.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::data::parser::{
    extract_date_from_filename, read_shift_jis_file, CompetitorLineExtractor, FileHeader,
    OddsExtractor, RaceRecord, RaceResultExtractor,
};
use crate::data::venue;
use crate::error::DatasetError;

/// Uppercase extension of raw result files
const RESULT_FILE_EXT: &str = "TXT";

/// Orchestrates the extraction passes over result files
pub struct ResultFileProcessor {
    race_results: RaceResultExtractor,
    odds: OddsExtractor,
    competitors: CompetitorLineExtractor,
}

impl Default for ResultFileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFileProcessor {
    pub fn new() -> Self {
        Self {
            race_results: RaceResultExtractor::new(),
            odds: OddsExtractor::new(),
            competitors: CompetitorLineExtractor::new(),
        }
    }

    /// Process one result file, appending merged records.
    ///
    /// Failures are reported through the returned flag so a batch run can
    /// continue with its remaining files.
    pub fn process_file(&self, path: &Path, records: &mut Vec<RaceRecord>) -> bool {
        let content = match read_shift_jis_file(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to read {:?}: {}", path, e);
                return false;
            }
        };
        let lines: Vec<&str> = content.lines().collect();

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
        let (venue_code, venue_name) = venue::detect_venue(&lines);
        let header = FileHeader {
            date: extract_date_from_filename(stem),
            venue_code: venue_code.to_string(),
            venue_name: venue_name.to_string(),
        };

        let race_results = self.race_results.extract(&lines);
        let odds = self.odds.extract(&lines);
        self.competitors
            .extract(&lines, &header, &race_results, &odds, records);
        true
    }

    /// Sample one result file per month subdirectory (`<root>/<year><MM>`).
    ///
    /// Months are visited ascending; a missing month contributes zero
    /// records without error. Returns the number of files processed.
    /// A missing or unreadable root directory is the only fatal condition.
    pub fn process_directory(
        &self,
        root: &Path,
        year: u16,
        max_files: Option<usize>,
        records: &mut Vec<RaceRecord>,
    ) -> Result<usize, DatasetError> {
        if !root.is_dir() {
            return Err(DatasetError::RootDir(root.to_path_buf()));
        }

        let mut processed = 0;
        for month in 1..=12u32 {
            if max_files.is_some_and(|cap| processed >= cap) {
                break;
            }

            let month_dir = root.join(format!("{}{:02}", year, month));
            let Some(first) = first_result_file(&month_dir) else {
                continue;
            };

            if self.process_file(&first, records) {
                processed += 1;
                info!(
                    "processed {:?}: {} records so far",
                    first.file_name().unwrap_or_default(),
                    records.len()
                );
            }
        }

        Ok(processed)
    }
}

/// Lexicographically first `*.TXT` file in a month directory
fn first_result_file(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == RESULT_FILE_EXT))
        .collect();
    files.sort();
    files.into_iter().next()
}
