//! Extraction of race records from raw kekkaf result files

pub mod parser;
pub mod processor;
pub mod venue;

// Re-export commonly used types
pub use parser::{
    extract_date_from_filename, read_shift_jis_file, CompetitorLineExtractor, FileHeader,
    FinishOrder, OddsExtractor, RaceRecord, RaceResultExtractor, UNKNOWN_DATE,
};
pub use processor::ResultFileProcessor;
