//! Boatrace Dataset - race result dataset builder
//!
//! This library provides:
//! - Extraction of merged race records from fixed-layout SHIFT_JIS
//!   kekkaf result text files (entries, finish orders, payout odds)
//! - Month-sampled directory processing over a `<year><month>` tree
//! - Tabular assembly into CSV datasets (main, human-readable,
//!   machine-learning-ready) and summary-statistics JSON
//!
//! # Example
//!
//! ```no_run
//! use boatrace_dataset::data::ResultFileProcessor;
//! use boatrace_dataset::dataset::{self, LabelProfile};
//! use std::path::Path;
//!
//! let processor = ResultFileProcessor::new();
//! let mut records = Vec::new();
//! let processed = processor
//!     .process_directory(Path::new("kekkaf"), 2024, Some(12), &mut records)
//!     .unwrap();
//! println!("{} files, {} records", processed, records.len());
//!
//! let frame = dataset::records_to_frame(&records).unwrap();
//! let main = dataset::main_dataset(&frame).unwrap();
//! dataset::write_csv(&main, Path::new("main_dataset.csv"), LabelProfile::English).unwrap();
//! ```

pub mod data;
pub mod dataset;
pub mod error;

// Re-export commonly used types
pub use data::{RaceRecord, ResultFileProcessor};
pub use dataset::LabelProfile;
pub use error::DatasetError;
