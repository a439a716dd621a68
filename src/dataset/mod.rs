//! Dataset assembly: tabular conversion, ML features, exports, statistics

pub mod features;
pub mod frame;
pub mod labels;
pub mod stats;

// Re-export commonly used items
pub use features::ml_ready_frame;
pub use frame::{main_dataset, odds_columns, records_to_frame, write_csv, MAIN_DATASET_COLUMNS};
pub use labels::{LabelProfile, BASE_COLUMNS};
pub use stats::{dataset_stats, write_stats};
