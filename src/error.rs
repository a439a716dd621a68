use std::path::PathBuf;
use thiserror::Error;

/// Dataset pipeline errors
///
/// Individual files and lines are never fatal; these cover the few
/// conditions that abort a run (missing input root, export failures).
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("result directory not found or unreadable: {0:?}")]
    RootDir(PathBuf),

    #[error("dataframe operation failed: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to serialize statistics: {0}")]
    Stats(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_dir_display() {
        let err = DatasetError::RootDir(PathBuf::from("/no/such/dir"));
        assert!(err.to_string().contains("/no/such/dir"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DatasetError = io.into();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
