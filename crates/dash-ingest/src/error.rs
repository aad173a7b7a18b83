//! Error types for loading the base table.

use std::path::PathBuf;

use dash_model::ModelError;
use thiserror::Error;

/// Errors that can occur while loading the base table. All of them are fatal:
/// a dashboard cannot start without its table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A header cell is blank.
    #[error("empty column name at position {position} in {path}")]
    EmptyColumnName { path: PathBuf, position: usize },

    /// Two header cells share a name.
    #[error("duplicate column '{column}' in {path}")]
    DuplicateColumn { path: PathBuf, column: String },

    /// A data row does not have the header's column count.
    #[error("line {line} of {path} has {found} fields, expected {expected}")]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The file has a header but no data rows.
    #[error("CSV file has no data rows: {path}")]
    EmptyTable { path: PathBuf },

    /// A column named in the load options is not in the header.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// The id column is blank on some row.
    #[error("line {line} of {path} has an empty id in column '{column}'")]
    MissingId {
        path: PathBuf,
        line: u64,
        column: String,
    },

    /// Two rows share the same id.
    #[error("duplicate row id '{id}' at line {line} of {path}")]
    DuplicateId { path: PathBuf, line: u64, id: String },

    /// A category column holds a value outside its label set.
    #[error("line {line} of {path}: '{value}' is not a valid value for category column '{column}'")]
    InvalidCategory {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    /// The loaded rows do not form a valid table.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("/data/politics.csv"),
        };
        assert_eq!(err.to_string(), "CSV file not found: /data/politics.csv");

        let err = LoadError::RaggedRow {
            path: PathBuf::from("t.csv"),
            line: 3,
            expected: 2,
            found: 3,
        };
        assert_eq!(err.to_string(), "line 3 of t.csv has 3 fields, expected 2");
    }
}
