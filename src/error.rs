//! Error types for the dq_checker library.

use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, validating and saving datasets.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing or writing delimited data.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error reading or writing a spreadsheet workbook.
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// A rule referenced a column the dataset does not have.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A rule parameter could not be coerced to the required type.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Filename could not be decomposed.
    #[error("Error parsing file name '{filename}': {message}")]
    FilenameParse { filename: String, message: String },

    /// Filename carries no embedded date.
    #[error("No date information found in filename: {0}")]
    MissingDate(String),

    /// Invalid date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Input or output format not supported.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// A column was appended with the wrong number of values.
    #[error("Column '{column}' has {actual} values, dataset has {expected} rows")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Logging subscriber could not be installed.
    #[error("Logging setup error: {0}")]
    Logging(String),
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::SpreadsheetError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::SpreadsheetError(err.to_string())
    }
}
