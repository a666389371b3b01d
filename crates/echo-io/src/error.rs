//! I/O error types for echo-io.

use std::path::PathBuf;

use echo_knn::KnnError;

/// Errors from file I/O, CSV parsing, data preparation and report serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the file extension has no known delimiter.
    #[error("unsupported file format \"{extension}\" for {path} (expected csv, txt or tsv)")]
    UnsupportedFormat {
        /// Path to the input file.
        path: PathBuf,
        /// The extension found, empty if none.
        extension: String,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the file contains a header but zero data rows.
    #[error("empty dataset (no data rows) in {path}")]
    EmptyDataset {
        /// Path to the input file.
        path: PathBuf,
    },

    /// Returned when a required column is absent from the header.
    #[error("column \"{column}\" not found in {path}")]
    MissingColumn {
        /// Path to the input file.
        path: PathBuf,
        /// The column name that was looked up.
        column: String,
    },

    /// Returned when the header has no columns besides the id and label columns.
    #[error("no feature columns in {path}")]
    NoFeatureColumns {
        /// Path to the input file.
        path: PathBuf,
    },

    /// Returned when a data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the input file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a label cell is not an integer.
    #[error("invalid label in {path}: row {row_index}, raw value \"{raw}\"")]
    InvalidLabel {
        /// Path to the input file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when a column has no present values to impute from.
    #[error("column \"{column}\" has no values to impute from")]
    AllMissing {
        /// Name of the fully missing column.
        column: String,
    },

    /// Returned when removing incomplete rows leaves nothing.
    #[error("every row has at least one missing value")]
    NoCompleteRows,

    /// Returned when the observed labels match no known two-class domain.
    #[error("cannot map labels {labels:?} to {{0, 1}}: expected {{0, 1}} or {{2, 4}}")]
    UnknownLabelDomain {
        /// Distinct labels observed, ascending.
        labels: Vec<i64>,
    },

    /// Returned when a label falls outside the mapping's domain.
    #[error("label {label} is outside the mapping domain")]
    UnknownLabel {
        /// The unmapped label.
        label: i64,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a report cannot be serialized.
    #[error("cannot serialize report for {path}")]
    Serialize {
        /// Path the report was destined for.
        path: PathBuf,
        /// Underlying serde_json error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Wraps a feature-table validation error.
    #[error("invalid feature table: {0}")]
    Table(#[from] KnnError),
}
