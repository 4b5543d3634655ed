//! I/O error types for isoforest-io.

use std::path::PathBuf;

/// Errors from record reading, directory walking, and result writing.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when an input path does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when walking an input directory fails part-way.
    #[error("cannot walk directory {path}")]
    DirectoryWalk {
        /// Root of the walk.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },

    /// Returned when the record parser encounters a malformed record.
    #[error("parse error in {path} at byte offset {offset}")]
    RecordParse {
        /// Path to the record file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when a record has too few fields for a configured column.
    #[error("{path} line {line}: column {column} (\"{name}\") missing, record has {got} fields")]
    MissingColumn {
        /// Path to the record file.
        path: PathBuf,
        /// One-based line number of the record.
        line: u64,
        /// Zero-based field index that was requested.
        column: usize,
        /// Feature name mapped to that column.
        name: String,
        /// Number of fields actually present.
        got: usize,
    },

    /// Returned when a field is not an unsigned integer.
    #[error("{path} line {line}: column {column} has invalid value \"{raw}\", expected an unsigned integer")]
    InvalidValue {
        /// Path to the record file.
        path: PathBuf,
        /// One-based line number of the record.
        line: u64,
        /// Zero-based field index.
        column: usize,
        /// The raw field text.
        raw: String,
    },

    /// Returned when a file contains no records.
    #[error("empty dataset (no records) in {path}")]
    EmptyDataset {
        /// Path to the record file.
        path: PathBuf,
    },

    /// Returned when a column spec contains no entries.
    #[error("column spec is empty")]
    EmptyColumnSpec,

    /// Returned when a column spec entry is malformed.
    #[error("invalid column spec entry \"{entry}\": {reason}")]
    InvalidColumnSpec {
        /// The offending `name=index` entry.
        entry: String,
        /// What is wrong with it.
        reason: &'static str,
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

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a CSV result row cannot be written.
    #[error("cannot write CSV rows to {path}")]
    CsvWrite {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
}
