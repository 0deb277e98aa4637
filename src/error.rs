use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Error type covering the different failure cases that can occur while the
/// tool decodes inputs, reconciles them, or emits report documents.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the workbook decoder (corrupt or unsupported
    /// spreadsheet bytes).
    #[error("failed to decode workbook: {0}")]
    Decode(#[from] calamine::Error),

    /// Raised when a workbook decodes but is structurally unusable, for
    /// example when it has no sheets or the results sheet lacks a header row.
    #[error("invalid workbook structure: {0}")]
    InvalidSheet(String),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Raised when JSON serialization of the processing summary fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when processing is requested before both source tables are
    /// loaded into the session.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingFile(PathBuf),

    /// Raised when the session selects no groups or no test categories.
    #[error("empty selection: {0}")]
    EmptySelection(&'static str),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
