//! Error types for sheetviz.

use sheetviz_sheet::SheetError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sheetviz operations.
pub type VizResult<T> = Result<T, VizError>;

/// Why a workbook could not be loaded. Always fatal for the run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The local workbook file does not exist.
    #[error("Workbook file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Fetching a remote workbook failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The content is not a readable spreadsheet.
    #[error("Malformed workbook: {0}")]
    Malformed(String),

    /// The loader cannot handle this kind of source.
    #[error("Unsupported workbook source: {0}")]
    Unsupported(String),

    /// The background parse task panicked or was cancelled.
    #[error("Workbook parsing task failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SheetError> for LoadError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::Io(io) => Self::Io(io),
            other => Self::Malformed(other.to_string()),
        }
    }
}

/// Errors from rendering charts for output.
#[derive(Debug, Error)]
pub enum VizError {
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A chart kind name that is not one of the supported kinds.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown chart kind '{0}' (expected scatter, line or scatter3d)")]
pub struct ParseChartKindError(pub String);
