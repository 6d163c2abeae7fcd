use thiserror::Error;

/// Errors raised by the workbook model and the spreadsheet reader/writer.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Row {index} is out of range (worksheet has {count} data rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    /// A selected column name is not in the worksheet header.
    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    #[error("Sheet not found: {name}")]
    SheetNotFound { name: String },

    /// Worksheet names are unique within a workbook.
    #[error("Duplicate worksheet name: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Row has {actual} cells, header has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// calamine could not open or read the workbook.
    #[error("Unreadable spreadsheet: {0}")]
    Spreadsheet(String),

    /// rust_xlsxwriter could not produce the workbook.
    #[error("Could not write spreadsheet: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
