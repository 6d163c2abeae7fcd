//! Sheet/Book module for sheetviz
//!
//! Provides the in-memory workbook model the visualizer works on: an ordered
//! [`Book`] of named [`Sheet`]s, each a header of column names over data rows.
//! Workbooks are read with calamine from a file path or from in-memory bytes.
//!
//! # Examples
//!
//! ## Creating a sheet from data
//!
//! ```
//! use sheetviz_sheet::Sheet;
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["Month", "Sales"],
//!     vec!["Jan", "120"],
//!     vec!["Feb", "135"],
//! ]);
//!
//! assert_eq!(sheet.row_count(), 2);
//! assert_eq!(sheet.col_count(), 2);
//! ```
//!
//! ## Resolving columns
//!
//! ```
//! use sheetviz_sheet::Sheet;
//!
//! let sheet = Sheet::from_data(vec![vec!["x", "y"], vec!["1", "2"]]);
//! let y = sheet.resolve_column("y").unwrap();
//! assert_eq!(sheet.column_values(y).count(), 1);
//! assert!(sheet.resolve_column("z").is_err());
//! ```
//!
//! ## Loading a workbook
//!
//! ```no_run
//! use sheetviz_sheet::{Book, XlsxReadOptions};
//!
//! let book = Book::from_xlsx_with_options(
//!     "data.xlsx",
//!     XlsxReadOptions::default().with_max_sheets(6),
//! ).unwrap();
//! ```

mod book;
mod cell;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet types.
pub use sheet::{normalize_headers, ColumnId, Sheet};
/// Re-export spreadsheet read options.
pub use xlsx::XlsxReadOptions;
