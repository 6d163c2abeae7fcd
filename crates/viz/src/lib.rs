//! # sheetviz-viz
//!
//! Worksheet visualization for sheetviz.
//!
//! For every retained worksheet the dispatcher turns an [`AxisSelection`] into
//! a [`ChartRequest`], builds a [`ChartSpec`] and reports a [`SheetOutcome`]:
//! a chart, a warning (empty worksheet, missing Z axis) or a construction
//! failure. Worksheets never affect each other.
//!
//! Chart specs render to:
//! - JSON for API clients
//! - HTML with Plotly.js (standalone page or embeddable fragment)
//!
//! ```
//! use sheetviz_core::{AxisSelection, ChartKind};
//! use sheetviz_sheet::Sheet;
//! use sheetviz_viz::{visualize_sheet, SheetOutcome};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["t", "temp"],
//!     vec!["1", "20.5"],
//!     vec!["2", "21.0"],
//! ]);
//! let selection = AxisSelection::new("t", "temp").with_kind(ChartKind::Line);
//!
//! match visualize_sheet(&sheet, &selection) {
//!     SheetOutcome::Rendered(chart) => assert_eq!(chart.len(), 2),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```

mod chart;
mod dispatch;
mod error;
mod request;

pub use chart::{escape_html, AxisValue, ChartPoint, ChartSpec, PLOTLY_CDN};
pub use dispatch::{
    report_for, visualize_book, visualize_book_with_limit, visualize_sheet, SheetOutcome,
    SheetReport, SheetWarning,
};
pub use error::{Axis, ChartError};
pub use request::{build_chart, is_numeric_column, ChartRequest};

pub use sheetviz_core::{AxisSelection, ChartKind, SelectionState};
