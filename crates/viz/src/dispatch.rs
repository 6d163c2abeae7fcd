//! Per-worksheet visualization dispatch.
//!
//! Each worksheet is handled on its own: an empty worksheet, a missing Z axis
//! or a failed chart only affects that worksheet's [`SheetOutcome`].

use crate::chart::ChartSpec;
use crate::error::ChartError;
use crate::request::{build_chart, ChartRequest};
use serde::{Serialize, Serializer};
use sheetviz_core::{AxisSelection, SelectionState, MAX_SHEETS};
use sheetviz_sheet::{Book, Sheet};
use std::fmt;
use tracing::{debug, warn};

/// A non-fatal reason no chart was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetWarning {
    /// The worksheet has no data rows.
    EmptySheet,
    /// 3D scatter was requested without a Z column.
    MissingZAxis,
}

impl fmt::Display for SheetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySheet => f.write_str("The sheet is empty."),
            Self::MissingZAxis => f.write_str("Please select a Z-axis column for 3D Scatter."),
        }
    }
}

/// What happened when one worksheet was visualized.
#[derive(Debug)]
pub enum SheetOutcome {
    Rendered(ChartSpec),
    Warning(SheetWarning),
    Failed(ChartError),
}

impl SheetOutcome {
    /// The chart, when one was produced.
    #[must_use]
    pub fn chart(&self) -> Option<&ChartSpec> {
        match self {
            Self::Rendered(spec) => Some(spec),
            _ => None,
        }
    }

    /// True when a chart was produced.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

impl From<Result<ChartSpec, ChartError>> for SheetOutcome {
    fn from(result: Result<ChartSpec, ChartError>) -> Self {
        match result {
            Ok(spec) => Self::Rendered(spec),
            Err(ChartError::MissingZAxis) => Self::Warning(SheetWarning::MissingZAxis),
            Err(e) => Self::Failed(e),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum OutcomeView<'a> {
    Rendered { chart: &'a ChartSpec },
    Warning { reason: SheetWarning, message: String },
    Failed { message: String },
}

impl Serialize for SheetOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = match self {
            Self::Rendered(chart) => OutcomeView::Rendered { chart },
            Self::Warning(reason) => OutcomeView::Warning {
                reason: *reason,
                message: reason.to_string(),
            },
            Self::Failed(e) => OutcomeView::Failed {
                message: e.to_string(),
            },
        };
        view.serialize(serializer)
    }
}

/// One worksheet's outcome, labelled for presentation.
#[derive(Debug, Serialize)]
pub struct SheetReport {
    /// Position of the worksheet in the workbook.
    pub index: usize,
    pub sheet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<AxisSelection>,
    pub outcome: SheetOutcome,
}

impl SheetReport {
    /// User-facing text for a warning or failure, `None` for a chart.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match &self.outcome {
            SheetOutcome::Rendered(_) => None,
            SheetOutcome::Warning(SheetWarning::EmptySheet) => {
                Some(format!("The sheet '{}' is empty.", self.sheet))
            }
            SheetOutcome::Warning(warning) => Some(warning.to_string()),
            SheetOutcome::Failed(e) => Some(format!("Plotting Error: {e}")),
        }
    }
}

/// Visualize one worksheet with the given selection.
///
/// Never panics or returns early on bad data; everything ends up in the outcome.
pub fn visualize_sheet(sheet: &Sheet, selection: &AxisSelection) -> SheetOutcome {
    if sheet.is_empty() {
        return SheetOutcome::Warning(SheetWarning::EmptySheet);
    }

    let outcome: SheetOutcome = ChartRequest::resolve(sheet, selection)
        .and_then(|request| build_chart(sheet, &request))
        .into();

    match &outcome {
        SheetOutcome::Rendered(spec) => {
            debug!(sheet = sheet.name(), points = spec.len(), "Rendered sheet");
        }
        SheetOutcome::Warning(warning) => {
            warn!(sheet = sheet.name(), %warning, "Sheet not rendered");
        }
        SheetOutcome::Failed(e) => {
            warn!(sheet = sheet.name(), error = %e, "Chart construction failed");
        }
    }

    outcome
}

/// Visualize the worksheet at `index`, using its stored selection or the default.
#[must_use]
pub fn report_for(index: usize, sheet: &Sheet, selections: &SelectionState) -> SheetReport {
    let selection = if sheet.is_empty() {
        None
    } else {
        selections.selection_for(sheet)
    };

    let outcome = match &selection {
        Some(selection) => visualize_sheet(sheet, selection),
        None => {
            warn!(sheet = sheet.name(), "Sheet is empty");
            SheetOutcome::Warning(SheetWarning::EmptySheet)
        }
    };

    SheetReport {
        index,
        sheet: sheet.name().to_string(),
        selection,
        outcome,
    }
}

/// Visualize the first [`MAX_SHEETS`] worksheets in workbook order.
#[must_use]
pub fn visualize_book(book: &Book, selections: &SelectionState) -> Vec<SheetReport> {
    visualize_book_with_limit(book, selections, MAX_SHEETS)
}

/// Visualize the first `limit` worksheets in workbook order.
#[must_use]
pub fn visualize_book_with_limit(
    book: &Book,
    selections: &SelectionState,
    limit: usize,
) -> Vec<SheetReport> {
    book.sheets()
        .take(limit)
        .enumerate()
        .map(|(index, (_, sheet))| report_for(index, sheet, selections))
        .collect()
}
