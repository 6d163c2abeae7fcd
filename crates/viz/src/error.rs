use serde::{Deserialize, Serialize};
use sheetviz_sheet::SheetError;
use std::fmt;
use thiserror::Error;

/// Chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        })
    }
}

/// Why a chart could not be produced for a worksheet.
#[derive(Debug, Error)]
pub enum ChartError {
    /// 3D scatter requested with Z set to "None". Reported as a warning.
    #[error("Please select a Z-axis column for 3D Scatter.")]
    MissingZAxis,

    /// A selected column does not exist in the worksheet.
    #[error(transparent)]
    Column(#[from] SheetError),

    /// A numeric-only axis was given a column with non-numeric values.
    #[error("{axis}-axis column '{column}' contains non-numeric values")]
    NonNumericAxis { axis: Axis, column: String },

    /// Neither X nor Y is numeric.
    #[error("Columns '{x}' and '{y}' are both non-numeric; at least one axis must be numeric")]
    NoNumericAxis { x: String, y: String },

    /// Every row has an empty cell in one of the selected columns.
    #[error("No plottable rows: every row is missing a value in the selected columns")]
    NoPlottableRows,
}
