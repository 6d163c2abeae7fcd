use crate::chart::{AxisValue, ChartPoint, ChartSpec};
use crate::error::{Axis, ChartError};
use sheetviz_core::{AxisSelection, ChartKind};
use sheetviz_sheet::{CellValue, ColumnId, Sheet};
use tracing::debug;

/// A selection resolved against one worksheet.
///
/// A 3D request always carries its Z column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRequest {
    Scatter { x: ColumnId, y: ColumnId },
    Line { x: ColumnId, y: ColumnId },
    Scatter3d { x: ColumnId, y: ColumnId, z: ColumnId },
}

impl ChartRequest {
    /// Validate a selection against a worksheet's columns.
    ///
    /// The Z requirement of 3D scatter is checked before any column lookup.
    /// Z is ignored for 2D kinds.
    ///
    /// # Errors
    ///
    /// `ChartError::MissingZAxis` for a 3D request without Z, and
    /// `ChartError::Column` for an unknown column name.
    pub fn resolve(sheet: &Sheet, selection: &AxisSelection) -> Result<Self, ChartError> {
        if selection.kind.requires_z() && selection.z.is_none() {
            return Err(ChartError::MissingZAxis);
        }

        let x = sheet.resolve_column(&selection.x)?;
        let y = sheet.resolve_column(&selection.y)?;

        Ok(match (selection.kind, selection.z.as_deref()) {
            (ChartKind::Scatter, _) => Self::Scatter { x, y },
            (ChartKind::Line, _) => Self::Line { x, y },
            (ChartKind::Scatter3d, Some(z)) => Self::Scatter3d {
                x,
                y,
                z: sheet.resolve_column(z)?,
            },
            (ChartKind::Scatter3d, None) => return Err(ChartError::MissingZAxis),
        })
    }

    /// The requested chart kind.
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Scatter { .. } => ChartKind::Scatter,
            Self::Line { .. } => ChartKind::Line,
            Self::Scatter3d { .. } => ChartKind::Scatter3d,
        }
    }

    /// X and Y columns.
    #[must_use]
    pub fn xy(&self) -> (ColumnId, ColumnId) {
        match *self {
            Self::Scatter { x, y } | Self::Line { x, y } | Self::Scatter3d { x, y, .. } => (x, y),
        }
    }

    /// Z column, for 3D requests.
    #[must_use]
    pub fn z(&self) -> Option<ColumnId> {
        match *self {
            Self::Scatter3d { z, .. } => Some(z),
            _ => None,
        }
    }
}

/// True when every non-empty cell of the column reads as a number.
#[must_use]
pub fn is_numeric_column(sheet: &Sheet, column: ColumnId) -> bool {
    sheet
        .column_values(column)
        .filter(|cell| !cell.is_null())
        .all(|cell| cell.as_float().is_some())
}

fn axis_value(cell: &CellValue, numeric: bool) -> Option<AxisValue> {
    if cell.is_null() {
        None
    } else if numeric {
        cell.as_float().map(AxisValue::Number)
    } else {
        Some(AxisValue::Category(cell.as_str()))
    }
}

fn require_numeric(sheet: &Sheet, axis: Axis, column: ColumnId) -> Result<(), ChartError> {
    if is_numeric_column(sheet, column) {
        Ok(())
    } else {
        Err(ChartError::NonNumericAxis {
            axis,
            column: sheet.column_name(column).to_string(),
        })
    }
}

/// Build the chart for a resolved request.
///
/// Points follow worksheet row order for every kind; line charts are never
/// sorted by X. Rows with an empty selected cell are skipped.
///
/// # Errors
///
/// Returns a [`ChartError`] when the column types do not fit the chart kind or
/// no row can be plotted.
pub fn build_chart(sheet: &Sheet, request: &ChartRequest) -> Result<ChartSpec, ChartError> {
    let (x, y) = request.xy();
    let z = request.z();

    let (x_numeric, y_numeric) = match z {
        Some(z) => {
            require_numeric(sheet, Axis::X, x)?;
            require_numeric(sheet, Axis::Y, y)?;
            require_numeric(sheet, Axis::Z, z)?;
            (true, true)
        }
        None => {
            let pair = (is_numeric_column(sheet, x), is_numeric_column(sheet, y));
            if pair == (false, false) {
                return Err(ChartError::NoNumericAxis {
                    x: sheet.column_name(x).to_string(),
                    y: sheet.column_name(y).to_string(),
                });
            }
            pair
        }
    };

    let kind = request.kind();
    let mut spec = ChartSpec::new(
        kind,
        format!("{} - {} Plot", sheet.name(), kind.label()),
        sheet.column_name(x),
        sheet.column_name(y),
    );
    spec.z_label = z.map(|z| sheet.column_name(z).to_string());

    for (row, cells) in sheet.rows().enumerate() {
        let px = axis_value(&cells[x.index()], x_numeric);
        let py = axis_value(&cells[y.index()], y_numeric);
        let pz = match z {
            Some(z) => cells[z.index()].as_float().map(Some),
            None => Some(None),
        };

        match (px, py, pz) {
            (Some(x_value), Some(y_value), Some(z_value)) => spec.points.push(ChartPoint {
                row,
                x: x_value,
                y: y_value,
                z: z_value,
            }),
            _ => spec.skipped_rows += 1,
        }
    }

    if spec.points.is_empty() {
        return Err(ChartError::NoPlottableRows);
    }

    debug!(
        sheet = sheet.name(),
        kind = kind.as_str(),
        points = spec.points.len(),
        skipped = spec.skipped_rows,
        "Built chart"
    );

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_sheet() -> Sheet {
        let mut sheet = Sheet::from_data(vec![vec!["n", "label", "m"]]);
        sheet
            .row_append(vec![CellValue::Int(1), "a".into(), CellValue::Float(0.5)])
            .unwrap();
        sheet
            .row_append(vec![CellValue::Int(2), "b".into(), CellValue::Null])
            .unwrap();
        sheet
    }

    #[test]
    fn test_resolve_ignores_z_for_2d() {
        let sheet = mixed_sheet();
        let selection = AxisSelection::new("n", "m").with_z("does-not-exist");
        let request = ChartRequest::resolve(&sheet, &selection).unwrap();
        assert_eq!(request.kind(), ChartKind::Scatter);
        assert_eq!(request.z(), None);
    }

    #[test]
    fn test_resolve_missing_z_before_columns() {
        let sheet = mixed_sheet();
        let selection = AxisSelection::new("nope", "nope").with_kind(ChartKind::Scatter3d);
        assert!(matches!(
            ChartRequest::resolve(&sheet, &selection),
            Err(ChartError::MissingZAxis)
        ));
    }

    #[test]
    fn test_resolve_unknown_column() {
        let sheet = mixed_sheet();
        let selection = AxisSelection::new("n", "missing");
        assert!(matches!(
            ChartRequest::resolve(&sheet, &selection),
            Err(ChartError::Column(_))
        ));
    }

    #[test]
    fn test_numeric_detection() {
        let sheet = mixed_sheet();
        let n = sheet.resolve_column("n").unwrap();
        let label = sheet.resolve_column("label").unwrap();
        let m = sheet.resolve_column("m").unwrap();
        assert!(is_numeric_column(&sheet, n));
        assert!(!is_numeric_column(&sheet, label));
        assert!(is_numeric_column(&sheet, m));
    }

    #[test]
    fn test_categorical_x_with_numeric_y() {
        let sheet = mixed_sheet();
        let request = ChartRequest::resolve(&sheet, &AxisSelection::new("label", "n")).unwrap();
        let spec = build_chart(&sheet, &request).unwrap();
        assert_eq!(spec.points[0].x, AxisValue::Category("a".to_string()));
        assert_eq!(spec.points[1].y, AxisValue::Number(2.0));
    }

    #[test]
    fn test_rows_with_empty_cells_are_skipped() {
        let sheet = mixed_sheet();
        let request = ChartRequest::resolve(&sheet, &AxisSelection::new("n", "m")).unwrap();
        let spec = build_chart(&sheet, &request).unwrap();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.skipped_rows, 1);
        assert_eq!(spec.points[0].row, 0);
    }

    #[test]
    fn test_both_text_axes_fail() {
        let sheet = mixed_sheet();
        let request =
            ChartRequest::resolve(&sheet, &AxisSelection::new("label", "label")).unwrap();
        assert!(matches!(
            build_chart(&sheet, &request),
            Err(ChartError::NoNumericAxis { .. })
        ));
    }

    #[test]
    fn test_3d_rejects_text_axis() {
        let sheet = mixed_sheet();
        let selection = AxisSelection::new("n", "label")
            .with_z("m")
            .with_kind(ChartKind::Scatter3d);
        let request = ChartRequest::resolve(&sheet, &selection).unwrap();
        match build_chart(&sheet, &request) {
            Err(ChartError::NonNumericAxis { axis, column }) => {
                assert_eq!(axis, Axis::Y);
                assert_eq!(column, "label");
            }
            other => panic!("expected NonNumericAxis, got {other:?}"),
        }
    }

    #[test]
    fn test_all_rows_empty() {
        let mut sheet = Sheet::from_data(vec![vec!["a", "b"]]);
        sheet
            .row_append(vec![CellValue::Null, CellValue::Int(1)])
            .unwrap();
        let request = ChartRequest::resolve(&sheet, &AxisSelection::new("a", "b")).unwrap();
        assert!(matches!(
            build_chart(&sheet, &request),
            Err(ChartError::NoPlottableRows)
        ));
    }
}
