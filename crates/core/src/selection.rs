//! Per-worksheet axis and chart kind selections.

use crate::error::ParseChartKindError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sheetviz_sheet::Sheet;
use std::fmt;
use std::str::FromStr;

/// Label of the "no Z axis" choice offered alongside the column names.
pub const Z_NONE: &str = "None";

/// Supported chart kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Two-dimensional scatter of (X, Y)
    #[default]
    Scatter,
    /// Line through (X, Y) in row order
    Line,
    /// Three-dimensional scatter of (X, Y, Z)
    Scatter3d,
}

impl ChartKind {
    /// All kinds, in the order they are offered.
    pub const ALL: [ChartKind; 3] = [Self::Scatter, Self::Line, Self::Scatter3d];

    /// Wire name (`scatter`, `line`, `scatter3d`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scatter => "scatter",
            Self::Line => "line",
            Self::Scatter3d => "scatter3d",
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Scatter => "2D Scatter",
            Self::Line => "Line",
            Self::Scatter3d => "3D Scatter",
        }
    }

    /// Whether this kind needs a Z column.
    #[must_use]
    pub fn requires_z(self) -> bool {
        matches!(self, Self::Scatter3d)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = ParseChartKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scatter" | "2d" | "2d scatter" | "scatter2d" => Ok(Self::Scatter),
            "line" => Ok(Self::Line),
            "scatter3d" | "3d" | "3d scatter" => Ok(Self::Scatter3d),
            _ => Err(ParseChartKindError(s.to_string())),
        }
    }
}

/// The user's choices for one worksheet.
///
/// Column names are unvalidated here; they are resolved against the
/// worksheet when a chart is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSelection {
    pub x: String,
    pub y: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<String>,
    #[serde(default)]
    pub kind: ChartKind,
}

impl AxisSelection {
    /// Select X and Y with no Z and the default chart kind.
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            z: None,
            kind: ChartKind::default(),
        }
    }

    /// Set the Z column.
    #[must_use]
    pub fn with_z(mut self, z: impl Into<String>) -> Self {
        self.z = Some(z.into());
        self
    }

    /// Set the chart kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ChartKind) -> Self {
        self.kind = kind;
        self
    }

    /// Initial selection for a worksheet: first column for both X and Y,
    /// no Z, 2D scatter. `None` when the worksheet has no columns.
    #[must_use]
    pub fn default_for(sheet: &Sheet) -> Option<Self> {
        let first = sheet.column_names().first()?;
        Some(Self::new(first.clone(), first.clone()))
    }

    /// The Z choice as displayed, [`Z_NONE`] when unset.
    #[must_use]
    pub fn z_label(&self) -> &str {
        self.z.as_deref().unwrap_or(Z_NONE)
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, update: &SelectionUpdate) {
        if let Some(x) = &update.x {
            self.x.clone_from(x);
        }
        if let Some(y) = &update.y {
            self.y.clone_from(y);
        }
        if let Some(z) = &update.z {
            self.z = parse_z(z);
        }
        if let Some(kind) = update.kind {
            self.kind = kind;
        }
    }
}

/// Interpret a Z choice: empty or exactly [`Z_NONE`] means no Z axis.
///
/// The match is case-sensitive so a column named "none" stays selectable.
#[must_use]
pub fn parse_z(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == Z_NONE {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Choices offered for the Z axis: [`Z_NONE`] followed by every column.
#[must_use]
pub fn z_options(sheet: &Sheet) -> Vec<String> {
    std::iter::once(Z_NONE.to_string())
        .chain(sheet.column_names().iter().cloned())
        .collect()
}

/// A partial change to one worksheet's selection, as sent by a control.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionUpdate {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    /// `"None"` clears the Z axis.
    #[serde(default)]
    pub z: Option<String>,
    #[serde(default)]
    pub kind: Option<ChartKind>,
}

impl SelectionUpdate {
    /// True when the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none() && self.kind.is_none()
    }
}

/// Selections keyed by worksheet name.
///
/// Each worksheet's entry is independent; touching one never changes another.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionState {
    entries: IndexMap<String, AxisSelection>,
}

impl SelectionState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored selection for a worksheet, if any.
    #[must_use]
    pub fn get(&self, sheet_name: &str) -> Option<&AxisSelection> {
        self.entries.get(sheet_name)
    }

    /// Replace a worksheet's selection.
    pub fn set(&mut self, sheet_name: impl Into<String>, selection: AxisSelection) {
        self.entries.insert(sheet_name.into(), selection);
    }

    /// The stored selection for this worksheet or its default.
    #[must_use]
    pub fn selection_for(&self, sheet: &Sheet) -> Option<AxisSelection> {
        self.get(sheet.name())
            .cloned()
            .or_else(|| AxisSelection::default_for(sheet))
    }

    /// Apply a partial update to a worksheet's selection (starting from its
    /// default) and return the result.
    pub fn apply(&mut self, sheet: &Sheet, update: &SelectionUpdate) -> Option<AxisSelection> {
        let mut selection = self.selection_for(sheet)?;
        selection.apply(update);
        self.set(sheet.name(), selection.clone());
        Some(selection)
    }

    /// Forget every selection.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of worksheets with a stored selection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been selected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str) -> Sheet {
        let mut sheet = Sheet::from_data(vec![vec!["A", "B", "C"], vec!["1", "2", "3"]]);
        sheet.set_name(name);
        sheet
    }

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!("scatter".parse::<ChartKind>(), Ok(ChartKind::Scatter));
        assert_eq!("Line".parse::<ChartKind>(), Ok(ChartKind::Line));
        assert_eq!("3D".parse::<ChartKind>(), Ok(ChartKind::Scatter3d));
        assert!("pie".parse::<ChartKind>().is_err());
    }

    #[test]
    fn test_chart_kind_serde_names() {
        let json = serde_json::to_string(&ChartKind::Scatter3d).unwrap();
        assert_eq!(json, "\"scatter3d\"");
        for kind in ChartKind::ALL {
            assert_eq!(kind.as_str().parse::<ChartKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_default_selection_uses_first_column() {
        let selection = AxisSelection::default_for(&sheet("S")).unwrap();
        assert_eq!(selection.x, "A");
        assert_eq!(selection.y, "A");
        assert_eq!(selection.z, None);
        assert_eq!(selection.kind, ChartKind::Scatter);
        assert_eq!(selection.z_label(), Z_NONE);
    }

    #[test]
    fn test_no_columns_no_default() {
        assert!(AxisSelection::default_for(&Sheet::new()).is_none());
    }

    #[test]
    fn test_z_options_lead_with_none() {
        assert_eq!(z_options(&sheet("S")), vec!["None", "A", "B", "C"]);
    }

    #[test]
    fn test_update_clears_z_with_none() {
        let mut selection = AxisSelection::new("A", "B").with_z("C");
        selection.apply(&SelectionUpdate {
            z: Some("None".to_string()),
            ..SelectionUpdate::default()
        });
        assert_eq!(selection.z, None);
    }

    #[test]
    fn test_parse_z() {
        assert_eq!(parse_z(""), None);
        assert_eq!(parse_z("  "), None);
        assert_eq!(parse_z("None"), None);
        assert_eq!(parse_z(" C "), Some("C".to_string()));
        assert_eq!(parse_z("none"), Some("none".to_string()));
        assert_eq!(parse_z("NONE"), Some("NONE".to_string()));
    }

    #[test]
    fn test_column_named_none_is_selectable_as_z() {
        let mut sheet = Sheet::from_data(vec![vec!["a", "b", "none"], vec!["1", "2", "3"]]);
        sheet.set_name("S");
        let mut state = SelectionState::new();
        let selection = state
            .apply(
                &sheet,
                &SelectionUpdate {
                    z: Some("none".to_string()),
                    kind: Some(ChartKind::Scatter3d),
                    ..SelectionUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(selection.z.as_deref(), Some("none"));
        assert!(z_options(&sheet).contains(&"none".to_string()));
    }

    #[test]
    fn test_state_is_scoped_per_sheet() {
        let first = sheet("First");
        let second = sheet("Second");
        let mut state = SelectionState::new();

        state.apply(
            &first,
            &SelectionUpdate {
                x: Some("B".to_string()),
                kind: Some(ChartKind::Line),
                ..SelectionUpdate::default()
            },
        );

        assert_eq!(state.get("First").unwrap().x, "B");
        assert_eq!(state.get("First").unwrap().kind, ChartKind::Line);
        assert!(state.get("Second").is_none());
        assert_eq!(state.selection_for(&second).unwrap().x, "A");
        assert_eq!(state.len(), 1);
    }
}
