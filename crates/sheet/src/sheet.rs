use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A column handle that has been validated against one sheet's header.
///
/// Obtained from [`Sheet::resolve_column`]; only meaningful for the sheet that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(usize);

impl ColumnId {
    /// Zero-based column position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A worksheet: a header of column names over row-major data rows.
///
/// Every data row has exactly `col_count()` cells.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    data: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            columns: Vec::new(),
            column_index: HashMap::new(),
            data: Vec::new(),
        }
    }

    /// Create a sheet from a 2D vector of values; the first row is the header.
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let grid = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self::from_grid("Sheet1", grid)
    }

    /// Build a sheet from a raw cell grid as read from a spreadsheet range.
    ///
    /// The first row becomes the header (see [`normalize_headers`]). Rows are
    /// padded with nulls to the widest row in the grid.
    #[must_use]
    pub fn from_grid(name: &str, grid: Vec<Vec<CellValue>>) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = grid.into_iter();

        let mut header = rows.next().unwrap_or_default();
        header.resize(width, CellValue::Null);
        let columns = normalize_headers(&header);

        let data = rows
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();

        let column_index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        Sheet {
            name: name.to_string(),
            columns,
            column_index,
            data,
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Number of data rows (the header is not counted)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// A sheet with no data rows is empty, even if it has a header.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // ===== Columns =====

    /// Column names in header order
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Resolve a column name to a validated handle.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::ColumnNotFound` if no column has this name.
    pub fn resolve_column(&self, name: &str) -> Result<ColumnId> {
        self.column_index
            .get(name)
            .copied()
            .map(ColumnId)
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Name of a resolved column
    #[must_use]
    pub fn column_name(&self, id: ColumnId) -> &str {
        &self.columns[id.0]
    }

    /// All cells of a resolved column, in row order
    pub fn column_values(&self, id: ColumnId) -> impl Iterator<Item = &CellValue> + '_ {
        self.data.iter().map(move |row| &row[id.0])
    }

    /// Get the cell at a data row and resolved column
    #[must_use]
    pub fn get(&self, row: usize, id: ColumnId) -> Option<&CellValue> {
        self.data.get(row).map(|r| &r[id.0])
    }

    // ===== Rows =====

    /// Get a data row by index
    ///
    /// # Errors
    ///
    /// Returns `SheetError::RowIndexOutOfBounds` for an index past the last row.
    pub fn row(&self, index: usize) -> Result<&[CellValue]> {
        self.data
            .get(index)
            .map(Vec::as_slice)
            .ok_or(SheetError::RowIndexOutOfBounds {
                index,
                count: self.data.len(),
            })
    }

    /// Append a data row
    ///
    /// # Errors
    ///
    /// Returns `SheetError::LengthMismatch` if the row width differs from the header.
    pub fn row_append<T: Into<CellValue>>(&mut self, data: Vec<T>) -> Result<()> {
        if data.len() != self.columns.len() {
            return Err(SheetError::LengthMismatch {
                expected: self.columns.len(),
                actual: data.len(),
            });
        }
        self.data.push(data.into_iter().map(Into::into).collect());
        Ok(())
    }

    /// Iterate over data rows
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }

    /// The first `n` data rows
    #[must_use]
    pub fn head(&self, n: usize) -> &[Vec<CellValue>] {
        &self.data[..n.min(self.data.len())]
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a raw header row into unique column names.
///
/// Blank cells become `Unnamed: {index}`; repeated names get `.1`, `.2`, ...
/// suffixes in order of appearance.
#[must_use]
pub fn normalize_headers(header: &[CellValue]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (i, cell) in header.iter().enumerate() {
        let base = if cell.is_null() {
            format!("Unnamed: {i}")
        } else {
            cell.as_str().trim().to_string()
        };

        let mut name = base.clone();
        while seen.contains(&name) {
            let n = counts.entry(base.clone()).or_insert(0);
            *n += 1;
            name = format!("{base}.{n}");
        }

        seen.insert(name.clone());
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_uses_header_row() {
        let sheet = Sheet::from_data(vec![vec!["A", "B"], vec!["1", "2"], vec!["3", "4"]]);
        assert_eq!(sheet.column_names(), &["A".to_string(), "B".to_string()]);
        assert_eq!(sheet.row_count(), 2);
        assert!(!sheet.is_empty());
    }

    #[test]
    fn test_header_only_is_empty() {
        let sheet = Sheet::from_data(vec![vec!["A", "B"]]);
        assert_eq!(sheet.col_count(), 2);
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let sheet = Sheet::from_grid(
            "Ragged",
            vec![
                vec!["A".into()],
                vec![CellValue::Int(1), CellValue::Int(2)],
            ],
        );
        assert_eq!(sheet.column_names(), &["A".to_string(), "Unnamed: 1".to_string()]);
        assert_eq!(sheet.row(0).unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_headers() {
        let names = normalize_headers(&[
            "x".into(),
            CellValue::Null,
            "x".into(),
            CellValue::Float(2020.0),
            "x".into(),
        ]);
        assert_eq!(names, vec!["x", "Unnamed: 1", "x.1", "2020", "x.2"]);
    }

    #[test]
    fn test_resolve_column() {
        let sheet = Sheet::from_data(vec![vec!["A", "B"], vec!["1", "2"]]);
        let b = sheet.resolve_column("B").unwrap();
        assert_eq!(b.index(), 1);
        assert_eq!(sheet.column_name(b), "B");
        assert!(matches!(
            sheet.resolve_column("C"),
            Err(SheetError::ColumnNotFound { name }) if name == "C"
        ));
    }

    #[test]
    fn test_row_append_checks_width() {
        let mut sheet = Sheet::from_data(vec![vec!["A", "B"]]);
        sheet.row_append(vec![1, 2]).unwrap();
        assert!(matches!(
            sheet.row_append(vec![1]),
            Err(SheetError::LengthMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_head_is_bounded() {
        let sheet = Sheet::from_data(vec![vec!["A"], vec!["1"], vec!["2"]]);
        assert_eq!(sheet.head(1).len(), 1);
        assert_eq!(sheet.head(10).len(), 2);
    }
}
