use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Options for reading spreadsheet files
#[derive(Debug, Clone, Default)]
pub struct XlsxReadOptions {
    /// Only read the first `n` sheets by position; later sheets are never parsed
    pub max_sheets: Option<usize>,
}

impl XlsxReadOptions {
    /// Limit how many leading sheets are read
    #[must_use]
    pub fn with_max_sheets(mut self, max_sheets: usize) -> Self {
        self.max_sheets = Some(max_sheets);
        self
    }
}

fn read_error(e: impl std::fmt::Display) -> SheetError {
    SheetError::Spreadsheet(e.to_string())
}

fn write_error(e: XlsxError) -> SheetError {
    SheetError::Serialize(e.to_string())
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel serial date: days since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        // #N/A, #DIV/0! and friends are missing values for plotting
        Data::Error(_) => CellValue::Null,
    }
}

fn read_book<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    name: &str,
    options: &XlsxReadOptions,
) -> Result<Book> {
    let mut sheet_names = workbook.sheet_names();
    if let Some(max) = options.max_sheets {
        sheet_names.truncate(max);
    }

    let mut book = Book::with_name(name);

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name).map_err(read_error)?;

        let grid: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(data_to_cell_value).collect())
            .collect();

        book.add_sheet(&sheet_name, Sheet::from_grid(&sheet_name, grid))?;
    }

    Ok(book)
}

impl Book {
    /// Load a book from a spreadsheet file (xlsx, xlsm, xlsb, xls, ods)
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_xlsx_with_options(path, XlsxReadOptions::default())
    }

    /// Load a book from a spreadsheet file with options
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx_with_options<P: AsRef<Path>>(path: P, options: XlsxReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path).map_err(read_error)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("Book1");

        read_book(&mut workbook, name, &options)
    }

    /// Load a book from in-memory spreadsheet content
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a readable spreadsheet.
    pub fn from_xlsx_bytes(name: &str, data: &[u8], options: XlsxReadOptions) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(data)).map_err(read_error)?;
        read_book(&mut workbook, name, &options)
    }

    /// Save the book to an xlsx file, header row first
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref()).map_err(write_error)
    }

    /// Serialize the book to xlsx bytes
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be serialized.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        workbook.save_to_buffer().map_err(write_error)
    }

    fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();

        for (name, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name).map_err(write_error)?;
            write_sheet(worksheet, sheet)?;
        }

        Ok(workbook)
    }
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<()> {
    let to_col = |i: usize| {
        u16::try_from(i).map_err(|_| SheetError::Serialize("Column index overflow".to_string()))
    };
    let to_row = |i: usize| {
        u32::try_from(i).map_err(|_| SheetError::Serialize("Row index overflow".to_string()))
    };

    for (col_idx, header) in sheet.column_names().iter().enumerate() {
        worksheet
            .write_string(0, to_col(col_idx)?, header)
            .map_err(write_error)?;
    }

    for (row_idx, row) in sheet.rows().enumerate() {
        let row_num = to_row(row_idx + 1)?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = to_col(col_idx)?;
            match cell {
                CellValue::Null => {}
                CellValue::Bool(b) => {
                    worksheet
                        .write_boolean(row_num, col_num, *b)
                        .map_err(write_error)?;
                }
                // Excel stores all numbers as f64
                CellValue::Int(i) => {
                    worksheet
                        .write_number(row_num, col_num, *i as f64)
                        .map_err(write_error)?;
                }
                CellValue::Float(f) => {
                    worksheet
                        .write_number(row_num, col_num, *f)
                        .map_err(write_error)?;
                }
                CellValue::String(s) => {
                    worksheet
                        .write_string(row_num, col_num, s)
                        .map_err(write_error)?;
                }
            }
        }
    }

    Ok(())
}
