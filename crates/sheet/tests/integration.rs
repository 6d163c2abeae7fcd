use sheetviz_sheet::{Book, CellValue, Sheet, SheetError, XlsxReadOptions};
use tempfile::tempdir;

fn numeric_sheet(offset: i64) -> Sheet {
    let mut sheet = Sheet::from_data(vec![vec!["A", "B", "C"]]);
    for i in 0..3 {
        let base = offset + i;
        sheet.row_append(vec![base, base * 2, base * 3]).unwrap();
    }
    sheet
}

fn book_with_sheets(count: usize) -> Book {
    let mut book = Book::new();
    for i in 0..count {
        book.add_sheet(&format!("S{i}"), numeric_sheet(i as i64))
            .unwrap();
    }
    book
}

// ===== Loading Tests =====

#[test]
fn test_load_preserves_sheet_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("order.xlsx");

    let mut book = Book::new();
    for name in ["Zulu", "Alpha", "Mike"] {
        book.add_sheet(name, numeric_sheet(0)).unwrap();
    }
    book.save_as_xlsx(&path).unwrap();

    let loaded = Book::from_xlsx(&path).unwrap();
    assert_eq!(loaded.sheet_names(), vec!["Zulu", "Alpha", "Mike"]);
}

#[test]
fn test_load_first_six_of_eight() {
    let bytes = book_with_sheets(8).to_xlsx_bytes().unwrap();

    let loaded = Book::from_xlsx_bytes(
        "eight",
        &bytes,
        XlsxReadOptions::default().with_max_sheets(6),
    )
    .unwrap();

    assert_eq!(
        loaded.sheet_names(),
        vec!["S0", "S1", "S2", "S3", "S4", "S5"]
    );
}

#[test]
fn test_header_only_sheet_loads_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.xlsx");

    let mut book = Book::new();
    book.add_sheet("Headers", Sheet::from_data(vec![vec!["A", "B"]]))
        .unwrap();
    book.add_sheet("Blank", Sheet::new()).unwrap();
    book.save_as_xlsx(&path).unwrap();

    let loaded = Book::from_xlsx(&path).unwrap();

    let headers = loaded.get_sheet("Headers").unwrap();
    assert!(headers.is_empty());
    assert_eq!(headers.col_count(), 2);

    let blank = loaded.get_sheet("Blank").unwrap();
    assert!(blank.is_empty());
    assert_eq!(blank.col_count(), 0);
}

#[test]
fn test_numeric_values_survive_load() {
    let bytes = book_with_sheets(1).to_xlsx_bytes().unwrap();
    let loaded = Book::from_xlsx_bytes("one", &bytes, XlsxReadOptions::default()).unwrap();

    let sheet = loaded.get_sheet("S0").unwrap();
    let c = sheet.resolve_column("C").unwrap();
    let values: Vec<f64> = sheet
        .column_values(c)
        .filter_map(CellValue::as_float)
        .collect();
    assert_eq!(values, vec![0.0, 3.0, 6.0]);
}

#[test]
fn test_missing_file_is_error() {
    let dir = tempdir().unwrap();
    let result = Book::from_xlsx(dir.path().join("missing.xlsx"));
    assert!(matches!(result, Err(SheetError::Spreadsheet(_))));
}

#[test]
fn test_duplicate_headers_are_disambiguated() {
    let sheet = Sheet::from_data(vec![
        vec!["value", "value", ""],
        vec!["1", "2", "3"],
    ]);
    assert_eq!(
        sheet.column_names(),
        &[
            "value".to_string(),
            "value.1".to_string(),
            "Unnamed: 2".to_string()
        ]
    );
    assert!(sheet.resolve_column("value.1").is_ok());
}
