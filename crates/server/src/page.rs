//! HTML rendering for the dashboard.

use sheetviz_core::{z_options, AxisSelection, ChartKind};
use sheetviz_sheet::{Book, Sheet};
use sheetviz_viz::{escape_html, SheetOutcome, SheetReport, PLOTLY_CDN};

/// Data rows shown in a worksheet's table view.
pub const PREVIEW_ROWS: usize = 100;

const STYLE: &str = r"
body { font-family: sans-serif; margin: 1.5rem; }
nav a { margin-right: 1rem; }
nav a.active { font-weight: bold; }
.table-wrap { max-height: 250px; overflow: auto; border: 1px solid #ccc; }
table { border-collapse: collapse; }
th, td { padding: 2px 8px; border-bottom: 1px solid #eee; text-align: left; }
.warning { background: #fff4ce; padding: 0.5rem; }
.error { background: #fde7e9; padding: 0.5rem; }
.chart { width: 100%; height: 520px; }
";

fn layout(title: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="{PLOTLY_CDN}"></script>
    <style>{STYLE}</style>
</head>
<body>
<h1>Multi-Sheet Excel Visualizer</h1>
{body}
</body>
</html>"#
    )
}

fn source_forms() -> &'static str {
    r#"<section class="sources">
<form method="post" action="/load/path">
    <label>Workbook path <input name="path" size="50"></label>
    <button type="submit">Load</button>
</form>
<form method="post" action="/load/upload" enctype="multipart/form-data">
    <label>Upload <input type="file" name="file" accept=".xlsx,.xlsm,.xlsb,.xls,.ods"></label>
    <button type="submit">Upload</button>
</form>
<form method="post" action="/load/url">
    <label>Workbook URL <input name="url" size="50"></label>
    <button type="submit">Fetch</button>
</form>
</section>"#
}

fn tabs(book: &Book, max_sheets: usize, active: Option<usize>) -> String {
    let links: String = book
        .sheet_names()
        .into_iter()
        .take(max_sheets)
        .enumerate()
        .map(|(i, name)| {
            let class = if active == Some(i) { " class=\"active\"" } else { "" };
            format!(
                "<a href=\"/sheets/{i}\"{class}>Sheet: {}</a>",
                escape_html(name)
            )
        })
        .collect();
    format!("<nav>{links}</nav>")
}

/// Landing page: source forms, then either the load error or the sheet tabs.
pub fn index_page(
    book: Option<&Book>,
    source: Option<&str>,
    load_error: Option<&str>,
    max_sheets: usize,
) -> String {
    let mut body = String::from(source_forms());

    if let Some(error) = load_error {
        body.push_str(&format!(
            "<p class=\"error\">Could not load workbook '{}': {}</p>",
            escape_html(source.unwrap_or("")),
            escape_html(error)
        ));
    } else if let Some(book) = book {
        body.push_str(&format!(
            "<p>Loaded <code>{}</code> ({} of {} sheets shown)</p>",
            escape_html(source.unwrap_or(book.name())),
            book.sheet_count().min(max_sheets),
            book.sheet_count()
        ));
        body.push_str(&tabs(book, max_sheets, None));
    } else {
        body.push_str("<p>No workbook loaded.</p>");
    }

    layout("sheetviz", &body)
}

fn table(sheet: &Sheet) -> String {
    let header: String = sheet
        .column_names()
        .iter()
        .map(|c| format!("<th>{}</th>", escape_html(c)))
        .collect();

    let rows: String = sheet
        .head(PREVIEW_ROWS)
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", escape_html(&cell.as_str())))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    let more = if sheet.row_count() > PREVIEW_ROWS {
        format!(
            "<p>Showing {PREVIEW_ROWS} of {} rows.</p>",
            sheet.row_count()
        )
    } else {
        String::new()
    };

    format!(
        "<div class=\"table-wrap\"><table><thead><tr>{header}</tr></thead><tbody>{rows}</tbody></table></div>{more}"
    )
}

fn select(name: &str, label: &str, options: &[String], selected: &str) -> String {
    let options: String = options
        .iter()
        .map(|option| {
            let mark = if option == selected { " selected" } else { "" };
            let option = escape_html(option);
            format!("<option value=\"{option}\"{mark}>{option}</option>")
        })
        .collect();
    format!("<label>{label} <select name=\"{name}\" onchange=\"this.form.submit()\">{options}</select></label>")
}

fn controls(sheet: &Sheet, index: usize, selection: &AxisSelection) -> String {
    let name = escape_html(sheet.name());
    let columns = sheet.column_names();

    let kinds: String = ChartKind::ALL
        .iter()
        .map(|kind| {
            let mark = if *kind == selection.kind { " checked" } else { "" };
            format!(
                "<label><input type=\"radio\" name=\"kind\" value=\"{}\"{mark} onchange=\"this.form.submit()\"> {}</label>",
                kind.as_str(),
                kind.label()
            )
        })
        .collect();

    format!(
        r#"<form method="get" action="/sheets/{index}" class="controls">
{}
{}
{}
<fieldset><legend>Choose graph type</legend>{kinds}</fieldset>
<noscript><button type="submit">Plot</button></noscript>
</form>"#,
        select("x", &format!("Select X-axis for {name}"), columns, &selection.x),
        select("y", &format!("Select Y-axis for {name}"), columns, &selection.y),
        select(
            "z",
            "Select Z-axis (optional for 3D)",
            &z_options(sheet),
            selection.z_label()
        ),
    )
}

fn outcome(report: &SheetReport) -> String {
    match &report.outcome {
        SheetOutcome::Rendered(chart) => chart.to_html_fragment(&format!("chart-{}", report.index)),
        SheetOutcome::Warning(_) => format!(
            "<p class=\"warning\">{}</p>",
            escape_html(&report.message().unwrap_or_default())
        ),
        SheetOutcome::Failed(_) => format!(
            "<p class=\"error\">{}</p>",
            escape_html(&report.message().unwrap_or_default())
        ),
    }
}

/// One worksheet tab: table, controls and the chart or its warning/error.
pub fn sheet_page(book: &Book, sheet: &Sheet, report: &SheetReport, max_sheets: usize) -> String {
    let mut body = tabs(book, max_sheets, Some(report.index));
    body.push_str(&format!(
        "<h2>Sheet Analysis: {}</h2>",
        escape_html(sheet.name())
    ));

    match &report.selection {
        Some(selection) => {
            body.push_str(&table(sheet));
            body.push_str(&controls(sheet, report.index, selection));
            body.push_str(&outcome(report));
        }
        None => body.push_str(&outcome(report)),
    }

    layout(&format!("Sheet: {}", sheet.name()), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetviz_core::SelectionState;
    use sheetviz_viz::report_for;

    fn book() -> Book {
        let mut book = Book::new();
        book.add_sheet(
            "Data <1>",
            Sheet::from_data(vec![vec!["A", "B"], vec!["1", "2"]]),
        )
        .unwrap();
        book.add_sheet("Empty", Sheet::from_data(vec![vec!["A"]]))
            .unwrap();
        book
    }

    #[test]
    fn test_index_without_book() {
        let html = index_page(None, None, None, 6);
        assert!(html.contains("No workbook loaded."));
        assert!(html.contains("action=\"/load/upload\""));
    }

    #[test]
    fn test_index_lists_tabs_escaped() {
        let book = book();
        let html = index_page(Some(&book), Some("book.xlsx"), None, 6);
        assert!(html.contains("Sheet: Data &lt;1&gt;"));
        assert!(html.contains("href=\"/sheets/1\""));
    }

    #[test]
    fn test_index_shows_load_error_instead_of_tabs() {
        let book = book();
        let html = index_page(Some(&book), Some("x.xlsx"), Some("Workbook file not found: x.xlsx"), 6);
        assert!(html.contains("class=\"error\""));
        assert!(!html.contains("href=\"/sheets/0\""));
    }

    #[test]
    fn test_sheet_page_controls() {
        let book = book();
        let sheet = book.get_sheet_by_index(0).unwrap();
        let report = report_for(0, sheet, &SelectionState::new());
        let html = sheet_page(&book, sheet, &report, 6);

        assert!(html.contains("name=\"z\""));
        assert!(html.contains("<option value=\"None\" selected>None</option>"));
        assert!(html.contains("value=\"scatter\" checked"));
        assert!(html.contains("Plotly.newPlot('chart-0'"));
    }

    #[test]
    fn test_empty_sheet_page_warns() {
        let book = book();
        let sheet = book.get_sheet_by_index(1).unwrap();
        let report = report_for(1, sheet, &SelectionState::new());
        let html = sheet_page(&book, sheet, &report, 6);

        assert!(html.contains("The sheet &#39;Empty&#39; is empty."));
        assert!(!html.contains("name=\"x\""));
    }
}
