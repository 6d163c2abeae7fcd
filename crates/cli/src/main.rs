//! # sheetviz-cli
//!
//! Command-line interface for visualizing the worksheets of a workbook.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use sheetviz_core::{
    ChartKind, FileLoader, SelectionState, SelectionUpdate, WorkbookLoader, WorkbookSource,
    MAX_SHEETS,
};
use sheetviz_http::{HttpClient, HttpLoader, DEFAULT_TIMEOUT_SECS};
use sheetviz_sheet::{Book, Sheet};
use sheetviz_viz::{escape_html, visualize_book_with_limit, SheetOutcome, SheetReport, PLOTLY_CDN};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// sheetviz - Plot the worksheets of a spreadsheet
#[derive(Parser)]
#[command(name = "sheetviz")]
#[command(author, version, about = "Multi-sheet workbook visualizer", long_about = None)]
struct Cli {
    /// Workbook path or http(s) URL
    #[arg(value_name = "SOURCE")]
    source: Option<String>,

    /// Remote workbook URL
    #[arg(short, long, conflicts_with = "source")]
    url: Option<String>,

    /// Axis selection for a worksheet (SHEET:x=A,y=B,z=C,kind=line)
    #[arg(short, long = "select", value_name = "SHEET:KEY=VALUE,...")]
    selections: Vec<String>,

    /// Number of leading worksheets to keep
    #[arg(long, default_value_t = MAX_SHEETS)]
    max_sheets: usize,

    /// Preview rows printed per worksheet
    #[arg(short, long, default_value_t = 5)]
    rows: usize,

    /// Write an HTML report with every chart
    #[arg(long, value_name = "OUT")]
    html: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "text")]
    format: OutputFormat,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for reports.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Preview tables and outcomes (default)
    #[default]
    Text,
    /// JSON reports
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    let source = match (&cli.source, &cli.url) {
        (Some(arg), _) => WorkbookSource::parse(arg),
        (None, Some(url)) => WorkbookSource::Url(url.clone()),
        (None, None) => {
            // No source - show help
            Cli::parse_from(["sheetviz", "--help"]);
            return Ok(());
        }
    };

    let updates = cli
        .selections
        .iter()
        .map(String::as_str)
        .map(parse_select)
        .collect::<Result<Vec<_>>>()?;

    let client = HttpClient::with_timeout(cli.timeout).context("Failed to create HTTP client")?;
    let loader = HttpLoader::with_parts(FileLoader::with_max_sheets(cli.max_sheets), client);

    // A load failure ends the run before any worksheet is rendered.
    let book = loader
        .load(&source)
        .await
        .with_context(|| format!("Failed to load workbook: {}", source.describe()))?;

    let mut selections = SelectionState::new();
    for (sheet_name, update) in &updates {
        let sheet = book
            .get_sheet(sheet_name)
            .with_context(|| format!("Invalid --select for sheet '{sheet_name}'"))?;
        selections.apply(sheet, update);
    }

    let reports = visualize_book_with_limit(&book, &selections, cli.max_sheets);

    match cli.format {
        OutputFormat::Text => print_text(&book, &reports, cli.rows),
        OutputFormat::Json => {
            let output = JsonOutput {
                workbook: book.name(),
                sheets: &reports,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if let Some(path) = &cli.html {
        std::fs::write(path, html_report(book.name(), &reports))
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "Wrote HTML report");
        if matches!(cli.format, OutputFormat::Text) {
            println!("{} {}", "Report written to".green(), path.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    workbook: &'a str,
    sheets: &'a [SheetReport],
}

/// Parse `SHEET:x=A,y=B,z=C,kind=line` into a worksheet name and update.
fn parse_select(arg: &str) -> Result<(String, SelectionUpdate)> {
    let (sheet, pairs) = arg
        .split_once(':')
        .with_context(|| format!("Invalid selection: '{arg}'. Expected SHEET:KEY=VALUE,..."))?;
    if sheet.is_empty() {
        bail!("Invalid selection: '{arg}'. Sheet name is empty");
    }

    let mut update = SelectionUpdate::default();
    for pair in pairs.split(',').filter(|p| !p.trim().is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("Invalid selection entry: '{pair}'. Expected KEY=VALUE"))?;
        let value = value.trim().to_string();
        match key.trim().to_ascii_lowercase().as_str() {
            "x" => update.x = Some(value),
            "y" => update.y = Some(value),
            "z" => update.z = Some(value),
            "kind" => update.kind = Some(value.parse::<ChartKind>()?),
            other => bail!("Unknown selection key '{other}' (expected x, y, z or kind)"),
        }
    }

    if update.is_empty() {
        bail!("Invalid selection: '{arg}'. Nothing selected");
    }

    Ok((sheet.to_string(), update))
}

fn print_text(book: &Book, reports: &[SheetReport], rows: usize) {
    let rendered = reports.iter().filter(|r| r.outcome.is_rendered()).count();
    println!(
        "{} {} ({} sheets, {} charts)",
        "Workbook:".cyan().bold(),
        book.name(),
        reports.len(),
        rendered
    );

    for report in reports {
        println!();
        println!("{}", format!("Sheet: {}", report.sheet).cyan().bold());

        if let Ok(sheet) = book.get_sheet_by_index(report.index) {
            if !sheet.is_empty() && rows > 0 {
                println!("{}", format_preview(sheet, rows));
            }
        }

        if let Some(selection) = &report.selection {
            println!(
                "  x={} y={} z={} kind={}",
                selection.x,
                selection.y,
                selection.z_label(),
                selection.kind.as_str()
            );
        }

        match &report.outcome {
            SheetOutcome::Rendered(chart) => {
                let mut line = format!("  {} ({} points", chart.title, chart.len());
                if chart.skipped_rows > 0 {
                    line.push_str(&format!(", {} rows skipped", chart.skipped_rows));
                }
                line.push(')');
                println!("{}", line.green());
            }
            SheetOutcome::Warning(_) => {
                println!(
                    "  {} {}",
                    "Warning:".yellow().bold(),
                    report.message().unwrap_or_default()
                );
            }
            SheetOutcome::Failed(_) => {
                println!(
                    "  {} {}",
                    "Error:".red().bold(),
                    report.message().unwrap_or_default()
                );
            }
        }
    }
}

/// Render the first `rows` data rows as an aligned text table.
fn format_preview(sheet: &Sheet, rows: usize) -> String {
    let header: Vec<String> = sheet.column_names().to_vec();
    let body: Vec<Vec<String>> = sheet
        .head(rows)
        .iter()
        .map(|row| row.iter().map(|cell| cell.as_str()).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("  {}", padded.join(" | ").trim_end())
    };

    let mut out = vec![format_row(&header)];
    out.push(format!(
        "  {}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    ));
    out.extend(body.iter().map(|row| format_row(row)));

    if sheet.row_count() > rows {
        out.push(format!("  ... {} more rows", sheet.row_count() - rows));
    }

    out.join("\n")
}

/// One HTML page with a section per worksheet.
fn html_report(workbook: &str, reports: &[SheetReport]) -> String {
    let sections: String = reports
        .iter()
        .map(|report| {
            let content = match &report.outcome {
                SheetOutcome::Rendered(chart) => {
                    chart.to_html_fragment(&format!("chart-{}", report.index))
                }
                SheetOutcome::Warning(_) => format!(
                    "<p class=\"warning\">{}</p>",
                    escape_html(&report.message().unwrap_or_default())
                ),
                SheetOutcome::Failed(_) => format!(
                    "<p class=\"error\">{}</p>",
                    escape_html(&report.message().unwrap_or_default())
                ),
            };
            format!(
                "<section>\n<h2>Sheet: {}</h2>\n{content}\n</section>\n",
                escape_html(&report.sheet)
            )
        })
        .collect();

    let title = escape_html(workbook);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="{PLOTLY_CDN}"></script>
    <style>
        .chart {{ width: 100%; height: 520px; }}
        .warning {{ background: #fff4ce; padding: 0.5rem; }}
        .error {{ background: #fde7e9; padding: 0.5rem; }}
    </style>
</head>
<body>
<h1>{title}</h1>
{sections}</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetviz_core::AxisSelection;
    use sheetviz_sheet::CellValue;

    fn sample_book() -> Book {
        let mut book = Book::with_name("sample");
        let mut numbers = Sheet::from_data(vec![vec!["A", "B"]]);
        for i in 1..=4_i64 {
            numbers
                .row_append(vec![CellValue::Int(i), CellValue::Int(i * i)])
                .unwrap();
        }
        book.add_sheet("Numbers", numbers).unwrap();
        book.add_sheet("Empty", Sheet::from_data(vec![vec!["A"]]))
            .unwrap();
        book
    }

    #[test]
    fn test_parse_select() {
        let (sheet, update) = parse_select("Sales:x=Month,y=Total,kind=line").unwrap();
        assert_eq!(sheet, "Sales");
        assert_eq!(update.x.as_deref(), Some("Month"));
        assert_eq!(update.y.as_deref(), Some("Total"));
        assert_eq!(update.z, None);
        assert_eq!(update.kind, Some(ChartKind::Line));
    }

    #[test]
    fn test_parse_select_3d() {
        let (_, update) = parse_select("Data:z=C,kind=3d").unwrap();
        assert_eq!(update.z.as_deref(), Some("C"));
        assert_eq!(update.kind, Some(ChartKind::Scatter3d));
    }

    #[test]
    fn test_parse_select_errors() {
        assert!(parse_select("no-colon").is_err());
        assert!(parse_select(":x=A").is_err());
        assert!(parse_select("Sheet:x").is_err());
        assert!(parse_select("Sheet:w=A").is_err());
        assert!(parse_select("Sheet:kind=pie").is_err());
        assert!(parse_select("Sheet:").is_err());
    }

    #[test]
    fn test_format_preview() {
        let book = sample_book();
        let sheet = book.get_sheet("Numbers").unwrap();
        let preview = format_preview(sheet, 2);
        let lines: Vec<&str> = preview.lines().collect();

        assert_eq!(lines[0], "  A | B");
        assert_eq!(lines[1], "  --+--");
        assert_eq!(lines[2], "  1 | 1");
        assert_eq!(lines[3], "  2 | 4");
        assert_eq!(lines[4], "  ... 2 more rows");
    }

    #[test]
    fn test_html_report_sections() {
        let book = sample_book();
        let mut selections = SelectionState::new();
        selections.set("Numbers", AxisSelection::new("A", "B"));
        let reports = visualize_book_with_limit(&book, &selections, MAX_SHEETS);

        let html = html_report("sample <book>", &reports);
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("<title>sample &lt;book&gt;</title>"));
        assert!(html.contains("Plotly.newPlot('chart-0'"));
        assert!(html.contains("The sheet &#39;Empty&#39; is empty."));
    }

    #[test]
    fn test_json_output_shape() {
        let book = sample_book();
        let reports = visualize_book_with_limit(&book, &SelectionState::new(), MAX_SHEETS);
        let output = JsonOutput {
            workbook: book.name(),
            sheets: &reports,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["workbook"], "sample");
        assert_eq!(json["sheets"][0]["outcome"]["status"], "rendered");
        assert_eq!(json["sheets"][1]["outcome"]["reason"], "empty_sheet");
    }
}
