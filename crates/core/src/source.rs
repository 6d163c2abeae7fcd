//! Workbook sources and the loader contract.

use crate::error::LoadError;
use async_trait::async_trait;
use sheetviz_sheet::{Book, XlsxReadOptions};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Only this many leading worksheets of a workbook are kept.
pub const MAX_SHEETS: usize = 6;

/// Where a workbook comes from.
#[derive(Clone)]
pub enum WorkbookSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// Uploaded content; `name` is the original file name.
    Bytes { name: String, data: Vec<u8> },
    /// A remote workbook fetched over HTTP(S).
    Url(String),
}

impl WorkbookSource {
    /// Interpret a command-line style argument: `http://` and `https://`
    /// prefixes are URLs, anything else is a path.
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        let lower = arg.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    /// Short human readable description for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes { name, data } => format!("{name} ({} bytes uploaded)", data.len()),
            Self::Url(url) => url.clone(),
        }
    }
}

impl fmt::Debug for WorkbookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes { name, data } => f
                .debug_struct("Bytes")
                .field("name", name)
                .field("len", &data.len())
                .finish(),
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

/// Produces a [`Book`] from a [`WorkbookSource`].
///
/// Implementations never retry; any failure is returned as a [`LoadError`].
#[async_trait]
pub trait WorkbookLoader: Send + Sync {
    /// Load a workbook, keeping at most the loader's sheet limit.
    async fn load(&self, source: &WorkbookSource) -> Result<Book, LoadError>;
}

/// Loads workbooks from local paths and uploaded bytes.
#[derive(Debug, Clone)]
pub struct FileLoader {
    max_sheets: usize,
}

impl FileLoader {
    /// Create a loader keeping the first [`MAX_SHEETS`] worksheets.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_sheets(MAX_SHEETS)
    }

    /// Create a loader with a custom worksheet limit.
    #[must_use]
    pub fn with_max_sheets(max_sheets: usize) -> Self {
        Self { max_sheets }
    }

    /// The worksheet limit applied on load.
    #[must_use]
    pub fn max_sheets(&self) -> usize {
        self.max_sheets
    }

    fn options(&self) -> XlsxReadOptions {
        XlsxReadOptions::default().with_max_sheets(self.max_sheets)
    }

    /// Load a workbook file.
    pub fn load_path(&self, path: &Path) -> Result<Book, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let book = Book::from_xlsx_with_options(path, self.options())?;
        info!(
            path = %path.display(),
            sheets = book.sheet_count(),
            "Loaded workbook from file"
        );
        Ok(book)
    }

    /// Load a workbook from in-memory content.
    pub fn load_bytes(&self, name: &str, data: &[u8]) -> Result<Book, LoadError> {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);

        let book = Book::from_xlsx_bytes(stem, data, self.options())?;
        info!(
            name,
            bytes = data.len(),
            sheets = book.sheet_count(),
            "Loaded workbook from bytes"
        );
        Ok(book)
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLoader {
    /// Load a workbook file on the blocking thread pool.
    pub async fn read_path(&self, path: PathBuf) -> Result<Book, LoadError> {
        let loader = self.clone();
        run_blocking(move || loader.load_path(&path)).await
    }

    /// Load workbook content on the blocking thread pool.
    pub async fn read_bytes(&self, name: String, data: Vec<u8>) -> Result<Book, LoadError> {
        let loader = self.clone();
        run_blocking(move || loader.load_bytes(&name, &data)).await
    }
}

/// Spreadsheet parsing is CPU-bound; keep it off the async workers.
async fn run_blocking<F>(parse: F) -> Result<Book, LoadError>
where
    F: FnOnce() -> Result<Book, LoadError> + Send + 'static,
{
    tokio::task::spawn_blocking(parse)
        .await
        .map_err(|e| LoadError::Task(e.to_string()))?
}

#[async_trait]
impl WorkbookLoader for FileLoader {
    async fn load(&self, source: &WorkbookSource) -> Result<Book, LoadError> {
        match source {
            WorkbookSource::Path(path) => self.read_path(path.clone()).await,
            WorkbookSource::Bytes { name, data } => {
                self.read_bytes(name.clone(), data.clone()).await
            }
            WorkbookSource::Url(url) => Err(LoadError::Unsupported(format!(
                "remote workbooks need an HTTP-capable loader: {url}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert!(matches!(
            WorkbookSource::parse("https://example.com/data.xlsx"),
            WorkbookSource::Url(_)
        ));
        assert!(matches!(
            WorkbookSource::parse("HTTP://example.com/data.xlsx"),
            WorkbookSource::Url(_)
        ));
        assert!(matches!(
            WorkbookSource::parse("reports/data.xlsx"),
            WorkbookSource::Path(_)
        ));
    }

    #[test]
    fn test_bytes_debug_hides_content() {
        let source = WorkbookSource::Bytes {
            name: "up.xlsx".to_string(),
            data: vec![0; 4],
        };
        let debug = format!("{source:?}");
        assert!(debug.contains("len: 4"));
        assert_eq!(source.describe(), "up.xlsx (4 bytes uploaded)");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_blocking_parse_reports_errors() {
        let loader = FileLoader::new();

        let result = loader
            .read_bytes("junk.xlsx".to_string(), b"not a workbook".to_vec())
            .await;
        assert!(matches!(result, Err(LoadError::Malformed(_))));

        let result = loader.read_path(PathBuf::from("/no/such/file.xlsx")).await;
        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(FileLoader::default().max_sheets(), MAX_SHEETS);
        assert_eq!(FileLoader::with_max_sheets(2).max_sheets(), 2);
    }
}
