//! # sheetviz-http
//!
//! HTTP client for fetching remote workbooks.
//!
//! [`HttpLoader`] handles every [`WorkbookSource`]: URLs are downloaded with
//! [`HttpClient`] and parsed from memory, paths and uploads go through
//! [`FileLoader`]. Supports HTTP/2 via ALPN negotiation with fallback to HTTP/1.1.

use async_trait::async_trait;
use reqwest::Client;
use sheetviz_core::{FileLoader, LoadError, WorkbookLoader, WorkbookSource};
use sheetviz_sheet::Book;
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for workbook downloads.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Constructs a new `HttpClient` with a 30-second timeout.
    ///
    /// Proxy discovery is disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use sheetviz_http::HttpClient;
    /// let client = HttpClient::new().expect("failed to create HttpClient");
    /// ```
    pub fn new() -> Result<Self, LoadError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Constructs an HttpClient configured with a custom per-request timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// let client = sheetviz_http::HttpClient::with_timeout(10).unwrap();
    /// ```
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(|e| LoadError::Http(e.to_string()))?;

        Ok(Self { client })
    }

    /// Download the body of a URL.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Http` if the request fails or the status is not a success.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        debug!(url, "Fetching workbook");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LoadError::Http(format!(
                "HTTP {} - {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LoadError::Http(format!("Failed to read response body: {e}")))?;

        Ok(bytes.to_vec())
    }
}

/// File name for a downloaded workbook: the last path segment of the URL.
fn file_name_from_url(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .unwrap_or("remote")
}

/// Loader for paths, uploads and remote URLs.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    files: FileLoader,
    client: HttpClient,
}

impl HttpLoader {
    /// Create a loader with the default sheet limit and timeout.
    pub fn new() -> Result<Self, LoadError> {
        Ok(Self::with_parts(FileLoader::new(), HttpClient::new()?))
    }

    /// Combine an existing file loader and client.
    #[must_use]
    pub fn with_parts(files: FileLoader, client: HttpClient) -> Self {
        Self { files, client }
    }

    /// The worksheet limit applied on load.
    #[must_use]
    pub fn max_sheets(&self) -> usize {
        self.files.max_sheets()
    }
}

#[async_trait]
impl WorkbookLoader for HttpLoader {
    async fn load(&self, source: &WorkbookSource) -> Result<Book, LoadError> {
        match source {
            WorkbookSource::Url(url) => {
                let data = self.client.fetch_bytes(url).await?;
                info!(url = %url, bytes = data.len(), "Downloaded workbook");
                self.files
                    .read_bytes(file_name_from_url(url).to_string(), data)
                    .await
            }
            other => self.files.load(other).await,
        }
    }
}
