//! Shared dashboard state: the loaded workbook and the current selections.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sheetviz_core::{LoadError, SelectionState, WorkbookLoader, WorkbookSource};
use sheetviz_sheet::Book;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Handler errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No workbook loaded")]
    NoWorkbook,

    #[error("Sheet {0} not found")]
    SheetNotFound(usize),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NoWorkbook | Self::SheetNotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Load(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// Everything that changes during a session.
#[derive(Debug, Default)]
pub struct Session {
    pub book: Option<Arc<Book>>,
    /// Description of the workbook source, loaded or attempted.
    pub source: Option<String>,
    /// Message of the last failed load; cleared by a successful one.
    pub load_error: Option<String>,
    pub selections: SelectionState,
}

/// State shared by every handler.
pub struct AppState {
    loader: Arc<dyn WorkbookLoader>,
    max_sheets: usize,
    session: RwLock<Session>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(loader: Arc<dyn WorkbookLoader>, max_sheets: usize) -> Self {
        Self {
            loader,
            max_sheets,
            session: RwLock::new(Session::default()),
        }
    }

    pub fn max_sheets(&self) -> usize {
        self.max_sheets
    }

    pub fn session(&self) -> &RwLock<Session> {
        &self.session
    }

    /// Load a workbook, replacing the current one.
    ///
    /// A failed load drops the previous workbook so nothing stale is rendered.
    pub async fn load(&self, source: WorkbookSource) -> Result<Arc<Book>, AppError> {
        let description = source.describe();
        let result = self.loader.load(&source).await;

        let mut session = self.session.write().await;
        session.selections.clear();
        session.source = Some(description.clone());

        match result {
            Ok(book) => {
                let book = Arc::new(book);
                info!(source = %description, sheets = book.sheet_count(), "Workbook loaded");
                session.book = Some(Arc::clone(&book));
                session.load_error = None;
                Ok(book)
            }
            Err(e) => {
                error!(source = %description, error = %e, "Workbook load failed");
                session.book = None;
                session.load_error = Some(e.to_string());
                Err(AppError::Load(e))
            }
        }
    }

    /// The current workbook.
    pub async fn book(&self) -> Result<Arc<Book>, AppError> {
        self.session
            .read()
            .await
            .book
            .clone()
            .ok_or(AppError::NoWorkbook)
    }
}
