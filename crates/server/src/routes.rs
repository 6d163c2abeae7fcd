//! Dashboard routes.

use crate::page::{index_page, sheet_page};
use crate::state::{AppError, SharedState};
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use sheetviz_core::{ChartKind, SelectionUpdate, WorkbookSource};
use sheetviz_sheet::Book;
use sheetviz_viz::{report_for, SheetReport};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Largest accepted upload.
const UPLOAD_LIMIT: usize = 50 * 1024 * 1024;

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create the application router.
///
/// This is separated from `main()` to allow testing.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/load/path", post(load_path))
        .route("/load/url", post(load_url))
        .route("/load/upload", post(load_upload))
        .route("/sheets/:index", get(sheet))
        .route("/api/sheets", get(api_sheets))
        .route("/api/sheets/:index/chart", get(api_chart))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<SharedState>) -> Html<String> {
    let session = state.session().read().await;
    Html(index_page(
        session.book.as_deref(),
        session.source.as_deref(),
        session.load_error.as_deref(),
        state.max_sheets(),
    ))
}

/// Load a workbook, then send the browser back to the dashboard.
///
/// A failed load answers 422 with the dashboard showing the error.
async fn finish_load(state: &SharedState, source: WorkbookSource) -> Response {
    match state.load(source).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(AppError::Load(_)) => {
            let session = state.session().read().await;
            let page = index_page(
                None,
                session.source.as_deref(),
                session.load_error.as_deref(),
                state.max_sheets(),
            );
            (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
struct PathForm {
    path: String,
}

async fn load_path(State(state): State<SharedState>, Form(form): Form<PathForm>) -> Response {
    let path = form.path.trim();
    if path.is_empty() {
        return AppError::BadRequest("path is required".to_string()).into_response();
    }
    finish_load(&state, WorkbookSource::Path(PathBuf::from(path))).await
}

#[derive(Deserialize)]
struct UrlForm {
    url: String,
}

async fn load_url(State(state): State<SharedState>, Form(form): Form<UrlForm>) -> Response {
    let url = form.url.trim();
    if url.is_empty() {
        return AppError::BadRequest("url is required".to_string()).into_response();
    }
    finish_load(&state, WorkbookSource::Url(url.to_string())).await
}

async fn load_upload(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("upload.xlsx").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.is_empty() {
            return Err(AppError::BadRequest("uploaded file is empty".to_string()));
        }

        return Ok(finish_load(
            &state,
            WorkbookSource::Bytes {
                name,
                data: data.to_vec(),
            },
        )
        .await);
    }

    Err(AppError::BadRequest("missing 'file' field".to_string()))
}

/// Selection controls as sent in a query string.
#[derive(Debug, Default, Deserialize)]
struct SelectionQuery {
    x: Option<String>,
    y: Option<String>,
    z: Option<String>,
    kind: Option<String>,
}

impl SelectionQuery {
    fn into_update(self) -> Result<SelectionUpdate, AppError> {
        let kind = self
            .kind
            .filter(|k| !k.trim().is_empty())
            .map(|k| k.parse::<ChartKind>())
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(SelectionUpdate {
            x: self.x.filter(|x| !x.is_empty()),
            y: self.y.filter(|y| !y.is_empty()),
            z: self.z,
            kind,
        })
    }
}

/// Apply the query to the worksheet's selection and visualize it.
async fn sheet_report(
    state: &SharedState,
    index: usize,
    query: SelectionQuery,
) -> Result<(Arc<Book>, SheetReport), AppError> {
    let update = query.into_update()?;

    let mut session = state.session().write().await;
    let book = session.book.clone().ok_or(AppError::NoWorkbook)?;
    if index >= state.max_sheets() {
        return Err(AppError::SheetNotFound(index));
    }
    let sheet = book
        .get_sheet_by_index(index)
        .map_err(|_| AppError::SheetNotFound(index))?;

    if !update.is_empty() {
        debug!(sheet = sheet.name(), ?update, "Selection changed");
        session.selections.apply(sheet, &update);
    }

    let report = report_for(index, sheet, &session.selections);
    Ok((Arc::clone(&book), report))
}

async fn sheet(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Query(query): Query<SelectionQuery>,
) -> Result<Html<String>, AppError> {
    let (book, report) = sheet_report(&state, index, query).await?;
    let sheet = book
        .get_sheet_by_index(index)
        .map_err(|_| AppError::SheetNotFound(index))?;
    Ok(Html(sheet_page(&book, sheet, &report, state.max_sheets())))
}

/// One retained worksheet in the API listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct SheetSummary {
    pub index: usize,
    pub name: String,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// API listing of the loaded workbook.
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkbookSummary {
    pub workbook: String,
    pub source: Option<String>,
    pub sheets: Vec<SheetSummary>,
}

async fn api_sheets(State(state): State<SharedState>) -> Result<Json<WorkbookSummary>, AppError> {
    let session = state.session().read().await;
    let book = session.book.as_ref().ok_or(AppError::NoWorkbook)?;

    let sheets = book
        .sheets()
        .take(state.max_sheets())
        .enumerate()
        .map(|(index, (name, sheet))| SheetSummary {
            index,
            name: name.clone(),
            rows: sheet.row_count(),
            columns: sheet.column_names().to_vec(),
        })
        .collect();

    Ok(Json(WorkbookSummary {
        workbook: book.name().to_string(),
        source: session.source.clone(),
        sheets,
    }))
}

async fn api_chart(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<SheetReport>, AppError> {
    let (_, report) = sheet_report(&state, index, query).await?;
    Ok(Json(report))
}
