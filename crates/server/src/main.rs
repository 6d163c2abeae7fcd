//! # sheetviz-server
//!
//! Web dashboard for exploring the worksheets of a workbook.

mod page;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use sheetviz_core::{FileLoader, WorkbookSource, MAX_SHEETS};
use sheetviz_http::{HttpClient, HttpLoader, DEFAULT_TIMEOUT_SECS};
use state::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// sheetviz dashboard server
#[derive(Parser)]
#[command(name = "sheetviz-server")]
#[command(author, version, about = "Multi-sheet workbook visualizer", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    bind: String,

    /// Workbook to load at startup
    #[arg(short, long, conflicts_with = "url")]
    workbook: Option<PathBuf>,

    /// Remote workbook to fetch at startup
    #[arg(short, long)]
    url: Option<String>,

    /// Number of leading worksheets to keep
    #[arg(long, default_value_t = MAX_SHEETS)]
    max_sheets: usize,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = HttpClient::with_timeout(args.timeout).context("Failed to create HTTP client")?;
    let loader = HttpLoader::with_parts(FileLoader::with_max_sheets(args.max_sheets), client);
    let state = Arc::new(AppState::new(Arc::new(loader), args.max_sheets));

    let startup = match (args.workbook, args.url) {
        (Some(path), _) => Some(WorkbookSource::Path(path)),
        (None, Some(url)) => Some(WorkbookSource::Url(url)),
        (None, None) => None,
    };
    if let Some(source) = startup {
        // The dashboard shows the failure; keep serving.
        if let Err(e) = state.load(source).await {
            warn!(error = %e, "Startup workbook not loaded");
        }
    }

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "sheetviz-server listening");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
