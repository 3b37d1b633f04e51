//! HSE inspection report server
//!
//! Thin HTTP front end over the report pipeline. Provides REST endpoints for:
//!
//! - Checklist catalog listing
//! - Report submission (PDF rendering + history record)
//! - Filtered history, CSV export and PDF download
//! - Dashboard counts per risk level

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use hse_report::{Catalog, ReportPipeline, ReportStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod handlers;
mod models;
mod state;

use state::AppState;

/// Uploads arrive base64-encoded inside the JSON body
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Command-line arguments for the HSE report server
#[derive(Parser, Debug)]
#[command(name = "hse-server")]
#[command(about = "HSE inspection report server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HSE_HOST", default_value = "127.0.0.1")]
    host: String,

    /// SQLite database holding the report history
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:hse_reports.db")]
    database_url: String,

    /// Directory generated PDFs are written to
    #[arg(long, env = "HSE_OUTPUT_DIR", default_value = "reports")]
    output_dir: PathBuf,

    /// Checklist catalog JSON; the built-in catalog is used when absent
    #[arg(long, env = "HSE_CATALOG")]
    catalog: Option<PathBuf>,

    /// Append a timestamp to PDF names so repeat inspections are kept
    #[arg(long, env = "HSE_UNIQUE_FILENAMES")]
    unique_filenames: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the API router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/job-types", get(handlers::list_job_types))
        .route(
            "/api/reports",
            post(handlers::create_report).get(handlers::list_reports),
        )
        .route("/api/reports/export.csv", get(handlers::export_reports))
        .route("/api/reports/:id/pdf", get(handlers::get_report_pdf))
        .route("/api/dashboard", get(handlers::dashboard))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = match &args.catalog {
        Some(path) => {
            info!("Loading checklist catalog from {}", path.display());
            Catalog::from_path(path)?
        }
        None => Catalog::builtin()?,
    };
    info!("Catalog has {} job types", catalog.job_types().len());

    let store = ReportStore::connect(&args.database_url).await?;
    let pipeline = ReportPipeline::new(catalog, store, &args.output_dir)
        .with_unique_filenames(args.unique_filenames);
    let state = Arc::new(AppState::new(pipeline));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Writing reports to {}", args.output_dir.display());

    axum::serve(listener, router(state)).await?;

    Ok(())
}
