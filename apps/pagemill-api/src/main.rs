//! Pagemill API server
//!
//! Accepts PDF uploads over multipart form data, rasterizes every page to a
//! JPEG via poppler's `pdftoppm`, and serves the generated images back over
//! HTTP:
//!
//! - `POST /convert-pdf` - upload a document, get image URLs back
//! - `GET /uploads/<path>` - static access to documents and images
//! - `GET /health` - liveness probe
//!
//! All state (storage root, conversion tool, listen address) arrives via
//! command-line arguments; nothing is read from globals.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use pagemill_core::{PopplerRasterizer, RasterFormat, RasterOptions, UploadStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod handlers;
mod state;
mod urls;

use state::AppState;

/// Command-line arguments for the Pagemill server
#[derive(Parser, Debug)]
#[command(name = "pagemill-api")]
#[command(about = "PDF-to-image conversion server backed by poppler")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory uploaded documents and generated images are stored in
    #[arg(long, default_value = "uploads")]
    storage_dir: PathBuf,

    /// Rasterization tool executable
    #[arg(long, default_value = "pdftoppm")]
    pdftoppm: String,

    /// Render resolution in DPI (tool default when omitted)
    #[arg(long)]
    dpi: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the service router around shared state.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/convert-pdf", post(handlers::convert_pdf))
        .nest_service("/uploads", ServeDir::new(state.store.root()))
        // Uploads can be arbitrarily large PDFs; axum's 2 MB default would
        // reject most of them.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pagemill server on {}:{}", args.host, args.port);

    // Create shared state
    let store = UploadStore::open(&args.storage_dir)?;
    info!("Storage root: {}", store.root().display());

    let state = Arc::new(AppState::new(
        store,
        Arc::new(PopplerRasterizer::new(args.pdftoppm.as_str())),
        RasterOptions {
            format: RasterFormat::Jpeg,
            dpi: args.dpi,
        },
    ));

    let app = app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Conversion tool: {}", args.pdftoppm);

    axum::serve(listener, app).await?;

    Ok(())
}
