//! HTTP handlers for the Pagemill API

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Host, Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use pagemill_core::ConversionJob;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::urls;

/// Success body for `POST /convert-pdf`
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub images: Vec<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Handle GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "pagemill-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle POST /convert-pdf
///
/// Accepts one file under the `pdf` multipart field, stores it, rasterizes
/// every page through the configured capability, and answers with absolute
/// URLs for the generated images. A request with no usable file part is a
/// 400; any storage or conversion failure is a generic 500.
pub async fn convert_pdf(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
    headers: HeaderMap,
    multipart: Option<Multipart>,
) -> Result<Json<ConvertResponse>, ApiError> {
    // A request that is not multipart at all carries no file either.
    let Some(mut multipart) = multipart else {
        return Err(ApiError::MissingFile);
    };

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("pdf") {
            continue;
        }
        // A `pdf` field without a filename is a plain text field, not a file.
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes));
        break;
    }

    let (client_name, bytes) = upload.ok_or(ApiError::MissingFile)?;

    let document = state.store.save(&client_name, &bytes).await?;
    let job = ConversionJob::for_document(document)?;

    info!("Converting {}", job.document.display());

    let images = state
        .rasterizer
        .rasterize(&job, &state.raster_options)
        .await?;
    if images.is_empty() {
        warn!("Conversion produced no images in {}", job.output_dir.display());
    }

    let base_url = urls::request_base_url(&headers, &host);
    let images = urls::image_urls(&base_url, state.store.root(), &images);

    Ok(Json(ConvertResponse { images }))
}
