//! Application state for the Pagemill API
//!
//! Everything the handlers need arrives here through the constructor;
//! nothing is read from globals, so tests can run against a temporary
//! storage root and an in-process rasterizer.

use std::sync::Arc;

use pagemill_core::{PageRasterizer, RasterOptions, UploadStore};

/// Shared application state
pub struct AppState {
    /// Storage root for uploaded documents and generated images
    pub store: UploadStore,
    /// Document-to-image capability invoked once per upload
    pub rasterizer: Arc<dyn PageRasterizer>,
    /// Options forwarded to the rasterizer on every job
    pub raster_options: RasterOptions,
}

impl AppState {
    pub fn new(
        store: UploadStore,
        rasterizer: Arc<dyn PageRasterizer>,
        raster_options: RasterOptions,
    ) -> Self {
        Self {
            store,
            rasterizer,
            raster_options,
        }
    }
}
