//! Document-to-image conversion primitives for the Pagemill service
//!
//! Rasterization is delegated wholesale to an external tool (poppler's
//! `pdftoppm` in production); this crate owns everything around that call:
//!
//! - `store`: where uploads land and how stored documents are named
//! - `job`: the per-request conversion job and its output-directory layout
//! - `raster`: the injectable rasterization capability and its poppler impl

pub mod error;
pub mod job;
pub mod raster;
pub mod store;

pub use error::PagemillError;
pub use job::{stored_document_name, ConversionJob};
pub use raster::{PageRasterizer, PopplerRasterizer, RasterFormat, RasterOptions};
pub use store::UploadStore;
