//! Rasterization capability
//!
//! Turning a document page into an image is fully delegated to an external
//! tool; nothing in this crate parses PDF. `PageRasterizer` is the seam the
//! HTTP layer calls through, so orchestration can be exercised without a
//! real tool on the host. `PopplerRasterizer` is the production
//! implementation, wrapping poppler's `pdftoppm`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::PagemillError;
use crate::job::ConversionJob;
use crate::store;

/// Raster formats the external tool can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
}

impl RasterFormat {
    /// Flag `pdftoppm` expects for this format.
    pub fn tool_flag(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "-jpeg",
            RasterFormat::Png => "-png",
        }
    }
}

/// Options forwarded to the rasterization tool for every page of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    pub format: RasterFormat,
    /// Render resolution override; `None` uses the tool's default.
    pub dpi: Option<u32>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            format: RasterFormat::Jpeg,
            dpi: None,
        }
    }
}

/// A capability that converts every page of a stored document into an image
/// file inside the job's output directory.
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Convert the job's document, returning the generated image paths.
    ///
    /// Implementations must either produce the full page set or fail; no
    /// partial result is ever returned.
    async fn rasterize(
        &self,
        job: &ConversionJob,
        options: &RasterOptions,
    ) -> Result<Vec<PathBuf>, PagemillError>;
}

/// `pdftoppm`-backed rasterizer.
///
/// Pages are written as `<output_dir>/<prefix>-<page>.<ext>` following
/// poppler's own naming; the exact convention is treated as opaque and the
/// generated set is read back from the output directory.
pub struct PopplerRasterizer {
    program: String,
}

impl PopplerRasterizer {
    /// Use the given executable as the conversion tool.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PopplerRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

#[async_trait]
impl PageRasterizer for PopplerRasterizer {
    async fn rasterize(
        &self,
        job: &ConversionJob,
        options: &RasterOptions,
    ) -> Result<Vec<PathBuf>, PagemillError> {
        store::ensure_dir(&job.output_dir).await?;

        let prefix = job.output_dir.join(&job.prefix);
        let mut command = Command::new(&self.program);
        command.arg(options.format.tool_flag());
        if let Some(dpi) = options.dpi {
            command.arg("-r").arg(dpi.to_string());
        }
        command.arg(&job.document).arg(&prefix);

        debug!("Invoking {} on {}", self.program, job.document.display());

        let output = command.output().await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                PagemillError::ToolMissing(self.program.clone())
            } else {
                PagemillError::Io(err)
            }
        })?;

        if !output.status.success() {
            return Err(PagemillError::ToolFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        store::list_files_sorted(&job.output_dir).await
    }
}
