//! Conversion job layout
//!
//! A job is the unit of work for one uploaded document: the stored file,
//! the sibling directory its page images go into, and the filename prefix
//! the rasterization tool stamps on each page.

use std::path::PathBuf;

use crate::error::PagemillError;

/// Build the stored filename for an uploaded document: `<timestamp>_<original>`.
pub fn stored_document_name(timestamp_millis: u64, original: &str) -> String {
    format!("{}_{}", timestamp_millis, original)
}

/// Reduce a client-supplied filename to its final path component.
///
/// Browsers normally send a bare filename, but nothing stops a client from
/// sending separators or traversal segments; those must never escape the
/// storage root. Falls back to `upload` when nothing usable remains.
pub fn client_basename(original: &str) -> &str {
    original
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty() && *part != "." && *part != "..")
        .unwrap_or("upload")
}

/// One document-to-images conversion, alive for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Stored document being converted.
    pub document: PathBuf,
    /// Directory the per-page images are written into.
    pub output_dir: PathBuf,
    /// Filename prefix the tool uses for page files (`<prefix>-<page>.<ext>`).
    pub prefix: String,
}

impl ConversionJob {
    /// Derive the job layout from a stored document path.
    ///
    /// The output directory sits next to the document and carries its file
    /// stem: `1000_report.pdf` converts into `1000_report/`. The final
    /// extension is dropped whatever it is, so `1000_REPORT.PDF` and
    /// `1000_scan.docx` follow the same rule. A document with no extension
    /// would collide with its own directory, so those get a `_pages` suffix.
    pub fn for_document(document: PathBuf) -> Result<Self, PagemillError> {
        let (file_name, stem) = match (
            document.file_name().and_then(|name| name.to_str()),
            document.file_stem().and_then(|stem| stem.to_str()),
        ) {
            (Some(name), Some(stem)) => (name.to_owned(), stem.to_owned()),
            _ => return Err(PagemillError::InvalidDocumentPath(document)),
        };

        let dir_name = if stem == file_name {
            format!("{}_pages", stem)
        } else {
            stem.clone()
        };
        let output_dir = document.with_file_name(&dir_name);

        Ok(Self {
            document,
            output_dir,
            prefix: stem,
        })
    }
}
