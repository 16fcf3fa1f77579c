use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagemillError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Rasterization tool `{0}` not found on this host")]
    ToolMissing(String),

    #[error("Rasterization tool exited with {status}: {stderr}")]
    ToolFailed { status: ExitStatus, stderr: String },

    #[error("Document path has no usable file name: {0:?}")]
    InvalidDocumentPath(PathBuf),
}
