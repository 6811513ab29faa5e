//! Error types for batch runs

use crate::image_io::ImageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a batch (or a preview) as a whole.
///
/// Failures of individual files are not errors of the batch; they are
/// collected in the summary.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("A batch is already running for this job")]
    AlreadyRunning,

    #[error("Cannot read input folder {path}: {source}")]
    InputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output folder {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preview index {index} out of range ({total} images found)")]
    PreviewIndex { index: usize, total: usize },

    #[error("Cannot load {file_name} for preview: {source}")]
    Preview {
        file_name: String,
        #[source]
        source: ImageError,
    },

    #[error("Batch task failed: {0}")]
    Join(String),
}

impl From<crate::watermark::WatermarkError> for BatchError {
    fn from(err: crate::watermark::WatermarkError) -> Self {
        BatchError::Config(err.to_string())
    }
}
