//! What a batch run works on.

use super::BatchError;
use crate::image_io::is_supported;
use crate::watermark::WatermarkSpec;
use std::path::{Path, PathBuf};

/// Input folder, output folder and the watermark applied to every file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub spec: WatermarkSpec,
}

impl BatchJob {
    pub fn new(
        input_folder: impl Into<PathBuf>,
        output_folder: impl Into<PathBuf>,
        spec: WatermarkSpec,
    ) -> Self {
        Self {
            input_folder: input_folder.into(),
            output_folder: output_folder.into(),
            spec,
        }
    }

    /// Check everything that must hold before a run starts.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.input_folder.as_os_str().is_empty() {
            return Err(BatchError::Config("Input folder is not set".to_string()));
        }
        if self.output_folder.as_os_str().is_empty() {
            return Err(BatchError::Config("Output folder is not set".to_string()));
        }
        if !self.input_folder.is_dir() {
            return Err(BatchError::Config(format!(
                "Input folder {} does not exist",
                self.input_folder.display()
            )));
        }
        self.spec.validate()?;
        Ok(())
    }
}

/// Supported image files directly inside `folder`, sorted by file name.
pub fn enumerate_inputs(folder: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let entries = std::fs::read_dir(folder).map_err(|source| BatchError::InputFolder {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BatchError::InputFolder {
            path: folder.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_supported(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// File name of `path` for reports.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
