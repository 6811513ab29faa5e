//! Sequential batch processing.

use super::job::{display_name, enumerate_inputs};
use super::{BatchError, BatchJob, BatchProgress, BatchSummary, CancellationFlag, FileFailure};
use crate::image_io::{self, ImageError};
use crate::watermark::{RendererOptions, WatermarkRenderer, WatermarkSpec};
use image::RgbaImage;
use parking_lot::Mutex;
use std::path::Path;

/// Lifecycle of a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Applies one watermark to every supported image of a folder.
///
/// Files are handled one after another in name order. A file that fails is
/// recorded and skipped; only configuration problems and an output folder
/// that cannot be created stop the run.
#[derive(Debug)]
pub struct BatchProcessor {
    job: BatchJob,
    renderer: WatermarkRenderer,
    state: Mutex<BatchState>,
}

impl BatchProcessor {
    pub fn new(job: BatchJob, options: &RendererOptions) -> Self {
        Self::with_renderer(job, WatermarkRenderer::new(options))
    }

    pub fn with_renderer(job: BatchJob, renderer: WatermarkRenderer) -> Self {
        Self {
            job,
            renderer,
            state: Mutex::new(BatchState::Idle),
        }
    }

    pub fn job(&self) -> &BatchJob {
        &self.job
    }

    pub fn state(&self) -> BatchState {
        *self.state.lock()
    }

    /// Run the batch to completion.
    pub fn run(&self) -> Result<BatchSummary, BatchError> {
        self.run_with_progress(&CancellationFlag::new(), &mut |_| {})
    }

    /// Run the batch, reporting each handled file and stopping early once
    /// `cancel` is set.
    pub fn run_with_progress(
        &self,
        cancel: &CancellationFlag,
        on_progress: &mut dyn FnMut(&BatchProgress),
    ) -> Result<BatchSummary, BatchError> {
        // a rejected job never leaves Idle
        let spec = self.prepare()?;
        let guard = self.begin()?;
        let result = self.execute(&spec, cancel, on_progress);
        guard.finish(if result.is_ok() {
            BatchState::Completed
        } else {
            BatchState::Failed
        });
        result
    }

    /// Render the `index`-th input image (0-based, name order) without
    /// writing anything.
    pub fn preview(&self, index: usize) -> Result<RgbaImage, BatchError> {
        let spec = self.prepare()?;
        let files = enumerate_inputs(&self.job.input_folder)?;
        let path = files.get(index).ok_or(BatchError::PreviewIndex {
            index,
            total: files.len(),
        })?;

        let source = image_io::decode_rgba(path).map_err(|source| BatchError::Preview {
            file_name: display_name(path),
            source,
        })?;
        Ok(self.renderer.render(&source, &spec))
    }

    fn begin(&self) -> Result<RunGuard<'_>, BatchError> {
        let mut state = self.state.lock();
        if *state == BatchState::Running {
            return Err(BatchError::AlreadyRunning);
        }
        *state = BatchState::Running;
        Ok(RunGuard {
            state: &self.state,
            finished: false,
        })
    }

    fn prepare(&self) -> Result<WatermarkSpec, BatchError> {
        self.job.validate()?;
        Ok(self.job.spec.clone().normalized()?)
    }

    fn execute(
        &self,
        spec: &WatermarkSpec,
        cancel: &CancellationFlag,
        on_progress: &mut dyn FnMut(&BatchProgress),
    ) -> Result<BatchSummary, BatchError> {
        let files = enumerate_inputs(&self.job.input_folder)?;
        let output_folder = &self.job.output_folder;
        let mut summary = BatchSummary::new(output_folder.clone(), files.len());

        if files.is_empty() {
            tracing::info!(
                input = %self.job.input_folder.display(),
                "No supported images found"
            );
            return Ok(summary);
        }

        std::fs::create_dir_all(output_folder).map_err(|source| BatchError::OutputFolder {
            path: output_folder.clone(),
            source,
        })?;

        tracing::info!(
            input = %self.job.input_folder.display(),
            output = %output_folder.display(),
            files = files.len(),
            kind = ?spec.kind,
            "Starting batch"
        );

        for (i, path) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(processed = i, total = files.len(), "Batch cancelled");
                summary.cancelled = true;
                break;
            }

            let file_name = display_name(path);
            match self.process_file(path, &output_folder.join(&file_name), spec) {
                Ok(()) => {
                    tracing::debug!(file = %file_name, "Watermarked");
                    summary.succeeded.push(file_name.clone());
                }
                Err(e) => {
                    tracing::warn!(file = %file_name, error = %e, "Skipping file");
                    summary.failures.push(FileFailure {
                        file_name: file_name.clone(),
                        message: e.to_string(),
                    });
                }
            }

            on_progress(&BatchProgress {
                index: i + 1,
                total: files.len(),
                file_name,
            });
        }

        tracing::info!(
            succeeded = summary.succeeded_count(),
            failed = summary.failed_count(),
            cancelled = summary.cancelled,
            output = %output_folder.display(),
            "Batch finished"
        );
        Ok(summary)
    }

    fn process_file(
        &self,
        input: &Path,
        output: &Path,
        spec: &WatermarkSpec,
    ) -> Result<(), ImageError> {
        let source = image_io::decode_rgba(input)?;
        let stamped = self.renderer.render(&source, spec);
        image_io::write_image(&stamped, output)?;
        Ok(())
    }
}

/// Marks the processor `Failed` unless the run finishes normally.
struct RunGuard<'a> {
    state: &'a Mutex<BatchState>,
    finished: bool,
}

impl RunGuard<'_> {
    fn finish(mut self, outcome: BatchState) {
        *self.state.lock() = outcome;
        self.finished = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.state.lock() = BatchState::Failed;
        }
    }
}
