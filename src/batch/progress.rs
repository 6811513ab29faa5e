//! Progress events, run summaries and cooperative cancellation.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Emitted after each file has been handled, successfully or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based position of the file in the run.
    pub index: usize,
    pub total: usize,
    pub file_name: String,
}

/// A file that could not be watermarked, with the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub file_name: String,
    pub message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub output_folder: PathBuf,
    /// Number of supported files found in the input folder.
    pub total: usize,
    pub succeeded: Vec<String>,
    pub failures: Vec<FileFailure>,
    /// Set when the run stopped early on request.
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn new(output_folder: PathBuf, total: usize) -> Self {
        Self {
            output_folder,
            total,
            succeeded: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
        }
    }

    /// No supported files were found.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn processed(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No supported images found");
        }
        write!(
            f,
            "{} of {} images watermarked into {}",
            self.succeeded_count(),
            self.total,
            self.output_folder.display()
        )?;
        if self.cancelled {
            write!(f, " (cancelled after {} files)", self.processed())?;
        }
        for failure in &self.failures {
            write!(f, "\n  failed: {}: {}", failure.file_name, failure.message)?;
        }
        Ok(())
    }
}

/// Shared flag asking a running batch to stop before its next file.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
