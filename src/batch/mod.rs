//! Batch watermarking of a folder of images.
//!
//! A [`BatchJob`] names the input folder, the output folder and the
//! [`WatermarkSpec`](crate::watermark::WatermarkSpec) applied to every file.
//! [`BatchProcessor::run`] handles the files in the calling thread;
//! [`BatchProcessor::spawn`] moves the run onto tokio's blocking pool and
//! returns a [`BatchHandle`] for progress, cancellation and the summary.

pub mod error;
pub mod handle;
pub mod job;
pub mod processor;
pub mod progress;

pub use error::BatchError;
pub use handle::BatchHandle;
pub use job::{enumerate_inputs, BatchJob};
pub use processor::{BatchProcessor, BatchState};
pub use progress::{BatchProgress, BatchSummary, CancellationFlag, FileFailure};
