//! Running a batch in the background.

use super::{BatchError, BatchProcessor, BatchProgress, BatchSummary, CancellationFlag};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A batch running on the blocking thread pool.
#[derive(Debug)]
pub struct BatchHandle {
    progress: watch::Receiver<Option<BatchProgress>>,
    cancel: CancellationFlag,
    task: JoinHandle<Result<BatchSummary, BatchError>>,
}

impl BatchHandle {
    /// Latest progress event; `None` until the first file is handled.
    pub fn progress(&self) -> watch::Receiver<Option<BatchProgress>> {
        self.progress.clone()
    }

    /// Ask the batch to stop before its next file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the batch to finish.
    pub async fn wait(self) -> Result<BatchSummary, BatchError> {
        self.task
            .await
            .map_err(|e| BatchError::Join(e.to_string()))?
    }
}

impl BatchProcessor {
    /// Start the batch without blocking the caller.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self: Arc<Self>) -> BatchHandle {
        self.spawn_with_cancellation(CancellationFlag::new())
    }

    /// Start the batch in the background, stopping once `cancel` is set.
    pub fn spawn_with_cancellation(self: Arc<Self>, cancel: CancellationFlag) -> BatchHandle {
        let (tx, rx) = watch::channel(None);
        let flag = cancel.clone();

        let task = tokio::task::spawn_blocking(move || {
            self.run_with_progress(&flag, &mut |progress| {
                let _ = tx.send(Some(progress.clone()));
            })
        });

        BatchHandle {
            progress: rx,
            cancel,
            task,
        }
    }
}
