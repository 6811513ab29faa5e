// Background runs with progress and cancellation

use super::test_harness::*;
use batchmark::batch::{BatchError, CancellationFlag};
use batchmark::watermark::WatermarkSpec;
use std::sync::Arc;

const WHITE: [u8; 4] = [255, 255, 255, 255];

#[tokio::test]
async fn test_spawned_batch_reports_progress_and_summary() {
    let ws = Workspace::new();
    for name in ["a.png", "b.png", "c.png"] {
        ws.add_image(name, 80, 60, WHITE);
    }

    let handle = Arc::new(ws.processor(WatermarkSpec::text("BG"))).spawn();
    let progress = handle.progress();
    let summary = handle.wait().await.unwrap();

    assert_eq!(summary.succeeded_count(), 3);
    assert!(!summary.cancelled);
    let last = progress.borrow().clone().expect("no progress reported");
    assert_eq!((last.index, last.total), (3, 3));
    assert_eq!(last.file_name, "c.png");
    assert_eq!(ws.output_names().len(), 3);
}

#[tokio::test]
async fn test_pre_cancelled_batch_writes_nothing() {
    let ws = Workspace::new();
    for i in 0..5 {
        ws.add_image(&format!("img{}.png", i), 50, 50, WHITE);
    }

    let cancel = CancellationFlag::new();
    cancel.cancel();
    let handle = Arc::new(ws.processor(WatermarkSpec::text("x"))).spawn_with_cancellation(cancel);
    let summary = handle.wait().await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.total, 5);
    assert_eq!(summary.processed(), 0);
    assert!(ws.output_names().is_empty());
}

#[tokio::test]
async fn test_cancel_mid_run_keeps_finished_files() {
    let ws = Workspace::new();
    for i in 0..20 {
        ws.add_image(&format!("img{:02}.png", i), 200, 150, WHITE);
    }

    let handle = Arc::new(ws.processor(WatermarkSpec::text("STOP"))).spawn();
    let mut progress = handle.progress();
    progress
        .wait_for(|p| p.is_some())
        .await
        .expect("batch ended without progress");
    handle.cancel();

    let summary = handle.wait().await.unwrap();
    assert!(summary.processed() >= 1);
    assert!(summary.cancelled || summary.processed() == 20);
    assert_eq!(ws.output_names().len(), summary.succeeded_count());
}

#[tokio::test]
async fn test_spawned_config_error_is_returned() {
    let ws = Workspace::new();
    let handle = Arc::new(ws.processor(WatermarkSpec::text(""))).spawn();
    assert!(matches!(handle.wait().await, Err(BatchError::Config(_))));
}
