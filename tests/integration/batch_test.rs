// Batch runs over real folders

use super::test_harness::*;
use batchmark::batch::{BatchError, BatchProgress, CancellationFlag};
use batchmark::watermark::{WatermarkPosition, WatermarkSpec};
use image::{Rgba, RgbaImage};

const WHITE: [u8; 4] = [255, 255, 255, 255];

#[test]
fn test_corrupt_file_is_reported_and_others_succeed() {
    let ws = Workspace::new();
    ws.add_image("a.png", 120, 90, WHITE);
    ws.add_image("b.jpg", 120, 90, WHITE);
    ws.add_image("c.bmp", 120, 90, WHITE);
    ws.add_file("d.webp", b"\x00\x01 this is not an image");

    let summary = ws.processor(WatermarkSpec::text("TEST")).run().unwrap();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded, vec!["a.png", "b.jpg", "c.bmp"]);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].file_name, "d.webp");
    assert!(!summary.failures[0].message.is_empty());
    assert_eq!(summary.output_folder, ws.output());
    assert_eq!(ws.output_names(), vec!["a.png", "b.jpg", "c.bmp"]);
}

#[test]
fn test_unwritable_output_is_a_per_file_failure() {
    let ws = Workspace::new();
    ws.add_image("a.png", 80, 60, WHITE);
    ws.add_image("b.png", 80, 60, WHITE);
    // a directory already sits where a.png would be written
    std::fs::create_dir_all(ws.output().join("a.png")).unwrap();

    let summary = ws.processor(WatermarkSpec::text("TEST")).run().unwrap();

    assert_eq!(summary.succeeded, vec!["b.png"]);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].file_name, "a.png");
    assert!(
        summary.failures[0].message.contains("I/O error"),
        "unexpected message: {}",
        summary.failures[0].message
    );
    assert!(ws.output().join("a.png").is_dir());
    assert!(ws.output().join("b.png").is_file());
}

#[test]
fn test_outputs_keep_names_and_formats() {
    let ws = Workspace::new();
    ws.add_image("photo.JPEG", 64, 48, WHITE);
    ws.add_image("scan.tiff", 64, 48, WHITE);
    ws.add_image("icon.webp", 64, 48, [0, 0, 0, 128]);

    let summary = ws.processor(WatermarkSpec::text("W")).run().unwrap();
    assert_eq!(summary.succeeded_count(), 3);
    assert_eq!(ws.output_names(), vec!["icon.webp", "photo.JPEG", "scan.tiff"]);

    let jpeg = image::open(ws.output().join("photo.JPEG")).unwrap();
    assert_eq!(jpeg.color(), image::ColorType::Rgb8);
    assert_eq!((jpeg.width(), jpeg.height()), (64, 48));

    let webp = image::open(ws.output().join("icon.webp"))
        .unwrap()
        .to_rgba8();
    // Untouched corner keeps its transparency.
    assert_eq!(webp.get_pixel(0, 0)[3], 128);
}

#[test]
fn test_empty_input_folder() {
    let ws = Workspace::new();
    ws.add_file("notes.txt", b"not an image");

    let summary = ws.processor(WatermarkSpec::text("TEST")).run().unwrap();
    assert!(summary.is_empty());
    assert_eq!(summary.processed(), 0);
}

#[test]
fn test_output_folder_is_created() {
    let ws = Workspace::new();
    ws.add_image("a.png", 40, 40, WHITE);
    let nested = ws.dir.path().join("deep").join("er").join("out");

    let processor = batchmark::batch::BatchProcessor::with_renderer(
        batchmark::batch::BatchJob::new(ws.input(), &nested, WatermarkSpec::text("x")),
        batchmark::watermark::WatermarkRenderer::with_font(
            batchmark::watermark::TextFont::Builtin,
        ),
    );
    processor.run().unwrap();
    assert!(nested.join("a.png").is_file());
}

#[test]
fn test_configuration_errors_stop_before_start() {
    let ws = Workspace::new();
    ws.add_image("a.png", 40, 40, WHITE);

    let result = ws.processor(WatermarkSpec::text("   ")).run();
    assert!(matches!(result, Err(BatchError::Config(_))));
    assert!(!ws.output().exists());
}

#[test]
fn test_progress_is_reported_in_name_order() {
    let ws = Workspace::new();
    for name in ["c.png", "a.png", "b.png"] {
        ws.add_image(name, 40, 40, WHITE);
    }

    let mut events = Vec::new();
    ws.processor(WatermarkSpec::text("x"))
        .run_with_progress(&CancellationFlag::new(), &mut |p| events.push(p.clone()))
        .unwrap();

    let expected: Vec<BatchProgress> = ["a.png", "b.png", "c.png"]
        .iter()
        .enumerate()
        .map(|(i, name)| BatchProgress {
            index: i + 1,
            total: 3,
            file_name: name.to_string(),
        })
        .collect();
    assert_eq!(events, expected);
}

#[test]
fn test_zero_opacity_leaves_images_identical() {
    let ws = Workspace::new();
    let source = RgbaImage::from_fn(80, 60, |x, y| Rgba([(x * 3) as u8, (y * 4) as u8, 77, 255]));
    source.save(ws.input().join("gradient.png")).unwrap();

    ws.processor(WatermarkSpec::text("HIDDEN").with_opacity(0.0))
        .run()
        .unwrap();

    let output = image::open(ws.output().join("gradient.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(output, source);
}

#[test]
fn test_image_watermark_honors_position() {
    let ws = Workspace::new();
    ws.add_image("photo.png", 100, 80, WHITE);
    let logo = ws.dir.path().join("logo.png");
    RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 255]))
        .save(&logo)
        .unwrap();

    let spec = WatermarkSpec::image(&logo)
        .with_size_fraction(0.5)
        .with_opacity(1.0)
        .with_position(WatermarkPosition::TopLeft);
    ws.processor(spec).run().unwrap();

    let output = image::open(ws.output().join("photo.png"))
        .unwrap()
        .to_rgba8();
    // 20x10 scaled so its long side is half of 80 -> 40x20 at the margin.
    let inside = output.get_pixel(40, 30);
    assert!(inside[0] > 250 && inside[1] < 5 && inside[2] < 5);
    assert_eq!(*output.get_pixel(10, 10), Rgba(WHITE));
    assert_eq!(*output.get_pixel(70, 60), Rgba(WHITE));
    assert_eq!(*output.get_pixel(61, 30), Rgba(WHITE));
}

#[test]
fn test_missing_watermark_asset_keeps_images_unchanged() {
    let ws = Workspace::new();
    ws.add_image("photo.png", 50, 50, WHITE);

    let summary = ws
        .processor(WatermarkSpec::image(ws.dir.path().join("missing.png")))
        .run()
        .unwrap();

    assert_eq!(summary.succeeded, vec!["photo.png"]);
    let output = image::open(ws.output().join("photo.png"))
        .unwrap()
        .to_rgba8();
    assert!(output.pixels().all(|p| *p == Rgba(WHITE)));
}
