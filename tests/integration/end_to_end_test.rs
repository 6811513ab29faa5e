// End-to-end rendering through the batch pipeline

use super::test_harness::*;
use batchmark::batch::BatchProcessor;
use batchmark::watermark::{
    RendererOptions, TextFont, WatermarkPosition, WatermarkRenderer, WatermarkSpec, EDGE_MARGIN,
};
use image::{Rgba, RgbaImage};

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn is_ink(p: &Rgba<u8>) -> bool {
    p[0] < 128
}

#[test]
fn test_dark_text_anchored_bottom_right_on_white() {
    let ws = Workspace::new();
    ws.add_image("white.png", 1000, 1000, WHITE);

    let spec = WatermarkSpec::text("TEST")
        .with_position(WatermarkPosition::BottomRight)
        .with_size_fraction(0.1)
        .with_opacity(1.0)
        .with_rotation(0.0);
    // Whatever font the machine offers, including the built-in fallback.
    let processor = BatchProcessor::new(ws.job(spec), &RendererOptions::default());
    let summary = processor.run().unwrap();
    assert_eq!(summary.succeeded, vec!["white.png"]);

    let output = image::open(ws.output().join("white.png"))
        .unwrap()
        .to_rgba8();
    let (min_x, min_y, max_x, max_y) = bbox_where(&output, is_ink).expect("no dark text drawn");

    let edge = 1000 - EDGE_MARGIN as u32;
    assert!(max_x < edge && max_y < edge, "text crosses the margin");
    assert!(max_x + 8 >= edge, "text not anchored right: {}", max_x);
    assert!(max_y + 8 >= edge, "text not anchored at bottom: {}", max_y);
    assert!(min_x > 300 && min_y > 500, "text should sit in the bottom-right");

    // Darkest pixel of the text is clearly dark.
    let darkest = output
        .pixels()
        .map(|p| (p[0] as u32 * 299 + p[1] as u32 * 587 + p[2] as u32 * 114) / 1000)
        .min()
        .unwrap();
    assert!(darkest < 60, "darkest brightness {}", darkest);
}

#[test]
fn test_every_position_keeps_text_inside_the_margin() {
    let renderer = WatermarkRenderer::with_font(TextFont::Builtin);
    let source = RgbaImage::from_pixel(1000, 1000, Rgba(WHITE));
    let margin = EDGE_MARGIN as u32;

    for position in WatermarkPosition::ALL {
        let spec = WatermarkSpec::text("TEST")
            .with_position(position)
            .with_opacity(1.0);
        let output = renderer.render(&source, &spec);
        let (min_x, min_y, max_x, max_y) =
            bbox_where(&output, is_ink).unwrap_or_else(|| panic!("{:?}: no ink", position));

        assert!(min_x >= margin && min_y >= margin, "{:?}", position);
        assert!(max_x < 1000 - margin && max_y < 1000 - margin, "{:?}", position);
    }
}

#[test]
fn test_dark_background_gets_light_text() {
    let renderer = WatermarkRenderer::with_font(TextFont::Builtin);
    let source = RgbaImage::from_pixel(400, 300, Rgba([10, 10, 10, 255]));
    let spec = WatermarkSpec::text("TEST").with_opacity(1.0);

    let output = renderer.render(&source, &spec);
    let brightest = output.pixels().map(|p| p[0]).max().unwrap();
    assert_eq!(brightest, 255, "pale yellow text expected");
}

#[test]
fn test_multiline_text_is_taller_than_single_line() {
    let renderer = WatermarkRenderer::with_font(TextFont::Builtin);
    let source = RgbaImage::from_pixel(800, 800, Rgba(WHITE));

    let single = renderer.render(&source, &WatermarkSpec::text("LINE").with_opacity(1.0));
    let double = renderer.render(
        &source,
        &WatermarkSpec::text("LINE\nLINE").with_opacity(1.0),
    );

    let (_, y0, _, y1) = bbox_where(&single, is_ink).unwrap();
    let (_, d0, _, d1) = bbox_where(&double, is_ink).unwrap();
    assert!(d1 - d0 > (y1 - y0) * 2 - 4);
}

#[test]
fn test_rotated_text_is_not_clipped_to_original_extent() {
    let renderer = WatermarkRenderer::with_font(TextFont::Builtin);
    let source = RgbaImage::from_pixel(600, 600, Rgba(WHITE));
    let spec = WatermarkSpec::text("ROTATE").with_opacity(1.0);

    let flat = renderer.render(&source, &spec);
    let turned = renderer.render(&source, &spec.clone().with_rotation(90.0));

    let (fx0, fy0, fx1, fy1) = bbox_where(&flat, is_ink).unwrap();
    let (tx0, ty0, tx1, ty1) = bbox_where(&turned, is_ink).unwrap();
    let (flat_w, flat_h) = (fx1 - fx0, fy1 - fy0);
    let (turned_w, turned_h) = (tx1 - tx0, ty1 - ty0);

    // A quarter turn swaps the extents (within resampling error).
    assert!(turned_w.abs_diff(flat_h) <= 3, "{} vs {}", turned_w, flat_h);
    assert!(turned_h.abs_diff(flat_w) <= 3, "{} vs {}", turned_h, flat_w);
}
