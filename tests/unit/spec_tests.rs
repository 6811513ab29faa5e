// Watermark spec and layout unit tests

use batchmark::watermark::*;

#[test]
fn test_position_parses_from_cli_strings() {
    assert_eq!(
        "bottom_right".parse::<WatermarkPosition>().unwrap(),
        WatermarkPosition::BottomRight
    );
    assert_eq!(
        "Top-Left".parse::<WatermarkPosition>().unwrap(),
        WatermarkPosition::TopLeft
    );
    assert!("somewhere".parse::<WatermarkPosition>().is_err());
}

#[test]
fn test_defaults_follow_slider_defaults() {
    let spec = WatermarkSpec::text("x");
    assert_eq!(spec.size_fraction, 0.1);
    assert_eq!(spec.opacity, 0.7);
    assert_eq!(spec.rotation_degrees, 0.0);
    assert_eq!(spec.position, WatermarkPosition::Center);
    assert!(spec.auto_color);
}

#[test]
fn test_every_position_stays_inside_image() {
    let image = ImageDimensions::new(640, 480);
    let watermark = WatermarkDimensions::new(200, 100);
    for position in WatermarkPosition::ALL {
        let at = compute_position(&image, &watermark, position);
        assert!(at.x >= 0 && at.y >= 0, "{:?}", position);
        assert!(at.x + 200 <= 640, "{:?}", position);
        assert!(at.y + 100 <= 480, "{:?}", position);
    }
}

#[test]
fn test_text_size_bounds() {
    for (w, h) in [(50, 50), (300, 200), (4000, 3000)] {
        let image = ImageDimensions::new(w, h);
        let ceiling = (image.diagonal() * 0.2) as u32;
        let mut last = 0;
        for step in 1..=50 {
            let size = compute_text_size(&image, step as f32 / 100.0);
            assert!(size >= 24);
            assert!(size <= ceiling.max(24));
            assert!(size >= last);
            last = size;
        }
    }
}
