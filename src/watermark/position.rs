//! Position and size calculation for watermark placement.
//!
//! # Placement
//!
//! The nine [`WatermarkPosition`] values are decomposed into a horizontal and
//! a vertical component, and each axis is resolved on its own:
//!
//! - `left` / `top`: a fixed margin from the edge
//! - `right` / `bottom`: the watermark ends a fixed margin before the edge
//! - otherwise: centered
//!
//! # Sizing
//!
//! Text size is derived from the image diagonal so that the watermark looks
//! equally large on images of different resolution and aspect ratio.
//!
//! # Example
//!
//! ```
//! use batchmark::watermark::position::{compute_position, ImageDimensions, WatermarkDimensions};
//! use batchmark::watermark::WatermarkPosition;
//!
//! let image = ImageDimensions::new(800, 600);
//! let watermark = WatermarkDimensions::new(100, 50);
//!
//! let pos = compute_position(&image, &watermark, WatermarkPosition::BottomRight);
//! assert_eq!((pos.x, pos.y), (680, 530)); // 800 - 100 - 20, 600 - 50 - 20
//! ```

use super::{HorizontalAlign, VerticalAlign, WatermarkPosition};

/// Distance kept between a watermark and the image edge it is aligned to.
pub const EDGE_MARGIN: i32 = 20;

/// Smallest text size in pixels.
pub const MIN_TEXT_SIZE: f32 = 24.0;

/// Largest text size as a fraction of the image diagonal.
pub const MAX_TEXT_DIAGONAL_FRACTION: f64 = 0.2;

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn diagonal(&self) -> f64 {
        let w = self.width as f64;
        let h = self.height as f64;
        (w * w + h * h).sqrt()
    }

    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }
}

impl From<&image::RgbaImage> for ImageDimensions {
    fn from(image: &image::RgbaImage) -> Self {
        Self::new(image.width(), image.height())
    }
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

impl WatermarkDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left corner at which a watermark is placed.
///
/// Coordinates may be negative if the watermark is larger than the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Compute the anchor position of a watermark.
pub fn compute_position(
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
    position: WatermarkPosition,
) -> PlacementPosition {
    let img_w = image.width as i32;
    let img_h = image.height as i32;
    let wm_w = watermark.width as i32;
    let wm_h = watermark.height as i32;

    let x = match position.horizontal() {
        HorizontalAlign::Left => EDGE_MARGIN,
        HorizontalAlign::Right => img_w - wm_w - EDGE_MARGIN,
        HorizontalAlign::Center => (img_w - wm_w).div_euclid(2),
    };

    let y = match position.vertical() {
        VerticalAlign::Top => EDGE_MARGIN,
        VerticalAlign::Bottom => img_h - wm_h - EDGE_MARGIN,
        VerticalAlign::Middle => (img_h - wm_h).div_euclid(2),
    };

    PlacementPosition::new(x, y)
}

/// Compute the text size in pixels for an image.
///
/// `diagonal * size_fraction`, clamped to at least 24 px and at most 20% of
/// the diagonal. On images whose diagonal is under 120 px the 24 px floor wins.
pub fn compute_text_size(image: &ImageDimensions, size_fraction: f32) -> u32 {
    let diagonal = image.diagonal();
    let candidate = diagonal * size_fraction as f64;
    let max_size = diagonal * MAX_TEXT_DIAGONAL_FRACTION;

    candidate.min(max_size).max(MIN_TEXT_SIZE as f64) as u32
}

/// Scale an asset so that its longer side equals `min(image side) * size_fraction`.
///
/// The aspect ratio is preserved; neither side collapses below one pixel.
pub fn compute_image_size(
    image: &ImageDimensions,
    asset: &WatermarkDimensions,
    size_fraction: f32,
) -> WatermarkDimensions {
    let target_max = (image.min_side() as f64 * size_fraction as f64) as u32;
    let longest = asset.width.max(asset.height).max(1);
    let ratio = target_max as f64 / longest as f64;

    WatermarkDimensions::new(
        ((asset.width as f64 * ratio) as u32).max(1),
        ((asset.height as f64 * ratio) as u32).max(1),
    )
}
