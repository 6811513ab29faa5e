//! Background color analysis.
//!
//! Samples the four corners and the center of an image to estimate the
//! background brightness, then picks a watermark color that contrasts with it.
//!
//! # Sampling regions
//!
//! - Four corners, each `width / 10` by `height / 10`
//! - The center, the middle third of the image on both axes
//!
//! The overall estimate is the unweighted mean of the five region means.

use super::{Color, WatermarkError};
use image::RgbaImage;

/// Below this brightness the background counts as dark.
pub const DARK_THRESHOLD: f32 = 128.0;

/// Channel standard deviation under which the background counts as gray.
pub const GRAY_STD_THRESHOLD: f32 = 20.0;

/// Watermark color on a dark, chromatically flat background.
pub const PALE_YELLOW: Color = Color::new(255, 255, 200);

/// Watermark color on a light, chromatically flat background.
pub const DARK_BLUE: Color = Color::new(0, 0, 100);

/// Result of background analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundAnalysis {
    /// Suggested watermark color.
    pub color: Color,
    /// Whether the sampled background is dark.
    pub is_dark: bool,
    /// Mean RGB over the sampled regions.
    pub mean: [f32; 3],
}

impl BackgroundAnalysis {
    /// Returned when sampling fails.
    pub fn fallback() -> Self {
        Self {
            color: Color::black(),
            is_dark: false,
            mean: [0.0; 3],
        }
    }
}

/// Analyze the background and return `(color, is_dark)`.
///
/// Never fails: sampling errors are logged and the fallback (black, not dark)
/// is returned instead.
pub fn analyze(image: &RgbaImage) -> (Color, bool) {
    let analysis = try_analyze(image).unwrap_or_else(|e| {
        tracing::warn!(
            error = %e,
            width = image.width(),
            height = image.height(),
            "Background analysis failed, using fallback color"
        );
        BackgroundAnalysis::fallback()
    });

    (analysis.color, analysis.is_dark)
}

/// Analyze the background, reporting degenerate images as errors.
pub fn try_analyze(image: &RgbaImage) -> Result<BackgroundAnalysis, WatermarkError> {
    let (width, height) = image.dimensions();
    let corner_w = width / 10;
    let corner_h = height / 10;

    if corner_w == 0 || corner_h == 0 {
        return Err(WatermarkError::AnalysisError(format!(
            "image {}x{} is too small to sample corners",
            width, height
        )));
    }

    let regions = [
        // top-left, top-right, bottom-left, bottom-right
        (0, 0, corner_w, corner_h),
        (width - corner_w, 0, width, corner_h),
        (0, height - corner_h, corner_w, height),
        (width - corner_w, height - corner_h, width, height),
        // center third
        (width / 3, height / 3, 2 * width / 3, 2 * height / 3),
    ];

    let mut sum = [0.0f32; 3];
    for (x0, y0, x1, y1) in regions {
        let region_mean = region_mean(image, x0, y0, x1, y1)?;
        for (acc, value) in sum.iter_mut().zip(region_mean) {
            *acc += value;
        }
    }
    let mean = sum.map(|s| s / regions.len() as f32);

    Ok(classify(mean))
}

/// Pick the watermark color for a mean background color.
pub fn classify(mean: [f32; 3]) -> BackgroundAnalysis {
    let brightness = mean.iter().sum::<f32>() / 3.0;
    let is_dark = brightness < DARK_THRESHOLD;

    let variance = mean.iter().map(|c| (c - brightness).powi(2)).sum::<f32>() / 3.0;
    let is_gray = variance.sqrt() < GRAY_STD_THRESHOLD;

    let color = match (is_dark, is_gray) {
        (true, true) => PALE_YELLOW,
        (false, true) => DARK_BLUE,
        (true, false) => Color::white(),
        (false, false) => Color::black(),
    };

    BackgroundAnalysis {
        color,
        is_dark,
        mean,
    }
}

/// Mean RGB of the half-open rectangle `[x0, x1) x [y0, y1)`.
fn region_mean(
    image: &RgbaImage,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
) -> Result<[f32; 3], WatermarkError> {
    let count = (x1.saturating_sub(x0) as u64) * (y1.saturating_sub(y0) as u64);
    if count == 0 {
        return Err(WatermarkError::AnalysisError(format!(
            "empty sample region ({}, {})..({}, {})",
            x0, y0, x1, y1
        )));
    }

    let mut sum = [0u64; 3];
    for y in y0..y1 {
        for x in x0..x1 {
            let pixel = image.get_pixel(x, y);
            sum[0] += pixel[0] as u64;
            sum[1] += pixel[1] as u64;
            sum[2] += pixel[2] as u64;
        }
    }

    Ok(sum.map(|s| (s as f64 / count as f64) as f32))
}
