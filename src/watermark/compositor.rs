//! Watermark layer compositing.
//!
//! A watermark is first painted onto a transparent layer the size of the
//! source image. The layer can then be faded, rotated and finally blended
//! over the source.
//!
//! # Rotation
//!
//! Rotating a same-size layer would clip whatever swings past the image
//! edges. Instead the layer is centered on a padded canvas (`margin` times
//! the image size), rotated there with the canvas size held fixed, and the
//! original extent is cropped back out of the middle. Rotation samples
//! bilinearly on premultiplied alpha.
//!
//! # Example
//!
//! ```ignore
//! use batchmark::watermark::compositor::{composite_over, rotate_padded, ROTATION_PADDING};
//!
//! let rotated = rotate_padded(&layer, 30.0, ROTATION_PADDING);
//! let result = composite_over(&source, &rotated)?;
//! ```

use super::position::PlacementPosition;
use super::WatermarkError;
use image::{imageops, Rgba, RgbaImage};
use imageproc::geometric_transformations::{
    rotate_about_center, warp_into, Interpolation, Projection,
};

/// Padding factor for the rotation canvas.
pub const ROTATION_PADDING: f32 = 1.5;

/// Create a fully transparent layer.
pub fn transparent_layer(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
}

/// Copy `watermark` onto `layer` with its top-left corner at `position`.
///
/// Pixels outside the layer are dropped. The layer is expected to be
/// transparent where the watermark lands.
pub fn place(layer: &mut RgbaImage, watermark: &RgbaImage, position: PlacementPosition) {
    imageops::replace(layer, watermark, position.x as i64, position.y as i64);
}

/// Multiply every pixel's alpha by `alpha / 255`.
///
/// Transparency already present in the watermark is preserved.
pub fn apply_opacity(image: &mut RgbaImage, alpha: u8) {
    for pixel in image.pixels_mut() {
        pixel[3] = ((pixel[3] as u16 * alpha as u16 + 127) / 255) as u8;
    }
}

/// Rotate a layer counter-clockwise by `degrees` without losing content
/// that swings past the original edges, up to the `margin` padding.
///
/// The result has the same dimensions as the input. Only the centered crop
/// of the padded canvas is sampled.
pub fn rotate_padded(layer: &RgbaImage, degrees: f32, margin: f32) -> RgbaImage {
    let (width, height) = layer.dimensions();
    let margin = margin.max(1.0);
    let canvas_w = ((width as f32 * margin) as u32).max(width);
    let canvas_h = ((height as f32 * margin) as u32).max(height);

    let mut canvas = transparent_layer(canvas_w, canvas_h);
    let paste_x = (canvas_w - width) / 2;
    let paste_y = (canvas_h - height) / 2;
    imageops::replace(&mut canvas, &premultiply(layer), paste_x as i64, paste_y as i64);

    // rotate about the canvas center, then shift the crop origin to (0, 0)
    let projection = Projection::translate(-(paste_x as f32), -(paste_y as f32))
        * about_center(canvas_w, canvas_h, degrees);

    let mut cropped = transparent_layer(width, height);
    warp_into(
        &canvas,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
        &mut cropped,
    );
    unpremultiply(&mut cropped);
    cropped
}

/// Rotate an image counter-clockwise about its center, keeping the canvas
/// size. Samples falling outside the source are transparent.
pub fn rotate_fixed(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let mut rotated = rotate_about_center(
        &premultiply(image),
        -degrees.to_radians(),
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
    );
    unpremultiply(&mut rotated);
    rotated
}

/// Same projection `rotate_about_center` builds; imageproc turns clockwise
/// for positive angles.
fn about_center(width: u32, height: u32, degrees: f32) -> Projection {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    Projection::translate(cx, cy)
        * Projection::rotate(-degrees.to_radians())
        * Projection::translate(-cx, -cy)
}

/// Copy of `image` with color channels scaled by alpha.
///
/// Resampling premultiplied pixels keeps the color of fully transparent
/// pixels from bleeding into the edges of what is drawn.
pub fn premultiply(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let a = pixel[3] as u16;
        for c in 0..3 {
            pixel[c] = ((pixel[c] as u16 * a + 127) / 255) as u8;
        }
    }
    out
}

/// Undo [`premultiply`] in place.
pub fn unpremultiply(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let a = pixel[3] as u32;
        if a == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
            continue;
        }
        for c in 0..3 {
            pixel[c] = ((pixel[c] as u32 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Blend `layer` over `base` with the straight-alpha "over" operator.
///
/// Both buffers must have the same dimensions; the base is left untouched
/// and a new buffer is returned.
pub fn composite_over(base: &RgbaImage, layer: &RgbaImage) -> Result<RgbaImage, WatermarkError> {
    if base.dimensions() != layer.dimensions() {
        return Err(WatermarkError::CompositeError(format!(
            "layer is {}x{} but image is {}x{}",
            layer.width(),
            layer.height(),
            base.width(),
            base.height()
        )));
    }

    let mut output = base.clone();
    for (target, overlay) in output.pixels_mut().zip(layer.pixels()) {
        *target = blend_pixels(*target, *overlay);
    }

    Ok(output)
}

/// Porter-Duff "over": result = foreground + background * (1 - foreground.alpha)
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    match foreground[3] {
        0 => return background,
        255 => return foreground,
        _ => {}
    }

    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let result = (fg as f32 * fg_alpha + bg as f32 * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        result.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
