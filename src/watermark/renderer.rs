//! Watermark renderer.
//!
//! Builds the watermark layer for one source image and composites it.
//!
//! # Pipeline
//!
//! 1. Build a transparent layer the size of the source image
//! 2. Paint the text block or the scaled asset at the computed anchor
//! 3. Rotate the layer inside a padded canvas when a rotation is set
//! 4. Blend the layer over the source
//!
//! # Example
//!
//! ```ignore
//! use batchmark::watermark::{RendererOptions, WatermarkRenderer, WatermarkSpec};
//!
//! let renderer = WatermarkRenderer::new(&RendererOptions::default());
//! let spec = WatermarkSpec::text("(c) 2024").normalized()?;
//! let stamped = renderer.render(&source, &spec);
//! ```

use super::asset::AssetCache;
use super::background;
use super::compositor::{
    apply_opacity, composite_over, place, premultiply, rotate_padded, transparent_layer,
    unpremultiply, ROTATION_PADDING,
};
use super::position::{
    compute_image_size, compute_position, compute_text_size, ImageDimensions,
    WatermarkDimensions,
};
use super::text_renderer::{TextBlock, TextFont};
use super::{Color, WatermarkError, WatermarkKind, WatermarkSpec};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::PathBuf;

/// Resources shared by every render call of a run.
#[derive(Debug, Clone)]
pub struct RendererOptions {
    /// Font tried before the system font locations.
    pub font_path: Option<PathBuf>,
    /// Size of the rotation canvas relative to the image.
    pub rotation_padding: f32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            font_path: None,
            rotation_padding: ROTATION_PADDING,
        }
    }
}

/// Renders watermarks onto source images.
///
/// Holds only resources (font, decoded assets); what to draw always comes
/// from the [`WatermarkSpec`] passed to each call.
#[derive(Debug)]
pub struct WatermarkRenderer {
    font: TextFont,
    assets: AssetCache,
    rotation_padding: f32,
}

impl WatermarkRenderer {
    /// Create a renderer, resolving the font up front.
    pub fn new(options: &RendererOptions) -> Self {
        Self {
            font: TextFont::resolve(options.font_path.as_deref()),
            assets: AssetCache::new(),
            rotation_padding: options.rotation_padding,
        }
    }

    /// Create a renderer that draws text with the given font.
    pub fn with_font(font: TextFont) -> Self {
        Self {
            font,
            assets: AssetCache::new(),
            rotation_padding: ROTATION_PADDING,
        }
    }

    pub fn font(&self) -> &TextFont {
        &self.font
    }

    /// Watermark `source`, returning an unmodified copy if anything fails.
    pub fn render(&self, source: &RgbaImage, spec: &WatermarkSpec) -> RgbaImage {
        match self.try_render(source, spec) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = ?spec.kind,
                    width = source.width(),
                    height = source.height(),
                    "Watermark rendering failed, keeping image unchanged"
                );
                source.clone()
            }
        }
    }

    /// Watermark `source`, reporting failures.
    pub fn try_render(
        &self,
        source: &RgbaImage,
        spec: &WatermarkSpec,
    ) -> Result<RgbaImage, WatermarkError> {
        match self.build_layer(source, spec)? {
            Some(layer) => composite_over(source, &layer),
            None => Ok(source.clone()),
        }
    }

    /// Build the (possibly rotated) watermark layer for `source`.
    ///
    /// Returns `None` when there is nothing to draw.
    pub fn build_layer(
        &self,
        source: &RgbaImage,
        spec: &WatermarkSpec,
    ) -> Result<Option<RgbaImage>, WatermarkError> {
        let layer = match spec.kind {
            WatermarkKind::Text => self.text_layer(source, spec)?,
            WatermarkKind::Image => self.image_layer(source, spec)?,
        };

        Ok(layer.map(|layer| {
            if spec.rotation_degrees != 0.0 {
                rotate_padded(&layer, spec.rotation_degrees, self.rotation_padding)
            } else {
                layer
            }
        }))
    }

    fn text_layer(
        &self,
        source: &RgbaImage,
        spec: &WatermarkSpec,
    ) -> Result<Option<RgbaImage>, WatermarkError> {
        let text = spec.text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let dims = ImageDimensions::from(source);
        let color = resolve_color(source, spec);
        let font_size = compute_text_size(&dims, spec.size_fraction) as f32;

        let block = TextBlock::layout(&self.font, text, font_size);
        if block.width == 0 || block.height == 0 {
            return Err(WatermarkError::RenderError(format!(
                "text measured as {}x{} at {}px",
                block.width, block.height, font_size
            )));
        }

        let anchor = compute_position(&dims, &block.dimensions(), spec.position);
        let mut layer = transparent_layer(dims.width, dims.height);
        block.draw(
            &self.font,
            &mut layer,
            anchor,
            Rgba([color.r, color.g, color.b, spec.alpha()]),
        );

        Ok(Some(layer))
    }

    fn image_layer(
        &self,
        source: &RgbaImage,
        spec: &WatermarkSpec,
    ) -> Result<Option<RgbaImage>, WatermarkError> {
        let Some(path) = spec.watermark_image_path.as_deref() else {
            return Ok(None);
        };

        let asset = self.assets.load(path)?;
        let dims = ImageDimensions::from(source);
        let target = compute_image_size(
            &dims,
            &WatermarkDimensions::new(asset.width(), asset.height()),
            spec.size_fraction,
        );

        let mut watermark = if (target.width, target.height) == asset.dimensions() {
            asset.as_ref().clone()
        } else {
            // resample premultiplied so transparent pixels don't darken the edges
            let mut resized = imageops::resize(
                &premultiply(asset.as_ref()),
                target.width,
                target.height,
                FilterType::Lanczos3,
            );
            unpremultiply(&mut resized);
            resized
        };
        apply_opacity(&mut watermark, spec.alpha());

        let anchor = compute_position(&dims, &target, spec.position);
        let mut layer = transparent_layer(dims.width, dims.height);
        place(&mut layer, &watermark, anchor);

        Ok(Some(layer))
    }
}

/// Pick the text color: contrasted against the background, or the manual one.
pub fn resolve_color(source: &RgbaImage, spec: &WatermarkSpec) -> Color {
    if spec.auto_color {
        background::analyze(source).0
    } else {
        spec.manual_color
    }
}
