//! Watermark module for stamping text and image watermarks onto images.
//!
//! # Features
//!
//! - **Text watermarks**, multi-line, sized from the image diagonal
//! - **Image watermarks** scaled from the shorter image side, keeping the
//!   asset's own transparency
//! - **Automatic color** contrasted against the sampled background
//! - **9 positions** on a 3x3 grid with a fixed edge margin
//! - **Rotation** on a padded canvas so corners are not clipped
//!
//! # Example
//!
//! ```ignore
//! use batchmark::watermark::{RendererOptions, WatermarkPosition, WatermarkRenderer, WatermarkSpec};
//!
//! let spec = WatermarkSpec::text("Copyright 2024")
//!     .with_position(WatermarkPosition::BottomRight)
//!     .with_opacity(0.6)
//!     .normalized()?;
//!
//! let renderer = WatermarkRenderer::new(&RendererOptions::default());
//! let stamped = renderer.render(&source, &spec);
//! ```

pub mod asset;
pub mod background;
pub mod compositor;
pub mod config;
pub mod error;
pub mod position;
pub mod renderer;
pub mod text_renderer;

// Re-export main types for convenience
pub use asset::{load_asset, AssetCache};
pub use background::{analyze, try_analyze, BackgroundAnalysis};
pub use compositor::{
    apply_opacity, blend_pixels, composite_over, place, premultiply, rotate_fixed, rotate_padded,
    transparent_layer, unpremultiply, ROTATION_PADDING,
};
pub use config::{
    parse_hex_color, Color, HorizontalAlign, VerticalAlign, WatermarkKind, WatermarkPosition,
    WatermarkSpec, MAX_SIZE_FRACTION, MIN_SIZE_FRACTION,
};
pub use error::WatermarkError;
pub use position::{
    compute_image_size, compute_position, compute_text_size, ImageDimensions,
    PlacementPosition, WatermarkDimensions, EDGE_MARGIN,
};
pub use renderer::{resolve_color, RendererOptions, WatermarkRenderer};
pub use text_renderer::{LineMetrics, TextBlock, TextFont};
