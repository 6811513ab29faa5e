//! Text watermark rendering.
//!
//! Text is drawn with a TrueType/OpenType font found on the host (or given
//! explicitly). When no font can be loaded, the built-in 8x8 bitmap font is
//! used instead; the result is blockier but the run keeps going.
//!
//! # Measuring
//!
//! Each line is measured by the bounding box of its painted pixels, so lines
//! of a multi-line block stack tightly: the next line starts where the
//! previous one's ink ends.
//!
//! # Example
//!
//! ```ignore
//! use batchmark::watermark::text_renderer::{TextBlock, TextFont};
//!
//! let font = TextFont::resolve(None);
//! let block = TextBlock::layout(&font, "Copyright\n2024", 48.0);
//! block.draw(&font, &mut layer, anchor, Rgba([0, 0, 0, 255]));
//! ```

use super::position::{PlacementPosition, WatermarkDimensions};
use super::WatermarkError;
use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Cell size of the built-in bitmap font.
const BUILTIN_CELL: u32 = 8;

/// Well-known font locations, tried in order.
fn system_font_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<&str> = Vec::new();

    if cfg!(target_os = "windows") {
        candidates.extend([
            "C:\\Windows\\Fonts\\msyh.ttc",
            "C:\\Windows\\Fonts\\segoeui.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]);
    } else if cfg!(target_os = "macos") {
        candidates.extend([
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Helvetica.ttc",
            "/Library/Fonts/Arial Unicode.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
        ]);
    } else {
        candidates.extend([
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ]);
    }

    candidates.into_iter().map(PathBuf::from).collect()
}

/// Font used to draw text watermarks.
pub enum TextFont {
    /// Outline font loaded from disk.
    Outline { font: FontVec, path: PathBuf },
    /// Built-in 8x8 bitmap font.
    Builtin,
}

impl std::fmt::Debug for TextFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline { path, .. } => f.debug_struct("Outline").field("path", path).finish(),
            Self::Builtin => f.write_str("Builtin"),
        }
    }
}

impl TextFont {
    /// Load an outline font from a file. Font collections use their first face.
    pub fn load(path: &Path) -> Result<Self, WatermarkError> {
        let data = std::fs::read(path).map_err(|e| {
            WatermarkError::RenderError(format!("cannot read font {}: {}", path.display(), e))
        })?;
        let font = FontVec::try_from_vec_and_index(data, 0).map_err(|e| {
            WatermarkError::RenderError(format!("invalid font {}: {}", path.display(), e))
        })?;

        Ok(Self::Outline {
            font,
            path: path.to_path_buf(),
        })
    }

    /// Resolve the font to draw with.
    ///
    /// An explicit path is tried first, then the system font locations. Falls
    /// back to the built-in bitmap font when nothing loads.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let explicit = explicit.map(Path::to_path_buf);
        for path in explicit.into_iter().chain(system_font_candidates()) {
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "Font candidate not present");
                continue;
            }
            match Self::load(&path) {
                Ok(font) => {
                    tracing::info!(path = %path.display(), "Using font for text watermarks");
                    return font;
                }
                Err(e) => tracing::warn!(error = %e, "Skipping unusable font"),
            }
        }

        tracing::warn!("No usable system font found, falling back to built-in bitmap font");
        Self::Builtin
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }

    /// Measure one line of text.
    pub fn measure_line(&self, line: &str, font_size: f32) -> LineMetrics {
        match self {
            Self::Outline { font, .. } => measure_outline_line(font, line, font_size),
            Self::Builtin => measure_builtin_line(line, font_size),
        }
    }

    /// Draw one line so that its ink box starts at `origin`.
    pub fn draw_line(
        &self,
        layer: &mut RgbaImage,
        line: &str,
        font_size: f32,
        metrics: &LineMetrics,
        origin: PlacementPosition,
        color: Rgba<u8>,
    ) {
        // pen position that puts the ink box at `origin`
        let pen_x = origin.x - metrics.offset_x;
        let pen_y = origin.y - metrics.offset_y;

        match self {
            Self::Outline { font, .. } => {
                draw_outline_line(font, layer, line, font_size, pen_x, pen_y, color)
            }
            Self::Builtin => draw_builtin_line(layer, line, font_size, pen_x, pen_y, color),
        }
    }
}

/// Size of one measured line.
///
/// `offset_x`/`offset_y` locate the top-left of the ink box relative to the
/// pen origin (left end of the baseline for outline fonts, top-left of the
/// first cell for the bitmap font).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Visit every glyph of a line laid out with its pen at the origin.
fn for_each_outline_glyph(
    font: &FontVec,
    line: &str,
    font_size: f32,
    pen: (f32, f32),
    mut visit: impl FnMut(ab_glyph::OutlinedGlyph),
) -> f32 {
    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let mut cursor_x = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in line.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, point(pen.0 + cursor_x, pen.1));
        if let Some(outlined) = font.outline_glyph(glyph) {
            visit(outlined);
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    cursor_x
}

fn measure_outline_line(font: &FontVec, line: &str, font_size: f32) -> LineMetrics {
    let mut min = (f32::INFINITY, f32::INFINITY);
    let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY);

    let advance = for_each_outline_glyph(font, line, font_size, (0.0, 0.0), |outlined| {
        let bounds = outlined.px_bounds();
        min = (min.0.min(bounds.min.x), min.1.min(bounds.min.y));
        max = (max.0.max(bounds.max.x), max.1.max(bounds.max.y));
    });

    if min.0.is_finite() {
        return LineMetrics {
            width: (max.0 - min.0).ceil() as u32,
            height: (max.1 - min.1).ceil() as u32,
            offset_x: min.0.floor() as i32,
            offset_y: min.1.floor() as i32,
        };
    }

    // Blank line: advance width and a full line of height.
    let scaled_font = font.as_scaled(PxScale::from(font_size));
    LineMetrics {
        width: advance.ceil().max(0.0) as u32,
        height: scaled_font.height().ceil() as u32,
        offset_x: 0,
        offset_y: -(scaled_font.ascent().ceil() as i32),
    }
}

fn draw_outline_line(
    font: &FontVec,
    layer: &mut RgbaImage,
    line: &str,
    font_size: f32,
    pen_x: i32,
    pen_y: i32,
    color: Rgba<u8>,
) {
    let (width, height) = (layer.width() as i32, layer.height() as i32);

    for_each_outline_glyph(
        font,
        line,
        font_size,
        (pen_x as f32, pen_y as f32),
        |outlined| {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;
                if x >= 0 && y >= 0 && x < width && y < height {
                    let alpha = (coverage.clamp(0.0, 1.0) * color[3] as f32) as u8;
                    paint(layer, x as u32, y as u32, color, alpha);
                }
            });
        },
    );
}

fn builtin_scale(font_size: f32) -> u32 {
    ((font_size / BUILTIN_CELL as f32).round() as u32).max(1)
}

fn builtin_glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Visit every set bit of a bitmap line as `(x, y)` cell coordinates.
fn for_each_builtin_bit(line: &str, mut visit: impl FnMut(u32, u32)) {
    for (index, c) in line.chars().enumerate() {
        let glyph = builtin_glyph(c);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..BUILTIN_CELL {
                if (bits >> col) & 1 == 1 {
                    visit(index as u32 * BUILTIN_CELL + col, row as u32);
                }
            }
        }
    }
}

fn measure_builtin_line(line: &str, font_size: f32) -> LineMetrics {
    let scale = builtin_scale(font_size);
    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);

    for_each_builtin_bit(line, |x, y| {
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x + 1), max.1.max(y + 1));
    });

    if min.0 == u32::MAX {
        return LineMetrics {
            width: line.chars().count() as u32 * BUILTIN_CELL * scale,
            height: BUILTIN_CELL * scale,
            offset_x: 0,
            offset_y: 0,
        };
    }

    LineMetrics {
        width: (max.0 - min.0) * scale,
        height: (max.1 - min.1) * scale,
        offset_x: (min.0 * scale) as i32,
        offset_y: (min.1 * scale) as i32,
    }
}

fn draw_builtin_line(
    layer: &mut RgbaImage,
    line: &str,
    font_size: f32,
    pen_x: i32,
    pen_y: i32,
    color: Rgba<u8>,
) {
    let scale = builtin_scale(font_size);
    let (width, height) = (layer.width() as i32, layer.height() as i32);

    for_each_builtin_bit(line, |cx, cy| {
        let base_x = pen_x + (cx * scale) as i32;
        let base_y = pen_y + (cy * scale) as i32;
        for dy in 0..scale as i32 {
            for dx in 0..scale as i32 {
                let (x, y) = (base_x + dx, base_y + dy);
                if x >= 0 && y >= 0 && x < width && y < height {
                    paint(layer, x as u32, y as u32, color, color[3]);
                }
            }
        }
    });
}

/// Paint a pixel of a single-color layer, keeping the strongest coverage.
fn paint(layer: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>, alpha: u8) {
    let pixel = layer.get_pixel_mut(x, y);
    if alpha > pixel[3] {
        *pixel = Rgba([color[0], color[1], color[2], alpha]);
    }
}

/// A laid-out block of text lines.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<(String, LineMetrics)>,
    /// Smallest ink offset among the lines; the block's left edge.
    pub left: i32,
    pub font_size: f32,
    pub width: u32,
    pub height: u32,
}

impl TextBlock {
    /// Split text on newlines and measure every line.
    ///
    /// Lines keep their ink offset from the pen origin, so leading spaces
    /// indent a line. The block spans every line's ink horizontally and is
    /// as tall as all lines together.
    pub fn layout(font: &TextFont, text: &str, font_size: f32) -> Self {
        let lines: Vec<(String, LineMetrics)> = text
            .split('\n')
            .map(|line| line.trim_end_matches('\r').to_string())
            .map(|line| {
                let metrics = font.measure_line(&line, font_size);
                (line, metrics)
            })
            .collect();

        let spans = || lines.iter().map(|(_, m)| m).filter(|m| m.width > 0);
        let left = spans().map(|m| m.offset_x).min().unwrap_or(0);
        let right = spans()
            .map(|m| m.offset_x + m.width as i32)
            .max()
            .unwrap_or(0);
        let width = (right - left).max(0) as u32;
        let height = lines.iter().map(|(_, m)| m.height).sum();

        Self {
            lines,
            left,
            font_size,
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> WatermarkDimensions {
        WatermarkDimensions::new(self.width, self.height)
    }

    /// Draw the lines top to bottom starting at `anchor`.
    ///
    /// Each line starts directly below the previous line's measured height.
    pub fn draw(
        &self,
        font: &TextFont,
        layer: &mut RgbaImage,
        anchor: PlacementPosition,
        color: Rgba<u8>,
    ) {
        let mut current_y = anchor.y;
        for (line, metrics) in &self.lines {
            font.draw_line(
                layer,
                line,
                self.font_size,
                metrics,
                PlacementPosition::new(anchor.x + metrics.offset_x - self.left, current_y),
                color,
            );
            current_y += metrics.height as i32;
        }
    }
}
