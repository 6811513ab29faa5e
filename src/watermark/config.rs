//! Watermark specification types.
//!
//! A [`WatermarkSpec`] is the immutable description of one watermarking run:
//! what to draw (text or an image asset), how large, how opaque, how rotated,
//! where, and in which color. It is built once by the caller and passed by
//! reference into every rendering call.

use super::WatermarkError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest accepted size fraction.
pub const MIN_SIZE_FRACTION: f32 = 0.01;
/// Largest accepted size fraction.
pub const MAX_SIZE_FRACTION: f32 = 0.5;

pub(crate) fn default_size_fraction() -> f32 {
    0.1
}

pub(crate) fn default_opacity() -> f32 {
    0.7
}

/// What kind of watermark is stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    #[default]
    Text,
    Image,
}

/// Watermark position on the image (3x3 grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPosition {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    #[default]
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Horizontal component of a [`WatermarkPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Vertical component of a [`WatermarkPosition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl WatermarkPosition {
    /// All nine positions, row by row.
    pub const ALL: [WatermarkPosition; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::Center,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    pub fn horizontal(&self) -> HorizontalAlign {
        match self {
            Self::TopLeft | Self::MiddleLeft | Self::BottomLeft => HorizontalAlign::Left,
            Self::TopRight | Self::MiddleRight | Self::BottomRight => HorizontalAlign::Right,
            Self::TopCenter | Self::Center | Self::BottomCenter => HorizontalAlign::Center,
        }
    }

    pub fn vertical(&self) -> VerticalAlign {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => VerticalAlign::Top,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => VerticalAlign::Bottom,
            Self::MiddleLeft | Self::Center | Self::MiddleRight => VerticalAlign::Middle,
        }
    }

    /// Name as used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top_left",
            Self::TopCenter => "top_center",
            Self::TopRight => "top_right",
            Self::MiddleLeft => "middle_left",
            Self::Center => "center",
            Self::MiddleRight => "middle_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomCenter => "bottom_center",
            Self::BottomRight => "bottom_right",
        }
    }
}

impl std::str::FromStr for WatermarkPosition {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| WatermarkError::ConfigError(format!("Unknown position '{}'", s)))
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Mean of the three channels.
    pub fn brightness(&self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / 3.0
    }
}

/// Parse a hex color string into RGB components.
///
/// Supports both `#RGB` and `#RRGGBB` formats.
///
/// ```
/// use batchmark::watermark::{parse_hex_color, Color};
///
/// assert_eq!(parse_hex_color("#FFF").unwrap(), Color::new(255, 255, 255));
/// assert_eq!(parse_hex_color("#00007f").unwrap(), Color::new(0, 0, 127));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::ConfigError("Color must start with '#'".to_string()))?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WatermarkError::ConfigError(format!(
            "Invalid hex digit in color '#{}'",
            hex
        )));
    }

    let channel = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| WatermarkError::ConfigError("Invalid hex digit".to_string()))
    };

    match hex.len() {
        // #RGB: each digit doubled, 0xF -> 0xFF
        3 => Ok(Color::new(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Ok(Color::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        n => Err(WatermarkError::ConfigError(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            n
        ))),
    }
}

/// Immutable description of the watermark applied to every image of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkSpec {
    pub kind: WatermarkKind,
    /// Text content, may span several lines. Used when `kind` is `Text`.
    pub text: String,
    /// Watermark asset. Used when `kind` is `Image`.
    pub watermark_image_path: Option<PathBuf>,
    /// Fraction of the image diagonal (text) or of the shorter image side
    /// (image) that determines the watermark size.
    pub size_fraction: f32,
    /// 0.0 is invisible, 1.0 fully opaque.
    pub opacity: f32,
    /// Counter-clockwise rotation in degrees, in `[0, 360)`.
    pub rotation_degrees: f32,
    pub position: WatermarkPosition,
    /// Pick a contrasting color from the image background.
    pub auto_color: bool,
    /// Color used when `auto_color` is off.
    pub manual_color: Color,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            kind: WatermarkKind::Text,
            text: String::new(),
            watermark_image_path: None,
            size_fraction: default_size_fraction(),
            opacity: default_opacity(),
            rotation_degrees: 0.0,
            position: WatermarkPosition::Center,
            auto_color: true,
            manual_color: Color::black(),
        }
    }
}

impl WatermarkSpec {
    /// A text watermark with default settings.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: WatermarkKind::Text,
            text: text.into(),
            ..Self::default()
        }
    }

    /// An image watermark with default settings.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: WatermarkKind::Image,
            watermark_image_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_size_fraction(mut self, size_fraction: f32) -> Self {
        self.size_fraction = size_fraction;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn with_position(mut self, position: WatermarkPosition) -> Self {
        self.position = position;
        self
    }

    /// Use a fixed color instead of background analysis.
    pub fn with_color(mut self, color: Color) -> Self {
        self.auto_color = false;
        self.manual_color = color;
        self
    }

    pub fn with_auto_color(mut self) -> Self {
        self.auto_color = true;
        self
    }

    /// Check the configuration errors that must stop a run before it starts.
    pub fn validate(&self) -> Result<(), WatermarkError> {
        for (name, value) in [
            ("size_fraction", self.size_fraction),
            ("opacity", self.opacity),
            ("rotation_degrees", self.rotation_degrees),
        ] {
            if !value.is_finite() {
                return Err(WatermarkError::ConfigError(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        match self.kind {
            WatermarkKind::Text if self.text.trim().is_empty() => Err(
                WatermarkError::ConfigError("Watermark text cannot be empty".to_string()),
            ),
            WatermarkKind::Image if self.watermark_image_path.is_none() => {
                Err(WatermarkError::ConfigError(
                    "Image watermark requires a watermark image path".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Validate, then clamp every numeric field into its accepted range.
    pub fn normalized(mut self) -> Result<Self, WatermarkError> {
        self.validate()?;
        self.size_fraction = self
            .size_fraction
            .clamp(MIN_SIZE_FRACTION, MAX_SIZE_FRACTION);
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self.rotation_degrees = self.rotation_degrees.rem_euclid(360.0);
        if self.rotation_degrees >= 360.0 {
            self.rotation_degrees = 0.0;
        }
        self.text = self.text.trim().to_string();
        Ok(self)
    }

    /// Opacity as an 8-bit alpha value.
    pub fn alpha(&self) -> u8 {
        (self.opacity.clamp(0.0, 1.0) * 255.0) as u8
    }
}
