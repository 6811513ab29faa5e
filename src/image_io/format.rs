//! Supported image formats
//!
//! Input files are selected by extension (case-insensitive) and written back
//! in the format their extension names.

use super::error::ImageError;
use std::path::Path;

/// Extensions accepted as batch input, lowercase without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "webp"];

/// Format an image is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
    WebP,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::WebP => "webp",
        }
    }

    /// Map a file extension (without the dot, any case) to a format
    pub fn from_extension(ext: &str) -> Result<Self, ImageError> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            "tiff" => Ok(Self::Tiff),
            "webp" => Ok(Self::WebP),
            other => Err(ImageError::unsupported_format(other)),
        }
    }

    /// Format named by a path's extension
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ImageError::unsupported_format(path.display().to_string()))?;
        Self::from_extension(ext)
    }

    /// Whether the format keeps an alpha channel
    pub fn supports_transparency(&self) -> bool {
        !matches!(self, Self::Jpeg)
    }
}

/// Whether a path has one of the supported extensions
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}
