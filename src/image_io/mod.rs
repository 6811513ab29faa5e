//! Reading and writing image files.
//!
//! Input is decoded from content (the extension only selects which files are
//! picked up); output is encoded in the format named by the output path.

pub mod encoder;
pub mod error;
pub mod format;

pub use encoder::{EncoderFactory, EncoderQuality, ImageEncoder, DEFAULT_JPEG_QUALITY};
pub use error::ImageError;
pub use format::{is_supported, OutputFormat, SUPPORTED_EXTENSIONS};

use image::RgbaImage;
use std::path::Path;

/// Decode an image file into RGBA.
pub fn decode_rgba(path: &Path) -> Result<RgbaImage, ImageError> {
    let bytes = std::fs::read(path).map_err(|e| ImageError::io(path, &e))?;
    decode_rgba_bytes(&bytes)
}

/// Decode image bytes into RGBA, sniffing the format from the content.
pub fn decode_rgba_bytes(bytes: &[u8]) -> Result<RgbaImage, ImageError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| ImageError::decode_failed(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(ImageError::decode_failed("image has no pixels"));
    }
    Ok(image.to_rgba8())
}

/// Encode an image in the format its path names and write it out.
pub fn write_image(image: &RgbaImage, path: &Path) -> Result<OutputFormat, ImageError> {
    let format = OutputFormat::from_path(path)?;
    let data = EncoderFactory::create(format).encode(image, EncoderQuality::default())?;
    std::fs::write(path, data).map_err(|e| ImageError::io(path, &e))?;
    Ok(format)
}
