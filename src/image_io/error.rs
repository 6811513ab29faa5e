//! Image I/O error types
//!
//! Structured errors for reading, decoding, encoding and writing image files.

use std::fmt;

/// Errors that can occur while reading or writing images
#[derive(Debug, Clone, PartialEq)]
pub enum ImageError {
    // === Decoding Errors ===
    /// File extension is not one of the supported formats
    UnsupportedFormat { format: String },
    /// Failed to decode image data
    DecodeFailed { message: String },

    // === Encoding Errors ===
    /// Encoding to output format failed
    EncodeFailed { format: String, message: String },

    // === File Errors ===
    /// Reading or writing the file failed
    Io { path: String, message: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::UnsupportedFormat { format } => {
                write!(f, "Unsupported image format: {}", format)
            }
            ImageError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ImageError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
            ImageError::Io { path, message } => {
                write!(f, "I/O error on {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    /// Helper constructors for common error patterns
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        ImageError::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        ImageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
