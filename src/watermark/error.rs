//! Watermark error types.
//!
//! Defines errors that can occur while building or compositing a watermark.

use std::fmt;

/// Errors that can occur during watermark processing.
#[derive(Debug, Clone, PartialEq)]
pub enum WatermarkError {
    /// Failed to load or decode the watermark asset
    DecodeError(String),

    /// Failed to render text watermark
    RenderError(String),

    /// Background sampling could not be performed
    AnalysisError(String),

    /// Invalid configuration
    ConfigError(String),

    /// Failed to composite watermark onto image
    CompositeError(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeError(msg) => write!(f, "Failed to load watermark image: {}", msg),
            Self::RenderError(msg) => write!(f, "Failed to render text watermark: {}", msg),
            Self::AnalysisError(msg) => write!(f, "Background analysis failed: {}", msg),
            Self::ConfigError(msg) => write!(f, "Watermark configuration error: {}", msg),
            Self::CompositeError(msg) => write!(f, "Failed to composite watermark: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
