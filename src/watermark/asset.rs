//! Watermark asset loading with caching.
//!
//! Image watermarks are read from disk, decoded and converted to RGBA once,
//! then reused for every image of a run.

use super::WatermarkError;
use image::RgbaImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Cache of decoded watermark assets keyed by path.
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: Mutex<HashMap<PathBuf, Arc<RgbaImage>>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an asset, decoding it on first use.
    ///
    /// Failed loads are not cached, so a fixed file is picked up on the next
    /// call.
    pub fn load(&self, path: &Path) -> Result<Arc<RgbaImage>, WatermarkError> {
        if let Some(cached) = self.entries.lock().get(path) {
            return Ok(Arc::clone(cached));
        }

        let decoded = Arc::new(load_asset(path)?);
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "Loaded watermark image"
        );

        self.entries
            .lock()
            .insert(path.to_path_buf(), Arc::clone(&decoded));
        Ok(decoded)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Decode a watermark asset from disk into RGBA.
pub fn load_asset(path: &Path) -> Result<RgbaImage, WatermarkError> {
    let image = image::open(path)
        .map_err(|e| WatermarkError::DecodeError(format!("{}: {}", path.display(), e)))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(WatermarkError::DecodeError(format!(
            "{}: image has no pixels",
            path.display()
        )));
    }

    Ok(image.to_rgba8())
}
