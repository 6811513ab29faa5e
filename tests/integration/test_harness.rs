// Shared helpers for building input folders

use batchmark::batch::{BatchJob, BatchProcessor};
use batchmark::watermark::{TextFont, WatermarkRenderer, WatermarkSpec};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary input folder plus an output folder path inside it.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("in")).expect("Failed to create input folder");
        Self { dir }
    }

    pub fn input(&self) -> PathBuf {
        self.dir.path().join("in")
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Write a solid-color image; the format follows the extension.
    pub fn add_image(&self, name: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
        let path = self.input().join(name);
        let image = RgbaImage::from_pixel(width, height, Rgba(color));
        batchmark::image_io::write_image(&image, &path).expect("Failed to write image");
        path
    }

    pub fn add_file(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.input().join(name);
        std::fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    pub fn job(&self, spec: WatermarkSpec) -> BatchJob {
        BatchJob::new(self.input(), self.output(), spec)
    }

    /// Processor drawing text with the built-in font, so results do not
    /// depend on fonts installed on the machine.
    pub fn processor(&self, spec: WatermarkSpec) -> BatchProcessor {
        BatchProcessor::with_renderer(
            self.job(spec),
            WatermarkRenderer::with_font(TextFont::Builtin),
        )
    }

    pub fn output_names(&self) -> Vec<String> {
        list_names(&self.output())
    }
}

pub fn list_names(folder: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(folder)
        .expect("Failed to read folder")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Bounding box (min_x, min_y, max_x, max_y) of pixels matching `pred`.
pub fn bbox_where(
    image: &RgbaImage,
    pred: impl Fn(&Rgba<u8>) -> bool,
) -> Option<(u32, u32, u32, u32)> {
    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in image.enumerate_pixels() {
        if pred(p) {
            bbox = Some(match bbox {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bbox
}
