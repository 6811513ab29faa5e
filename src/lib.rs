// Batchmark library: batch watermarking of raster images

pub mod batch;
pub mod config;
pub mod image_io;
pub mod logging;
pub mod watermark;
