use anyhow::{anyhow, Context};
use batchmark::batch::BatchProcessor;
use batchmark::config::{ConfigOverrides, JobConfig};
use batchmark::logging::{init_subscriber, LogFormat};
use batchmark::watermark::WatermarkPosition;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Batchmark - stamp a text or image watermark onto every image in a folder
#[derive(Parser, Debug)]
#[command(name = "batchmark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML job file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder with the source images
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Folder the watermarked images are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Watermark text; "\n" starts a new line
    #[arg(short, long, conflicts_with = "image")]
    text: Option<String>,

    /// Image file used as the watermark
    #[arg(long)]
    image: Option<PathBuf>,

    /// Watermark size as a fraction (0.01 - 0.5)
    #[arg(short, long)]
    size: Option<f32>,

    /// Opacity from 0.0 (invisible) to 1.0 (opaque)
    #[arg(long)]
    opacity: Option<f32>,

    /// Counter-clockwise rotation in degrees
    #[arg(short, long, allow_negative_numbers = true)]
    rotation: Option<f32>,

    /// Position on the image, e.g. bottom_right or top-left
    #[arg(short, long)]
    position: Option<WatermarkPosition>,

    /// Fixed color (#RGB or #RRGGBB) instead of automatic contrast color
    #[arg(long)]
    color: Option<String>,

    /// Font file used for text watermarks
    #[arg(long)]
    font: Option<PathBuf>,

    /// Render only the image at this index (0-based, sorted by name)
    #[arg(long, value_name = "INDEX")]
    preview: Option<usize>,

    /// Where the preview is written [default: preview.png]
    #[arg(long, requires = "preview")]
    preview_out: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Log per-file details
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_folder: self.input.clone(),
            output_folder: self.output.clone(),
            font_path: self.font.clone(),
            text: self.text.as_ref().map(|t| t.replace("\\n", "\n")),
            image_path: self.image.clone(),
            size_fraction: self.size,
            opacity: self.opacity,
            rotation_degrees: self.rotation,
            position: self.position,
            color: self.color.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "batchmark=debug" } else { "info" };
    if let Err(e) = init_subscriber(args.log_format, level) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => JobConfig::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => JobConfig::default(),
    };
    config.apply_overrides(args.overrides());

    let (job, options) = config
        .into_job()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    tracing::info!(
        input = %job.input_folder.display(),
        output = %job.output_folder.display(),
        kind = ?job.spec.kind,
        position = job.spec.position.as_str(),
        size_fraction = job.spec.size_fraction,
        opacity = job.spec.opacity,
        rotation = job.spec.rotation_degrees,
        auto_color = job.spec.auto_color,
        "Configuration loaded successfully"
    );

    let processor = Arc::new(BatchProcessor::new(job, &options));

    if let Some(index) = args.preview {
        let out = args
            .preview_out
            .clone()
            .unwrap_or_else(|| PathBuf::from("preview.png"));
        let preview = processor.preview(index)?;
        batchmark::image_io::write_image(&preview, &out)?;
        println!("Preview written to {}", out.display());
        return Ok(ExitCode::SUCCESS);
    }

    let handle = processor.spawn();

    let cancel = handle.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current file");
            cancel.cancel();
        }
    });

    let mut progress = handle.progress();
    let reporter = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let latest = progress.borrow_and_update().clone();
            if let Some(p) = latest {
                tracing::info!(
                    index = p.index,
                    total = p.total,
                    file = %p.file_name,
                    "Processed"
                );
            }
        }
    });

    let summary = handle.wait().await?;
    finish_reporter(reporter).await;

    println!("{}", summary);
    if summary.failures.is_empty() && !summary.cancelled {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}

/// Wait for the progress reporter. A panic or abort is logged, not raised.
async fn finish_reporter(reporter: tokio::task::JoinHandle<()>) {
    if let Err(e) = reporter.await {
        tracing::debug!(error = %e, "Progress reporter stopped");
    }
}
