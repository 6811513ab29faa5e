//! Job configuration loaded from YAML.
//!
//! ```yaml
//! input_folder: ./photos
//! output_folder: ./photos/watermarked
//! font_path: ${HOME}/.fonts/NotoSansCJK-Regular.ttc
//! watermark:
//!   kind: text
//!   text: "Copyright 2024"
//!   size_fraction: 0.08
//!   opacity: 0.6
//!   rotation_degrees: 30
//!   position: bottom_right
//!   auto_color: false
//!   color: "#ffffff"
//! ```

use crate::batch::BatchJob;
use crate::watermark::config::{default_opacity, default_size_fraction};
use crate::watermark::{
    parse_hex_color, RendererOptions, WatermarkKind, WatermarkPosition, WatermarkSpec,
    ROTATION_PADDING,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_auto_color() -> bool {
    true
}

fn default_color() -> String {
    "#000000".to_string()
}

fn default_rotation_padding() -> f32 {
    ROTATION_PADDING
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct JobConfig {
    #[serde(default)]
    pub input_folder: PathBuf,
    #[serde(default)]
    pub output_folder: PathBuf,
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    #[serde(default = "default_rotation_padding")]
    pub rotation_padding: f32,
    #[serde(default)]
    pub watermark: WatermarkSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WatermarkSection {
    #[serde(default)]
    pub kind: WatermarkKind,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    #[serde(default = "default_size_fraction")]
    pub size_fraction: f32,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub rotation_degrees: f32,
    #[serde(default)]
    pub position: WatermarkPosition,
    #[serde(default = "default_auto_color")]
    pub auto_color: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for WatermarkSection {
    fn default() -> Self {
        Self {
            kind: WatermarkKind::default(),
            text: String::new(),
            image_path: None,
            size_fraction: default_size_fraction(),
            opacity: default_opacity(),
            rotation_degrees: 0.0,
            position: WatermarkPosition::default(),
            auto_color: default_auto_color(),
            color: default_color(),
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::new(),
            output_folder: PathBuf::new(),
            font_path: None,
            rotation_padding: default_rotation_padding(),
            watermark: WatermarkSection::default(),
        }
    }
}

/// Values given on the command line; each one set replaces the file's value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_folder: Option<PathBuf>,
    pub output_folder: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
    pub text: Option<String>,
    pub image_path: Option<PathBuf>,
    pub size_fraction: Option<f32>,
    pub opacity: Option<f32>,
    pub rotation_degrees: Option<f32>,
    pub position: Option<WatermarkPosition>,
    /// A fixed color; turns automatic color off.
    pub color: Option<String>,
}

impl JobConfig {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(input) = overrides.input_folder {
            self.input_folder = input;
        }
        if let Some(output) = overrides.output_folder {
            self.output_folder = output;
        }
        if let Some(font) = overrides.font_path {
            self.font_path = Some(font);
        }
        // The CLI accepts only one of text and image path.
        if let Some(text) = overrides.text {
            self.watermark.kind = WatermarkKind::Text;
            self.watermark.text = text;
        }
        if let Some(image) = overrides.image_path {
            self.watermark.kind = WatermarkKind::Image;
            self.watermark.image_path = Some(image);
        }
        if let Some(size) = overrides.size_fraction {
            self.watermark.size_fraction = size;
        }
        if let Some(opacity) = overrides.opacity {
            self.watermark.opacity = opacity;
        }
        if let Some(rotation) = overrides.rotation_degrees {
            self.watermark.rotation_degrees = rotation;
        }
        if let Some(position) = overrides.position {
            self.watermark.position = position;
        }
        if let Some(color) = overrides.color {
            self.watermark.auto_color = false;
            self.watermark.color = color;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.input_folder.as_os_str().is_empty() {
            return Err("input_folder is required".to_string());
        }
        if self.output_folder.as_os_str().is_empty() {
            return Err("output_folder is required".to_string());
        }
        if !self.rotation_padding.is_finite() || self.rotation_padding < 1.0 {
            return Err(format!(
                "rotation_padding must be at least 1.0, got {}",
                self.rotation_padding
            ));
        }
        self.spec()?;
        Ok(())
    }

    /// The watermark described by this configuration, clamped into range.
    pub fn spec(&self) -> Result<WatermarkSpec, String> {
        let section = &self.watermark;
        let manual_color = parse_hex_color(&section.color).map_err(|e| e.to_string())?;

        let spec = WatermarkSpec {
            kind: section.kind,
            text: section.text.clone(),
            watermark_image_path: section.image_path.clone(),
            size_fraction: section.size_fraction,
            opacity: section.opacity,
            rotation_degrees: section.rotation_degrees,
            position: section.position,
            auto_color: section.auto_color,
            manual_color,
        };
        spec.normalized().map_err(|e| e.to_string())
    }

    /// Validate and split into the job and the renderer resources.
    pub fn into_job(self) -> Result<(BatchJob, RendererOptions), String> {
        self.validate()?;
        let spec = self.spec()?;
        let options = RendererOptions {
            font_path: self.font_path,
            rotation_padding: self.rotation_padding,
        };
        Ok((
            BatchJob::new(self.input_folder, self.output_folder, spec),
            options,
        ))
    }
}
