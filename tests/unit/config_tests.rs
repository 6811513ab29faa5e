// Job configuration unit tests

use batchmark::config::*;
use batchmark::watermark::{Color, WatermarkKind, WatermarkPosition};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_can_load_full_text_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r##"
input_folder: /photos
output_folder: /photos/out
font_path: /fonts/custom.ttf
rotation_padding: 2.0
watermark:
  kind: text
  text: "Line one\nLine two"
  size_fraction: 0.2
  opacity: 0.5
  rotation_degrees: 45
  position: bottom_left
  auto_color: false
  color: "#336699"
"##
    )
    .unwrap();

    let config = JobConfig::from_file(file.path()).unwrap();
    let (job, options) = config.into_job().unwrap();

    assert_eq!(job.input_folder, PathBuf::from("/photos"));
    assert_eq!(job.output_folder, PathBuf::from("/photos/out"));
    assert_eq!(options.font_path, Some(PathBuf::from("/fonts/custom.ttf")));
    assert_eq!(options.rotation_padding, 2.0);

    assert_eq!(job.spec.kind, WatermarkKind::Text);
    assert_eq!(job.spec.text, "Line one\nLine two");
    assert_eq!(job.spec.size_fraction, 0.2);
    assert_eq!(job.spec.opacity, 0.5);
    assert_eq!(job.spec.rotation_degrees, 45.0);
    assert_eq!(job.spec.position, WatermarkPosition::BottomLeft);
    assert!(!job.spec.auto_color);
    assert_eq!(job.spec.manual_color, Color::new(0x33, 0x66, 0x99));
}

#[test]
fn test_can_load_image_config() {
    let yaml = r#"
input_folder: /in
output_folder: /out
watermark:
  kind: image
  image_path: /assets/logo.png
  position: top_right
"#;
    let (job, _) = JobConfig::from_yaml_with_env(yaml)
        .unwrap()
        .into_job()
        .unwrap();
    assert_eq!(job.spec.kind, WatermarkKind::Image);
    assert_eq!(
        job.spec.watermark_image_path,
        Some(PathBuf::from("/assets/logo.png"))
    );
    assert_eq!(job.spec.position, WatermarkPosition::TopRight);
}

#[test]
fn test_all_positions_deserialize() {
    for position in WatermarkPosition::ALL {
        let yaml = format!(
            "input_folder: /in\noutput_folder: /out\nwatermark:\n  text: x\n  position: {}\n",
            position.as_str()
        );
        let config = JobConfig::from_yaml_with_env(&yaml).unwrap();
        assert_eq!(config.watermark.position, position);
    }
}

#[test]
fn test_unknown_position_is_rejected() {
    let yaml = "watermark:\n  position: upper_left\n";
    assert!(JobConfig::from_yaml_with_env(yaml).is_err());
}

#[test]
fn test_unknown_kind_is_rejected() {
    let yaml = "watermark:\n  kind: video\n";
    assert!(JobConfig::from_yaml_with_env(yaml).is_err());
}

#[test]
fn test_non_finite_values_are_rejected() {
    let yaml = r#"
input_folder: /in
output_folder: /out
watermark:
  text: x
  opacity: .nan
"#;
    let config = JobConfig::from_yaml_with_env(yaml).unwrap();
    assert!(config.into_job().is_err());
}

#[test]
fn test_missing_file_reports_read_error() {
    let err = JobConfig::from_file("/nonexistent/job.yaml").unwrap_err();
    assert!(err.starts_with("Failed to read config file"));
}

#[test]
fn test_env_substitution_in_watermark_text() {
    std::env::set_var("BATCHMARK_UNIT_OWNER", "ACME");
    let yaml = r#"
input_folder: /in
output_folder: /out
watermark:
  text: "(c) ${BATCHMARK_UNIT_OWNER}"
"#;
    let (job, _) = JobConfig::from_yaml_with_env(yaml)
        .unwrap()
        .into_job()
        .unwrap();
    assert_eq!(job.spec.text, "(c) ACME");
}

#[test]
fn test_cli_overrides_complete_a_partial_file() {
    let yaml = "watermark:\n  text: from file\n  opacity: 0.4\n";
    let mut config = JobConfig::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().is_err());

    config.apply_overrides(ConfigOverrides {
        input_folder: Some(PathBuf::from("/in")),
        output_folder: Some(PathBuf::from("/out")),
        rotation_degrees: Some(400.0),
        ..Default::default()
    });

    let (job, _) = config.into_job().unwrap();
    assert_eq!(job.spec.text, "from file");
    assert_eq!(job.spec.opacity, 0.4);
    assert_eq!(job.spec.rotation_degrees, 40.0);
}
