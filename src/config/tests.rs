//! Unit tests for configuration module
//!
//! Tests configuration parsing, validation, serialization/deserialization,
//! and edge cases in configuration handling.

use super::*;
use anyhow::Result;
use tempfile::tempdir;

#[test]
fn test_default_configuration_is_valid() {
    let config = StrataConfig::default();

    assert!(config.validate().is_ok());
    assert!(config.window.default_width > 0);
    assert!(config.window.default_height > 0);
    assert!(config.zone.work_area.width > 0);
    assert!(config.zone.work_area.height > 0);
    assert!(!config.layout.directory.is_empty());
}

#[test]
fn test_configuration_serialization_roundtrip() -> Result<()> {
    let original = StrataConfig::default();

    let toml_string = toml::to_string(&original)?;
    let deserialized: StrataConfig = toml::from_str(&toml_string)?;

    assert_eq!(original.window, deserialized.window);
    assert_eq!(original.zone, deserialized.zone);
    assert_eq!(original.layout, deserialized.layout);
    assert_eq!(original.general, deserialized.general);

    Ok(())
}

#[test]
fn test_configuration_from_file() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("test_config.toml");

    let test_config = r#"
[window]
default_x = 100
default_y = 50
default_width = 800
default_height = 600

[zone]
gap = 12

[zone.work_area]
x = 0
y = 24
width = 2560
height = 1416

[layout]
directory = "/tmp/strata-layouts"

[general]
debug = true
"#;
    std::fs::write(&file_path, test_config)?;

    let config = StrataConfig::load(&file_path)?;
    assert_eq!(config.window.default_width, 800);
    assert_eq!(config.zone.gap, 12);
    assert_eq!(config.zone.work_area.y, 24);
    assert_eq!(config.layout.directory, "/tmp/strata-layouts");
    assert!(config.general.debug);

    Ok(())
}

#[test]
fn test_partial_file_falls_back_to_defaults() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("partial.toml");
    std::fs::write(&file_path, "[general]\ndebug = true\n")?;

    let config = StrataConfig::load(&file_path)?;
    assert!(config.general.debug);
    assert_eq!(config.window.default_width, 400);
    assert_eq!(config.zone.work_area.width, 1920);

    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(StrataConfig::load("/nonexistent/strata.toml").is_err());
}

#[test]
fn test_invalid_toml_is_an_error() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("broken.toml");
    std::fs::write(&file_path, "window = not toml [")?;

    assert!(StrataConfig::load(&file_path).is_err());
    Ok(())
}

#[test]
fn test_validation_rejects_zero_work_area() {
    let mut config = StrataConfig::default();
    config.zone.work_area.width = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_rejects_zero_window_defaults() {
    let mut config = StrataConfig::default();
    config.window.default_height = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_rejects_oversized_gap() {
    let mut config = StrataConfig::default();
    config.zone.gap = 400;
    assert!(config.validate().is_err());
}

#[test]
fn test_save_roundtrip() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("saved.toml");

    let mut config = StrataConfig::default();
    config.zone.gap = 16;
    config.save(&file_path)?;

    let reloaded = StrataConfig::load(&file_path)?;
    assert_eq!(reloaded.zone.gap, 16);

    Ok(())
}

#[test]
fn test_expand_path_passthrough() -> Result<()> {
    let plain = expand_path("/etc/strata.toml")?;
    assert_eq!(plain, PathBuf::from("/etc/strata.toml"));
    Ok(())
}
