use std::path::Path;

use serde::Deserialize;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
  #[error("could not read config file: {0}")]
  Io(#[from] std::io::Error),
  #[error("could not parse config file: {0}")]
  Parse(#[from] toml::de::Error),
}

/// Window, camera and overlay settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
  pub title: String,
  pub size: (u32, u32),
  pub min_size: (u32, u32),
  pub resizable: bool,
  pub max_fps: Option<u32>,
  pub debug: bool,
  // projection
  pub fov_y: f32,
  pub near: f32,
  pub far: f32,
  // render state
  pub clear_color: [f32; 4],
  pub lighting: bool,
  // axis overlay defaults
  pub axes: bool,
  pub hashes: bool,
  pub axis_length: f32,
}
impl Default for ViewerConfig {
  fn default() -> Self {
    Self {
      title: "Simpler".to_owned(),
      size: (800, 600),
      min_size: (400, 300),
      resizable: true,
      max_fps: Some(60),
      debug: false,
      fov_y: 45.0,
      near: 0.1,
      far: 100.0,
      clear_color: [0.0, 0.0, 0.0, 0.0],
      lighting: false,
      axes: false,
      hashes: true,
      axis_length: 1.0,
    }
  }
}
impl ViewerConfig {
  pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(contents)?)
  }
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Self::from_toml(&contents)
  }
  /// Wait between redraws for the fps cap, zero when uncapped.
  pub fn frame_interval(&self) -> std::time::Duration {
    match self.max_fps {
      Some(n) if n > 0 => std::time::Duration::from_micros(1_000_000 / n as u64),
      _ => std::time::Duration::ZERO,
    }
  }
}

#[cfg(test)]
mod config_tests {
  use super::*;

  #[test]
  fn empty_file_is_default() {
    assert_eq!(ViewerConfig::from_toml("").unwrap(), ViewerConfig::default());
  }
  #[test]
  fn partial_override() {
    let cfg = ViewerConfig::from_toml(r#"
      title = "Axes"
      size = [1024, 768]
      axes = true
      axis_length = 3.5
    "#).unwrap();
    assert_eq!(cfg.title, "Axes");
    assert_eq!(cfg.size, (1024, 768));
    assert!(cfg.axes);
    assert!(cfg.hashes);
    assert_eq!(cfg.axis_length, 3.5);
    assert_eq!(cfg.fov_y, 45.0);
  }
  #[test]
  fn bad_types_are_parse_errors() {
    let err = ViewerConfig::from_toml("size = \"big\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
  }
  #[test]
  fn missing_file_is_io_error() {
    let err = ViewerConfig::load("/nonexistent/simpler.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
  }
  #[test]
  fn frame_interval_from_fps() {
    let mut cfg = ViewerConfig::default();
    cfg.max_fps = Some(50);
    assert_eq!(cfg.frame_interval(), std::time::Duration::from_millis(20));
    cfg.max_fps = None;
    assert_eq!(cfg.frame_interval(), std::time::Duration::ZERO);
  }
}
