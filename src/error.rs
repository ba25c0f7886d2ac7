use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while setting up or driving the window and GPU.
#[derive(Error, Debug)]
pub enum GfxError {
  #[error("failed to create window: {0}")]
  Window(#[from] winit::error::OsError),
  #[error("event loop error: {0}")]
  EventLoop(#[from] winit::error::EventLoopError),
  #[error("failed to create surface: {0}")]
  Surface(#[from] wgpu::CreateSurfaceError),
  #[error("no compatible graphics adapter found")]
  NoAdapter,
  #[error("failed to request device: {0}")]
  Device(#[from] wgpu::RequestDeviceError),
  #[error("surface unavailable: {0}")]
  Frame(#[from] wgpu::SurfaceError),
  #[error("surface does not support any texture format")]
  NoSurfaceFormat,
  #[error(transparent)]
  Config(#[from] ConfigError),
}
