//! Immediate-mode style 3D scaffolding on wgpu + winit: materials and a
//! shared preset palette, drawable models, a renderer lifecycle and a
//! coordinate-axis overlay.

pub mod math;
pub mod render;
pub mod renderer;
pub mod input;
pub mod shell;
pub mod config;
pub mod error;

mod app;
pub use app::{launch, Application};
