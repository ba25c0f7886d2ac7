use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info, warn};

use crate::config::ViewerConfig;
use crate::math::Mat4;
use crate::render::{AxisOverlay, Capability, DrawContext, Material, Viewport};
use crate::shell::Shell;

const MIN_NEAR: f32 = 0.001;
const MIN_DEPTH_RANGE: f32 = 0.001;
const FOV_RANGE: (f32, f32) = (1.0, 179.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
  Uninitialized,
  Initialized,
}

/// Per-application drawing hooks driven by the [`Renderer`].
#[allow(unused_variables)]
pub trait Scene {
  /// actions to take once the renderer is set up
  /// - adjust render state
  /// - toggle overlay defaults
  fn init(&mut self, renderer: &mut Renderer) {}
  /// draws one frame; the model-view matrix is identity and the default
  /// material is active on entry
  fn display(&mut self, ctx: &mut DrawContext) {}
  fn display_changed(&mut self, mode_changed: bool, device_changed: bool) {}
}

/// Frame lifecycle and axis overlay on top of a [`DrawContext`].
///
/// The renderer never touches the GPU itself: the windowing layer hands the
/// recorded context to the GPU context after every [`Renderer::display`].
#[derive(Debug)]
pub struct Renderer {
  lifecycle: Lifecycle,
  ctx: DrawContext,
  overlay: AxisOverlay,
  default_material: Material,
  aspect: f32,
  // projection settings
  fov_y: f32,
  near: f32,
  far: f32,
  // init defaults
  clear_color: [f32; 4],
  lighting: bool,
  axes: bool,
  hashes: bool,
  axis_length: f32,
  shell: Option<Weak<RefCell<dyn Shell>>>,
}
impl Default for Renderer {
  fn default() -> Self {
    Self::new(&ViewerConfig::default())
  }
}
impl Renderer {
  /// Projection settings are clamped to a usable frustum.
  pub fn new(config: &ViewerConfig) -> Self {
    let (fov_y, near, far) = clamp_projection(config.fov_y, config.near, config.far);
    if (fov_y, near, far) != (config.fov_y, config.near, config.far) {
      warn!(
        "projection clamped to fov {fov_y}, near {near}, far {far} (was {}, {}, {})",
        config.fov_y, config.near, config.far
      );
    }
    Self {
      lifecycle: Lifecycle::Uninitialized,
      ctx: DrawContext::default(),
      overlay: AxisOverlay::new(config.axes, config.hashes, config.axis_length),
      default_material: Material::default(),
      aspect: 1.0,
      fov_y,
      near,
      far,
      clear_color: config.clear_color,
      lighting: config.lighting,
      axes: config.axes,
      hashes: config.hashes,
      axis_length: config.axis_length,
      shell: None,
    }
  }
  pub fn lifecycle(&self) -> Lifecycle {
    self.lifecycle
  }
  pub fn context(&self) -> &DrawContext {
    &self.ctx
  }
  pub fn context_mut(&mut self) -> &mut DrawContext {
    &mut self.ctx
  }
  pub fn aspect_ratio(&self) -> f32 {
    self.aspect
  }

  // --- --- --- --- --- --- --- --- --- //
  // --- --- - LIFECYCLE HOOKS - --- --- //
  // --- --- --- --- --- --- --- --- --- //

  /// One-time setup. Later calls are ignored.
  pub fn init<S: Scene + ?Sized>(&mut self, scene: &mut S) {
    if self.lifecycle == Lifecycle::Initialized {
      warn!("renderer already initialized, ignoring init");
      return;
    }
    self.ctx.enable(Capability::SmoothShading);
    self.ctx.enable(Capability::Normalize);
    self.ctx.enable(Capability::DepthTest);
    if self.lighting {
      self.ctx.enable(Capability::Lighting);
    }
    let [r, g, b, a] = self.clear_color;
    self.ctx.set_clear_color(r, g, b, a);
    self.default_material = Material::new();
    self.overlay = AxisOverlay::new(self.axes, self.hashes, self.axis_length);
    self.lifecycle = Lifecycle::Initialized;
    info!(
      "renderer initialized (axes: {}, hashes: {}, length: {})",
      self.overlay.axes_enabled(), self.overlay.hashes_enabled(), self.overlay.length()
    );
    scene.init(self);
  }

  /// Sets the viewport to `(0, 0, width, height)` and a perspective
  /// projection for the new canvas size. A height of zero or less is treated
  /// as one. The origin is only logged.
  pub fn reshape(&mut self, x: i32, y: i32, width: i32, height: i32) {
    let height = height.max(1);
    let width = width.max(0);
    self.aspect = width as f32 / height as f32;
    self.ctx.set_viewport(Viewport { x: 0, y: 0, width: width as u32, height: height as u32 });
    self.ctx.set_projection(Mat4::perspective(self.fov_y, self.aspect, self.near, self.far));
    self.ctx.load_identity();
    debug!("reshape {width}x{height} at ({x}, {y}), aspect {}", self.aspect);
  }
  pub fn projection_settings(&self) -> (f32, f32, f32) {
    (self.fov_y, self.near, self.far)
  }

  /// Records one frame. Returns false when nothing was drawn.
  ///
  /// The overlay is drawn with the model-view matrix the scene left behind,
  /// so a camera transform applied in [`Scene::display`] also moves the axes.
  pub fn display<S: Scene + ?Sized>(&mut self, scene: &mut S) -> bool {
    if self.lifecycle != Lifecycle::Initialized {
      warn!("display called before init, skipping frame");
      return false;
    }
    self.ctx.clear();
    self.ctx.load_identity();
    self.default_material.use_on(&mut self.ctx);
    scene.display(&mut self.ctx);
    self.overlay.draw(&mut self.ctx);
    self.ctx.flush();
    true
  }

  pub fn display_changed<S: Scene + ?Sized>(&mut self, scene: &mut S, mode_changed: bool, device_changed: bool) {
    debug!("display changed (mode: {mode_changed}, device: {device_changed})");
    scene.display_changed(mode_changed, device_changed);
  }

  // --- --- --- --- --- --- --- --- --- //
  // --- --- --- AXIS OVERLAY -- --- --- //
  // --- --- --- --- --- --- --- --- --- //

  pub fn overlay(&self) -> &AxisOverlay {
    &self.overlay
  }
  pub fn overlay_mut(&mut self) -> &mut AxisOverlay {
    &mut self.overlay
  }
  pub fn enable_axes(&mut self) {
    self.overlay.enable_axes();
  }
  pub fn disable_axes(&mut self) {
    self.overlay.disable_axes();
  }
  pub fn enable_hashes(&mut self) {
    self.overlay.enable_hashes();
  }
  pub fn disable_hashes(&mut self) {
    self.overlay.disable_hashes();
  }
  pub fn axes_enabled(&self) -> bool {
    self.overlay.axes_enabled()
  }
  pub fn hashes_enabled(&self) -> bool {
    self.overlay.hashes_enabled()
  }
  pub fn axis_length(&self) -> f32 {
    self.overlay.length()
  }
  /// Stores `max(length, 0.5)` and returns the previous length.
  pub fn set_axis_length(&mut self, length: f32) -> f32 {
    self.overlay.set_length(length)
  }

  // --- --- --- --- --- --- --- --- --- //
  // --- --- --- --- SHELL --- --- --- --- //
  // --- --- --- --- --- --- --- --- --- //

  /// Associates a shell without keeping it alive.
  pub fn register_shell<T: Shell + 'static>(&mut self, shell: &Rc<RefCell<T>>) {
    let shell: Rc<RefCell<dyn Shell>> = shell.clone();
    self.shell = Some(Rc::downgrade(&shell));
  }
  /// The registered shell, if it still exists.
  pub fn shell(&self) -> Option<Rc<RefCell<dyn Shell>>> {
    self.shell.as_ref().and_then(Weak::upgrade)
  }
  /// Prints to the registered shell. Returns false when there is none.
  pub fn print(&self, line: &str) -> bool {
    match self.shell() {
      Some(shell) => {
        shell.borrow_mut().print(line);
        true
      }
      None => false,
    }
  }
}

// NaN falls back to the default frustum
fn clamp_projection(fov_y: f32, near: f32, far: f32) -> (f32, f32, f32) {
  let defaults = ViewerConfig::default();
  let fov_y = if fov_y.is_nan() { defaults.fov_y } else { fov_y.clamp(FOV_RANGE.0, FOV_RANGE.1) };
  let near = if near.is_nan() { defaults.near } else { near.max(MIN_NEAR) };
  let far = if far.is_nan() { defaults.far } else { far };
  (fov_y, near, far.max(near + MIN_DEPTH_RANGE))
}

#[cfg(test)]
mod lifecycle_tests {
  use super::*;
  use crate::math::Vec3;
  use crate::shell::CommandLine;
  use approx::assert_relative_eq;

  #[derive(Default)]
  struct Recorder {
    inits: u32,
    frames: u32,
    changes: Vec<(bool, bool)>,
    depth_in_display: usize,
  }
  impl Scene for Recorder {
    fn init(&mut self, renderer: &mut Renderer) {
      self.inits += 1;
      renderer.enable_axes();
    }
    fn display(&mut self, ctx: &mut DrawContext) {
      self.frames += 1;
      self.depth_in_display = ctx.matrix_depth();
      ctx.line(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
    }
    fn display_changed(&mut self, mode_changed: bool, device_changed: bool) {
      self.changes.push((mode_changed, device_changed));
    }
  }

  #[test]
  fn init_sets_state_once() {
    let mut gl = Renderer::default();
    let mut scene = Recorder::default();
    assert_eq!(gl.lifecycle(), Lifecycle::Uninitialized);
    gl.init(&mut scene);
    gl.init(&mut scene);
    assert_eq!(scene.inits, 1);
    assert_eq!(gl.lifecycle(), Lifecycle::Initialized);
    let ctx = gl.context();
    assert!(ctx.is_enabled(Capability::SmoothShading));
    assert!(ctx.is_enabled(Capability::Normalize));
    assert!(ctx.is_enabled(Capability::DepthTest));
    assert!(!ctx.is_enabled(Capability::Lighting));
    assert_eq!(ctx.state().clear_color, [0.0, 0.0, 0.0, 0.0]);
  }
  #[test]
  fn overlay_defaults() {
    let gl = Renderer::default();
    assert!(!gl.axes_enabled());
    assert!(gl.hashes_enabled());
    assert_eq!(gl.axis_length(), 1.0);
  }
  #[test]
  fn config_overrides_overlay_defaults() {
    let config = ViewerConfig { axes: true, hashes: false, axis_length: 0.2, ..ViewerConfig::default() };
    let gl = Renderer::new(&config);
    assert!(gl.axes_enabled());
    assert!(!gl.hashes_enabled());
    assert_eq!(gl.axis_length(), 0.5);
  }
  #[test]
  fn set_axis_length_returns_previous() {
    let mut gl = Renderer::default();
    assert_eq!(gl.set_axis_length(3.0), 1.0);
    assert_eq!(gl.set_axis_length(0.25), 3.0);
    assert_eq!(gl.axis_length(), 0.5);
  }
  #[test]
  fn reshape_zero_height() {
    let mut gl = Renderer::default();
    gl.reshape(0, 0, 640, 0);
    assert_relative_eq!(gl.aspect_ratio(), 640.0);
    assert_eq!(gl.context().viewport(), Viewport { x: 0, y: 0, width: 640, height: 1 });
    assert!(gl.context().projection().iter().all(|v| v.is_finite()));
  }
  #[test]
  fn reshape_ignores_origin() {
    let mut gl = Renderer::default();
    gl.reshape(10, 20, 640, 480);
    assert_eq!(gl.context().viewport(), Viewport { x: 0, y: 0, width: 640, height: 480 });
  }
  #[test]
  fn degenerate_projection_is_clamped() {
    let config = ViewerConfig { fov_y: 200.0, near: 1.0, far: 1.0, ..ViewerConfig::default() };
    let mut gl = Renderer::new(&config);
    let (fov_y, near, far) = gl.projection_settings();
    assert_eq!(fov_y, 179.0);
    assert!(far > near);
    gl.reshape(0, 0, 640, 480);
    assert!(gl.context().projection().iter().all(|v| v.is_finite()));

    let config = ViewerConfig { fov_y: -5.0, near: -1.0, far: f32::NAN, ..ViewerConfig::default() };
    let gl = Renderer::new(&config);
    let (fov_y, near, far) = gl.projection_settings();
    assert_eq!(fov_y, 1.0);
    assert!(near > 0.0);
    assert_eq!(far, 100.0);
  }
  #[test]
  fn valid_projection_is_kept() {
    let gl = Renderer::default();
    assert_eq!(gl.projection_settings(), (45.0, 0.1, 100.0));
  }
  #[test]
  fn init_restores_overlay_defaults() {
    let config = ViewerConfig { hashes: false, axis_length: 2.0, ..ViewerConfig::default() };
    let mut gl = Renderer::new(&config);
    gl.enable_hashes();
    gl.set_axis_length(5.0);
    gl.disable_axes();
    gl.init(&mut Recorder::default());
    // the scene hook runs after the defaults are applied
    assert!(gl.axes_enabled());
    assert!(!gl.hashes_enabled());
    assert_eq!(gl.axis_length(), 2.0);
  }
  #[test]
  fn reshape_sets_projection() {
    let mut gl = Renderer::default();
    gl.context_mut().translate(1.0, 0.0, 0.0);
    gl.reshape(0, 0, 800, 600);
    assert_relative_eq!(gl.aspect_ratio(), 800.0 / 600.0);
    let expected = Mat4::perspective(45.0, 800.0 / 600.0, 0.1, 100.0);
    assert_eq!(*gl.context().projection(), expected);
    assert_eq!(*gl.context().model_view(), Mat4::identity());
  }
  #[test]
  fn display_before_init_draws_nothing() {
    let mut gl = Renderer::default();
    let mut scene = Recorder::default();
    assert!(!gl.display(&mut scene));
    assert_eq!(scene.frames, 0);
    assert_eq!(gl.context().frame_count(), 0);
  }
  #[test]
  fn display_runs_scene_then_overlay() {
    let mut gl = Renderer::default();
    let mut scene = Recorder::default();
    gl.init(&mut scene);
    gl.reshape(0, 0, 100, 100);
    assert!(gl.display(&mut scene));
    assert_eq!(scene.frames, 1);
    assert_eq!(scene.depth_in_display, 1);
    let ctx = gl.context();
    assert!(ctx.is_flushed());
    // scene line first, then three axis lines
    assert_eq!(ctx.lines().len(), 4);
    assert_eq!(ctx.lines()[0].color, Material::default().diffuse());
    assert_eq!(ctx.lines()[1].color, Material::RED.diffuse());
    assert_eq!(ctx.matrix_depth(), 1);
    // the next frame starts from scratch
    gl.disable_axes();
    gl.display(&mut scene);
    assert_eq!(gl.context().lines().len(), 1);
    assert_eq!(gl.context().frame_count(), 2);
  }
  #[test]
  fn display_changed_is_forwarded() {
    let mut gl = Renderer::default();
    let mut scene = Recorder::default();
    gl.display_changed(&mut scene, true, false);
    assert_eq!(scene.changes, vec![(true, false)]);
  }
  #[test]
  fn shell_is_weak() {
    let mut gl = Renderer::default();
    assert!(gl.shell().is_none());
    assert!(!gl.print("nothing"));
    let shell = Rc::new(RefCell::new(CommandLine::new()));
    gl.register_shell(&shell);
    assert!(gl.print("hello"));
    assert_eq!(shell.borrow().output(), &["hello".to_owned()]);
    drop(shell);
    assert!(gl.shell().is_none());
  }
}
