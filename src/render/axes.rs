use crate::vec3f;
use super::{DrawContext, Material};

pub const MIN_AXIS_LENGTH: f32 = 0.5;
pub const AXIS_LINE_WIDTH: f32 = 3.0;
// arrow caps at the positive tips
pub const ARROW_BASE: f32 = 0.0625;
pub const ARROW_HEIGHT: f32 = 0.25;
// unit hash marks
pub const TICK_RADIUS: f32 = 0.075;
pub const TICK_LENGTH: f32 = 0.0312;
pub const SHAPE_SLICES: u32 = 10;
pub const SHAPE_STACKS: u32 = 1;

/// Coordinate-axis overlay: X red, Y yellow, Z blue, arrows point positive,
/// optional hash marks at unit intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisOverlay {
  axes: bool,
  hashes: bool,
  length: f32,
  pub x_axis: Material,
  pub y_axis: Material,
  pub z_axis: Material,
}
impl Default for AxisOverlay {
  fn default() -> Self {
    Self::new(false, true, 1.0)
  }
}
impl AxisOverlay {
  pub fn new(axes: bool, hashes: bool, length: f32) -> Self {
    let mut overlay = Self {
      axes,
      hashes,
      length: MIN_AXIS_LENGTH,
      x_axis: Material::new().with_diffuse(1.0, 0.0, 0.0, 1.0),
      y_axis: Material::new().with_diffuse(1.0, 1.0, 0.0, 1.0),
      z_axis: Material::new().with_diffuse(0.0, 0.0, 1.0, 1.0),
    };
    overlay.set_length(length);
    overlay
  }
  pub fn enable_axes(&mut self) {
    self.axes = true;
  }
  pub fn disable_axes(&mut self) {
    self.axes = false;
  }
  pub fn enable_hashes(&mut self) {
    self.hashes = true;
  }
  pub fn disable_hashes(&mut self) {
    self.hashes = false;
  }
  pub fn axes_enabled(&self) -> bool {
    self.axes
  }
  pub fn hashes_enabled(&self) -> bool {
    self.hashes
  }
  pub fn length(&self) -> f32 {
    self.length
  }
  /// Stores `max(length, 0.5)` and returns the previous length.
  /// Non-finite input is treated as too short.
  pub fn set_length(&mut self, length: f32) -> f32 {
    let old = self.length;
    self.length = if length.is_finite() { length.max(MIN_AXIS_LENGTH) } else { MIN_AXIS_LENGTH };
    old
  }
  /// Integer tick positions `i` with `-floor(L) <= i < L`.
  pub fn tick_positions(&self) -> std::ops::RangeInclusive<i32> {
    let first = -(self.length.floor() as i32);
    let last = self.length.ceil() as i32 - 1;
    first..=last
  }

  /// Draws the overlay into `ctx` if axes are enabled. The model-view matrix
  /// and line width are left as they were.
  pub fn draw(&self, ctx: &mut DrawContext) {
    if !self.axes {
      return;
    }
    let l = self.length;
    let prev_width = ctx.line_width();
    ctx.with_pushed_matrix(|ctx| {
      ctx.set_line_width(AXIS_LINE_WIDTH);
      self.x_axis.use_on(ctx);
      ctx.line(vec3f!(-l, 0.0, 0.0), vec3f!(l, 0.0, 0.0));
      self.y_axis.use_on(ctx);
      ctx.line(vec3f!(0.0, -l, 0.0), vec3f!(0.0, l, 0.0));
      self.z_axis.use_on(ctx);
      ctx.line(vec3f!(0.0, 0.0, -l), vec3f!(0.0, 0.0, l));

      self.x_axis.use_on(ctx);
      ctx.with_pushed_matrix(|ctx| {
        ctx.translate(l, 0.0, 0.0);
        ctx.rotate(90.0, 0.0, 1.0, 0.0);
        ctx.solid_cone(ARROW_BASE, ARROW_HEIGHT, SHAPE_SLICES, SHAPE_STACKS);
      });
      self.y_axis.use_on(ctx);
      ctx.with_pushed_matrix(|ctx| {
        ctx.translate(0.0, l, 0.0);
        ctx.rotate(90.0, -1.0, 0.0, 0.0);
        ctx.solid_cone(ARROW_BASE, ARROW_HEIGHT, SHAPE_SLICES, SHAPE_STACKS);
      });
      self.z_axis.use_on(ctx);
      ctx.with_pushed_matrix(|ctx| {
        ctx.translate(0.0, 0.0, l);
        ctx.solid_cone(ARROW_BASE, ARROW_HEIGHT, SHAPE_SLICES, SHAPE_STACKS);
      });

      if self.hashes {
        self.x_axis.use_on(ctx);
        for i in self.tick_positions() {
          ctx.with_pushed_matrix(|ctx| {
            ctx.translate(i as f32, 0.0, 0.0);
            ctx.rotate(90.0, 0.0, 1.0, 0.0);
            ctx.solid_cylinder(TICK_RADIUS, TICK_LENGTH, SHAPE_SLICES, SHAPE_STACKS);
          });
        }
        self.y_axis.use_on(ctx);
        for i in self.tick_positions() {
          ctx.with_pushed_matrix(|ctx| {
            ctx.translate(0.0, i as f32, 0.0);
            ctx.rotate(90.0, 1.0, 0.0, 0.0);
            ctx.solid_cylinder(TICK_RADIUS, TICK_LENGTH, SHAPE_SLICES, SHAPE_STACKS);
          });
        }
        self.z_axis.use_on(ctx);
        for i in self.tick_positions() {
          ctx.with_pushed_matrix(|ctx| {
            ctx.translate(0.0, 0.0, i as f32);
            ctx.solid_cylinder(TICK_RADIUS, TICK_LENGTH, SHAPE_SLICES, SHAPE_STACKS);
          });
        }
      }
    });
    ctx.set_line_width(prev_width);
  }
}
