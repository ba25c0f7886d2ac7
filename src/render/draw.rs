use bytemuck::{Pod, Zeroable};

use crate::math::{Mat4, Vec3};
use super::{Material, MeshVertex, Palette, Primitives, DEFAULT_DIFFUSE};

// --- --- --- --- --- --- --- --- --- //
// --- --- - RECORDED GEOMETRY - --- --- //
// --- --- --- --- --- --- --- --- --- //

/// Eye-space triangle vertex as uploaded to the mesh pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RenderVertex {
  pub position: [f32; 3],
  pub normal: [f32; 3],
  pub color: [f32; 4],
}

/// Eye-space line segment with its width in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
  pub start: [f32; 3],
  pub end: [f32; 3],
  pub color: [f32; 4],
  pub width: f32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewport {
  pub x: i32,
  pub y: i32,
  pub width: u32,
  pub height: u32,
}

// --- --- --- --- --- --- --- --- --- //
// --- --- -- RENDER STATE --- --- --- //
// --- --- --- --- --- --- --- --- --- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
  SmoothShading,
  Normalize,
  DepthTest,
  Lighting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
  pub smooth_shading: bool,
  pub normalize: bool,
  pub depth_test: bool,
  pub lighting: bool,
  pub clear_color: [f32; 4],
}
impl Default for RenderState {
  fn default() -> Self {
    Self {
      smooth_shading: false,
      normalize: false,
      depth_test: false,
      lighting: false,
      clear_color: [0.0, 0.0, 0.0, 0.0],
    }
  }
}
impl RenderState {
  fn flag_mut(&mut self, cap: Capability) -> &mut bool {
    match cap {
      Capability::SmoothShading => &mut self.smooth_shading,
      Capability::Normalize => &mut self.normalize,
      Capability::DepthTest => &mut self.depth_test,
      Capability::Lighting => &mut self.lighting,
    }
  }
}

// --- --- --- --- --- --- --- --- --- //
// --- --- -- DRAW CONTEXT --- --- --- //
// --- --- --- --- --- --- --- --- --- //

/// CPU-side stand-in for a fixed-function drawing context.
///
/// Draw calls are transformed by the current model-view matrix and recorded
/// in eye space; the projection is applied on the GPU. The matrix stack can
/// only be pushed through [`DrawContext::with_pushed_matrix`], which always
/// restores it, so a draw routine can never leave it unbalanced.
#[derive(Debug)]
pub struct DrawContext {
  matrix_stack: Vec<Mat4>,
  projection: [f32; 16],
  viewport: Viewport,
  color: [f32; 4],
  line_width: f32,
  state: RenderState,
  palette: &'static Palette,
  // frame output
  vertices: Vec<RenderVertex>,
  indices: Vec<u32>,
  lines: Vec<LineSegment>,
  frames: u64,
  flushed: bool,
}
impl Default for DrawContext {
  fn default() -> Self {
    Self::new(Palette::standard())
  }
}
impl DrawContext {
  pub fn new(palette: &'static Palette) -> Self {
    Self {
      matrix_stack: vec![Mat4::identity()],
      projection: Mat4::IDENTITY,
      viewport: Viewport::default(),
      color: DEFAULT_DIFFUSE,
      line_width: 1.0,
      state: RenderState::default(),
      palette,
      vertices: Vec::new(),
      indices: Vec::new(),
      lines: Vec::new(),
      frames: 0,
      flushed: false,
    }
  }

  // -- -- state -- -- //
  pub fn palette(&self) -> &'static Palette {
    self.palette
  }
  pub fn state(&self) -> &RenderState {
    &self.state
  }
  pub fn enable(&mut self, cap: Capability) {
    *self.state.flag_mut(cap) = true;
  }
  pub fn disable(&mut self, cap: Capability) {
    *self.state.flag_mut(cap) = false;
  }
  pub fn is_enabled(&self, cap: Capability) -> bool {
    let mut state = self.state;
    *state.flag_mut(cap)
  }
  pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
    self.state.clear_color = [r, g, b, a];
  }
  pub fn use_material(&mut self, material: &Material) {
    self.color = material.diffuse();
  }
  pub fn current_color(&self) -> [f32; 4] {
    self.color
  }
  /// Widths below one pixel are raised to one.
  pub fn set_line_width(&mut self, width: f32) {
    self.line_width = if width.is_nan() { 1.0 } else { width.max(1.0) };
  }
  pub fn line_width(&self) -> f32 {
    self.line_width
  }
  pub fn set_projection(&mut self, projection: [f32; 16]) {
    self.projection = projection;
  }
  pub fn projection(&self) -> &[f32; 16] {
    &self.projection
  }
  pub fn set_viewport(&mut self, viewport: Viewport) {
    self.viewport = viewport;
  }
  pub fn viewport(&self) -> Viewport {
    self.viewport
  }

  // -- -- model-view matrix -- -- //
  pub fn model_view(&self) -> &Mat4 {
    // the stack always holds the base matrix
    &self.matrix_stack[self.matrix_stack.len() - 1]
  }
  fn model_view_mut(&mut self) -> &mut Mat4 {
    let top = self.matrix_stack.len() - 1;
    &mut self.matrix_stack[top]
  }
  pub fn matrix_depth(&self) -> usize {
    self.matrix_stack.len()
  }
  pub fn load_identity(&mut self) {
    *self.model_view_mut() = Mat4::identity();
  }
  pub fn translate(&mut self, x: f32, y: f32, z: f32) {
    self.model_view_mut().post_multiply(&Mat4::translate(x, y, z));
  }
  pub fn rotate(&mut self, deg: f32, x: f32, y: f32, z: f32) {
    self.model_view_mut().post_multiply(&Mat4::rotate(&Vec3::new(x, y, z), deg));
  }
  pub fn scale(&mut self, x: f32, y: f32, z: f32) {
    self.model_view_mut().post_multiply(&Mat4::scale(x, y, z));
  }
  /// Runs `f` on a copy of the current model-view matrix and restores the
  /// previous matrix afterwards, whatever `f` did to it.
  pub fn with_pushed_matrix<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
    let depth = self.matrix_stack.len();
    let top = *self.model_view();
    self.matrix_stack.push(top);
    let out = f(self);
    self.matrix_stack.truncate(depth);
    out
  }

  // -- -- drawing -- -- //
  /// Discards the geometry recorded for the previous frame.
  pub fn clear(&mut self) {
    self.vertices.clear();
    self.indices.clear();
    self.lines.clear();
    self.flushed = false;
  }
  pub fn line(&mut self, start: Vec3, end: Vec3) {
    let mv = *self.model_view();
    self.lines.push(LineSegment {
      start: mv.transform_point(start).as_array(),
      end: mv.transform_point(end).as_array(),
      color: self.color,
      width: self.line_width,
    });
  }
  /// Appends a local-space indexed triangle list in the current color.
  pub fn triangles(&mut self, verts: &[MeshVertex], indices: &[u32]) {
    let mv = *self.model_view();
    let transform_normal = |n: [f32; 3], normalize: bool| -> [f32; 3] {
      let v = mv.transform_vector(Vec3::from_array(n));
      if normalize { v.normalize().as_array() } else { v.as_array() }
    };
    let normalize = self.state.normalize;
    let color = self.color;

    if self.state.smooth_shading {
      let base = self.vertices.len() as u32;
      self.vertices.extend(verts.iter().map(|v| RenderVertex {
        position: mv.transform_point(Vec3::from_array(v.position)).as_array(),
        normal: transform_normal(v.normal, normalize),
        color,
      }));
      for tri in indices.chunks_exact(3) {
        if tri.iter().any(|i| *i as usize >= verts.len()) {
          continue;
        }
        self.indices.extend(tri.iter().map(|i| base + i));
      }
      return;
    }

    // flat shading: one face normal per triangle, vertices are not shared
    for tri in indices.chunks_exact(3) {
      if tri.iter().any(|i| *i as usize >= verts.len()) {
        continue;
      }
      let p: Vec<Vec3> = tri.iter()
        .map(|i| mv.transform_point(Vec3::from_array(verts[*i as usize].position)))
        .collect();
      let face = (p[1] - p[0]).cross(p[2] - p[0]);
      let normal = if face.magnitude() > 0.0 {
        face.normalize().as_array()
      } else {
        transform_normal(verts[tri[0] as usize].normal, normalize)
      };
      let base = self.vertices.len() as u32;
      for pos in p {
        self.vertices.push(RenderVertex { position: pos.as_array(), normal, color });
      }
      self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
  }
  pub fn solid_cone(&mut self, base: f32, height: f32, slices: u32, stacks: u32) {
    let (verts, indices) = Primitives::cone(base, height, slices, stacks);
    self.triangles(&verts, &indices);
  }
  pub fn solid_cylinder(&mut self, radius: f32, height: f32, slices: u32, stacks: u32) {
    let (verts, indices) = Primitives::cylinder(radius, height, slices, stacks);
    self.triangles(&verts, &indices);
  }
  pub fn solid_sphere(&mut self, radius: f32, slices: u32, stacks: u32) {
    let (verts, indices) = Primitives::sphere(radius, slices, stacks);
    self.triangles(&verts, &indices);
  }
  pub fn solid_cube(&mut self, size: f32) {
    let (verts, indices) = Primitives::cube(size);
    self.triangles(&verts, &indices);
  }
  /// Ends the frame. Geometry stays readable until the next [`DrawContext::clear`].
  pub fn flush(&mut self) {
    self.flushed = true;
    self.frames += 1;
  }

  // -- -- frame output -- -- //
  pub fn vertices(&self) -> &[RenderVertex] {
    &self.vertices
  }
  pub fn indices(&self) -> &[u32] {
    &self.indices
  }
  pub fn lines(&self) -> &[LineSegment] {
    &self.lines
  }
  pub fn is_flushed(&self) -> bool {
    self.flushed
  }
  pub fn frame_count(&self) -> u64 {
    self.frames
  }
}
