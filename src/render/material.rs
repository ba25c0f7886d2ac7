use super::DrawContext;

/// Fixed-function default diffuse reflectance.
pub const DEFAULT_DIFFUSE: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

// --- --- --- --- --- --- --- --- --- //
// --- --- ---  MATERIAL  ---- --- --- //
// --- --- --- --- --- --- --- --- --- //

/// An RGBA diffuse color. Activating it with [`Material::use_on`] makes it the
/// current draw color of a context.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Material {
  pub r: f32,
  pub g: f32,
  pub b: f32,
  pub a: f32,
}
impl Default for Material {
  fn default() -> Self {
    Self::rgba(DEFAULT_DIFFUSE[0], DEFAULT_DIFFUSE[1], DEFAULT_DIFFUSE[2], DEFAULT_DIFFUSE[3])
  }
}
impl From<Material> for [f32; 4] {
  fn from(m: Material) -> [f32; 4] {
    m.diffuse()
  }
}
impl From<Material> for wgpu::Color {
  fn from(m: Material) -> wgpu::Color {
    wgpu::Color {
      r: m.r as f64,
      g: m.g as f64,
      b: m.b as f64,
      a: m.a as f64
    }
  }
}
impl Material {
  pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
    Self { r, g, b, a }
  }
  pub fn new() -> Self {
    Self::default()
  }
  /// Sets the diffuse color. Channels are clamped to `[0, 1]`, NaN becomes 0.
  pub fn set_diffuse(&mut self, r: f32, g: f32, b: f32, a: f32) {
    self.r = clamp_channel(r);
    self.g = clamp_channel(g);
    self.b = clamp_channel(b);
    self.a = clamp_channel(a);
  }
  pub fn with_diffuse(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
    self.set_diffuse(r, g, b, a);
    self
  }
  pub fn diffuse(&self) -> [f32; 4] {
    [self.r, self.g, self.b, self.a]
  }
  pub fn use_on(&self, ctx: &mut DrawContext) {
    ctx.use_material(self);
  }
  // pre-defined colors
  pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
  pub const ORANGE: Self = Self::rgba(1.0, 0.5, 0.0, 1.0);
  pub const YELLOW: Self = Self::rgba(1.0, 1.0, 0.0, 1.0);
  pub const GREEN: Self = Self::rgba(0.0, 1.0, 0.0, 1.0);
  pub const CYAN: Self = Self::rgba(0.0, 1.0, 1.0, 1.0);
  pub const BLUE: Self = Self::rgba(0.0, 0.0, 1.0, 1.0);
  pub const PURPLE: Self = Self::rgba(1.0, 0.0, 0.5, 1.0);
  pub const MAGENTA: Self = Self::rgba(1.0, 0.0, 1.0, 1.0);
  pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
  pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
}

fn clamp_channel(v: f32) -> f32 {
  if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

// --- --- --- --- --- --- --- --- --- //
// --- --- ---  PALETTE   ---- --- --- //
// --- --- --- --- --- --- --- --- --- //

/// The ten preset materials every model can draw with. There is one shared
/// instance for the whole process, see [`Palette::standard`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Palette {
  pub red: Material,
  pub orange: Material,
  pub yellow: Material,
  pub green: Material,
  pub cyan: Material,
  pub blue: Material,
  pub purple: Material,
  pub magenta: Material,
  pub white: Material,
  pub black: Material,
}

static STANDARD_PALETTE: Palette = Palette {
  red: Material::RED,
  orange: Material::ORANGE,
  yellow: Material::YELLOW,
  green: Material::GREEN,
  cyan: Material::CYAN,
  blue: Material::BLUE,
  purple: Material::PURPLE,
  magenta: Material::MAGENTA,
  white: Material::WHITE,
  black: Material::BLACK,
};

impl Palette {
  pub fn standard() -> &'static Palette {
    &STANDARD_PALETTE
  }
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Material)> {
    [
      ("red", &self.red),
      ("orange", &self.orange),
      ("yellow", &self.yellow),
      ("green", &self.green),
      ("cyan", &self.cyan),
      ("blue", &self.blue),
      ("purple", &self.purple),
      ("magenta", &self.magenta),
      ("white", &self.white),
      ("black", &self.black),
    ].into_iter()
  }
  pub fn get(&self, name: &str) -> Option<&Material> {
    self.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, m)| m)
  }
}
