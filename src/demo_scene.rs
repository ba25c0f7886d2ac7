use log::info;
use winit::keyboard::KeyCode;

use simpler::input::{KeyHandler, KeyInput, MouseHandler, MouseInput};
use simpler::math::Vec2;
use simpler::render::{Capability, DrawContext, Material, Model};
use simpler::renderer::{Renderer, Scene};
use simpler::shell::{ShellEvent, ShellListener};

const LENGTH_STEP: f32 = 0.5;
const DRAG_DEG_PER_PX: f32 = 0.4;

// --- --- --- --- --- --- --- --- --- //
// --- --- --- --- MODELS -- --- --- --- //
// --- --- --- --- --- --- --- --- --- //

/// Cone on a cylinder on a cube.
#[derive(Debug, Clone)]
pub struct Totem {
  pub position: [f32; 3],
  pub body: Material,
}
impl Model for Totem {
  fn draw(&self, ctx: &mut DrawContext) {
    let [x, y, z] = self.position;
    ctx.translate(x, y, z);
    let palette = self.palette(ctx);
    palette.white.use_on(ctx);
    ctx.solid_cube(0.5);
    ctx.translate(0.0, 0.25, 0.0);
    ctx.rotate(90.0, -1.0, 0.0, 0.0);
    self.body.use_on(ctx);
    ctx.solid_cylinder(0.15, 0.6, 16, 2);
    ctx.translate(0.0, 0.0, 0.6);
    palette.orange.use_on(ctx);
    ctx.solid_cone(0.25, 0.4, 16, 1);
  }
}

/// Ring of spheres, one per palette color.
#[derive(Debug, Clone)]
pub struct PaletteRing {
  pub radius: f32,
}
impl Model for PaletteRing {
  fn draw(&self, ctx: &mut DrawContext) {
    let palette = self.palette(ctx);
    let step = 360.0 / palette.iter().count() as f32;
    for (_, material) in palette.iter() {
      ctx.rotate(step, 0.0, 1.0, 0.0);
      material.use_on(ctx);
      ctx.with_pushed_matrix(|ctx| {
        ctx.translate(self.radius, 0.0, 0.0);
        ctx.solid_sphere(0.12, 12, 8);
      });
    }
  }
}

// --- --- --- --- --- --- --- --- --- //
// --- --- --- DEMO SCENE --- --- --- //
// --- --- --- --- --- --- --- --- --- //

#[derive(Debug)]
pub struct DemoScene {
  totems: Vec<Totem>,
  ring: PaletteRing,
  yaw: f32,
  pitch: f32,
  distance: f32,
  drag_from: Option<Vec2>,
}
impl Default for DemoScene {
  fn default() -> Self {
    Self {
      totems: vec![
        Totem { position: [-1.0, 0.0, 0.0], body: Material::CYAN },
        Totem { position: [1.0, 0.0, 0.0], body: Material::PURPLE },
      ],
      ring: PaletteRing { radius: 2.0 },
      yaw: 30.0,
      pitch: 20.0,
      distance: 7.0,
      drag_from: None,
    }
  }
}
impl DemoScene {
  fn toggle_axes(renderer: &mut Renderer) {
    if renderer.axes_enabled() { renderer.disable_axes() } else { renderer.enable_axes() }
  }
  fn toggle_hashes(renderer: &mut Renderer) {
    if renderer.hashes_enabled() { renderer.disable_hashes() } else { renderer.enable_hashes() }
  }
  fn toggle_lighting(renderer: &mut Renderer) {
    let ctx = renderer.context_mut();
    if ctx.is_enabled(Capability::Lighting) {
      ctx.disable(Capability::Lighting);
    } else {
      ctx.enable(Capability::Lighting);
    }
  }
  /// Runs one shell command, returning the line to print back.
  pub fn run_command(&mut self, renderer: &mut Renderer, event: &ShellEvent) -> String {
    let flag = |arg: Option<&str>| match arg {
      Some("on") => Some(true),
      Some("off") => Some(false),
      _ => None,
    };
    match (event.command.as_str(), event.arg(0)) {
      ("axes", arg) => match flag(arg) {
        Some(true) => { renderer.enable_axes(); "axes on".to_owned() }
        Some(false) => { renderer.disable_axes(); "axes off".to_owned() }
        None => "usage: axes on|off".to_owned(),
      },
      ("hashes", arg) => match flag(arg) {
        Some(true) => { renderer.enable_hashes(); "hashes on".to_owned() }
        Some(false) => { renderer.disable_hashes(); "hashes off".to_owned() }
        None => "usage: hashes on|off".to_owned(),
      },
      ("length", Some(arg)) => match arg.parse::<f32>() {
        Ok(length) => {
          let old = renderer.set_axis_length(length);
          format!("axis length {} (was {old})", renderer.axis_length())
        }
        Err(_) => format!("not a number: {arg}"),
      },
      ("color", Some(name)) => match renderer.context().palette().get(name) {
        Some(material) => {
          for totem in &mut self.totems {
            totem.body = *material;
          }
          format!("totems are now {name}")
        }
        None => format!("unknown color: {name}"),
      },
      ("help", _) => "commands: axes on|off, hashes on|off, length <n>, color <name>".to_owned(),
      (other, _) => format!("unknown command: {other}"),
    }
  }
}
impl Scene for DemoScene {
  fn init(&mut self, renderer: &mut Renderer) {
    renderer.enable_axes();
    info!("press A for axes, H for hash marks, L for lighting, +/- for axis length, ` for the shell");
  }
  fn display(&mut self, ctx: &mut DrawContext) {
    // camera, the axis overlay is drawn in this frame too
    ctx.translate(0.0, 0.0, -self.distance);
    ctx.rotate(self.pitch, 1.0, 0.0, 0.0);
    ctx.rotate(self.yaw, 0.0, 1.0, 0.0);
    self.totems.as_slice().draw(ctx);
    ctx.with_pushed_matrix(|ctx| self.ring.draw(ctx));
  }
  fn display_changed(&mut self, mode_changed: bool, device_changed: bool) {
    info!("display changed (mode: {mode_changed}, device: {device_changed})");
  }
}
impl KeyHandler for DemoScene {
  fn key_pressed(&mut self, renderer: &mut Renderer, event: &KeyInput) {
    match event.code {
      KeyCode::KeyA => Self::toggle_axes(renderer),
      KeyCode::KeyH => Self::toggle_hashes(renderer),
      KeyCode::KeyL => Self::toggle_lighting(renderer),
      KeyCode::Equal | KeyCode::NumpadAdd => {
        let length = renderer.axis_length() + LENGTH_STEP;
        renderer.set_axis_length(length);
      }
      KeyCode::Minus | KeyCode::NumpadSubtract => {
        let length = renderer.axis_length() - LENGTH_STEP;
        renderer.set_axis_length(length);
      }
      _ => (),
    }
  }
}
impl MouseHandler for DemoScene {
  fn mouse_pressed(&mut self, _renderer: &mut Renderer, event: &MouseInput) {
    self.drag_from = Some(event.position);
  }
  fn mouse_released(&mut self, _renderer: &mut Renderer, _event: &MouseInput) {
    self.drag_from = None;
  }
  fn mouse_dragged(&mut self, _renderer: &mut Renderer, event: &MouseInput) {
    if let Some(from) = self.drag_from {
      let delta = event.position - from;
      self.yaw += delta.x * DRAG_DEG_PER_PX;
      self.pitch = (self.pitch + delta.y * DRAG_DEG_PER_PX).clamp(-89.0, 89.0);
      self.drag_from = Some(event.position);
    }
  }
}
impl ShellListener for DemoScene {
  fn command_complete(&mut self, renderer: &mut Renderer, event: &ShellEvent) {
    let reply = self.run_command(renderer, event);
    renderer.print(&reply);
  }
}
