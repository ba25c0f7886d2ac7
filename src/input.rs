use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::math::Vec2;
use crate::renderer::Renderer;

// --- --- --- --- --- --- --- --- --- //
// --- --- ---- INPUT EVENTS --- --- --- //
// --- --- --- --- --- --- --- --- --- //

#[derive(Debug, Clone, PartialEq)]
pub struct KeyInput {
  pub code: KeyCode,
  pub text: Option<String>,
  pub repeat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseInput {
  pub button: Option<MouseButton>,
  pub position: Vec2,
}

/// Keyboard callbacks. Every method defaults to a no-op.
#[allow(unused_variables)]
pub trait KeyHandler {
  /// first press of a key, repeats are not reported
  fn key_pressed(&mut self, renderer: &mut Renderer, event: &KeyInput) {}
  fn key_released(&mut self, renderer: &mut Renderer, event: &KeyInput) {}
  /// text produced by a press, including auto-repeat
  fn key_typed(&mut self, renderer: &mut Renderer, event: &KeyInput) {}
}

/// Mouse callbacks. Every method defaults to a no-op.
#[allow(unused_variables)]
pub trait MouseHandler {
  fn mouse_pressed(&mut self, renderer: &mut Renderer, event: &MouseInput) {}
  fn mouse_released(&mut self, renderer: &mut Renderer, event: &MouseInput) {}
  /// press and release of the same button without dragging in between
  fn mouse_clicked(&mut self, renderer: &mut Renderer, event: &MouseInput) {}
  fn mouse_moved(&mut self, renderer: &mut Renderer, event: &MouseInput) {}
  /// movement while at least one button is held
  fn mouse_dragged(&mut self, renderer: &mut Renderer, event: &MouseInput) {}
  fn mouse_entered(&mut self, renderer: &mut Renderer, event: &MouseInput) {}
  fn mouse_exited(&mut self, renderer: &mut Renderer, event: &MouseInput) {}
}

// --- --- --- --- --- --- --- --- --- //
// --- --- --- KEY TRACKING -- --- --- //
// --- --- --- --- --- --- --- --- --- //

/// Turns raw key events into pressed / released / typed callbacks.
pub fn dispatch_key<H: KeyHandler + ?Sized>(handler: &mut H, renderer: &mut Renderer, event: &KeyInput, pressed: bool) {
  if pressed {
    if !event.repeat {
      handler.key_pressed(renderer, event);
    }
    if event.text.as_ref().is_some_and(|t| !t.is_empty()) {
      handler.key_typed(renderer, event);
    }
  } else {
    handler.key_released(renderer, event);
  }
}

// --- --- --- --- --- --- --- --- --- //
// --- --- -- MOUSE TRACKING -- --- --- //
// --- --- --- --- --- --- --- --- --- //

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MKBState { None, Pressed, Down, Released }

/// Tracks cursor and button state between winit events to synthesize the
/// clicked and dragged callbacks.
#[derive(Debug, Clone)]
pub struct MouseTracker {
  position: Vec2,
  left: MKBState,
  right: MKBState,
  middle: MKBState,
  dragged: bool,
  inside: bool,
}
impl Default for MouseTracker {
  fn default() -> Self {
    Self {
      position: Vec2::new(0.0, 0.0),
      left: MKBState::None,
      right: MKBState::None,
      middle: MKBState::None,
      dragged: false,
      inside: false,
    }
  }
}
impl MouseTracker {
  pub fn position(&self) -> Vec2 {
    self.position
  }
  pub fn is_inside(&self) -> bool {
    self.inside
  }
  fn state_mut(&mut self, button: MouseButton) -> Option<&mut MKBState> {
    match button {
      MouseButton::Left => Some(&mut self.left),
      MouseButton::Right => Some(&mut self.right),
      MouseButton::Middle => Some(&mut self.middle),
      _ => None,
    }
  }
  pub fn button_state(&self, button: MouseButton) -> MKBState {
    match button {
      MouseButton::Left => self.left,
      MouseButton::Right => self.right,
      MouseButton::Middle => self.middle,
      _ => MKBState::None,
    }
  }
  fn any_down(&self) -> bool {
    [self.left, self.right, self.middle].iter()
      .any(|s| matches!(s, MKBState::Pressed | MKBState::Down))
  }
  pub fn on_button<H: MouseHandler + ?Sized>(&mut self, handler: &mut H, renderer: &mut Renderer, button: MouseButton, pressed: bool) {
    let event = MouseInput { button: Some(button), position: self.position };
    if pressed {
      if !self.any_down() {
        self.dragged = false;
      }
      if let Some(s) = self.state_mut(button) {
        *s = MKBState::Pressed;
      }
      handler.mouse_pressed(renderer, &event);
      return;
    }
    let was_down = matches!(self.button_state(button), MKBState::Pressed | MKBState::Down);
    if let Some(s) = self.state_mut(button) {
      *s = MKBState::Released;
    }
    handler.mouse_released(renderer, &event);
    if was_down && !self.dragged {
      handler.mouse_clicked(renderer, &event);
    }
  }
  pub fn on_move<H: MouseHandler + ?Sized>(&mut self, handler: &mut H, renderer: &mut Renderer, position: Vec2) {
    self.position = position;
    let event = MouseInput { button: None, position };
    if self.any_down() {
      self.dragged = true;
      handler.mouse_dragged(renderer, &event);
    } else {
      handler.mouse_moved(renderer, &event);
    }
  }
  pub fn on_enter<H: MouseHandler + ?Sized>(&mut self, handler: &mut H, renderer: &mut Renderer) {
    self.inside = true;
    handler.mouse_entered(renderer, &MouseInput { button: None, position: self.position });
  }
  pub fn on_leave<H: MouseHandler + ?Sized>(&mut self, handler: &mut H, renderer: &mut Renderer) {
    self.inside = false;
    handler.mouse_exited(renderer, &MouseInput { button: None, position: self.position });
  }
  /// Advances pressed -> down and released -> none; call once per frame.
  pub fn frame_sync(&mut self) {
    for s in [&mut self.left, &mut self.right, &mut self.middle] {
      *s = match *s {
        MKBState::Pressed => MKBState::Down,
        MKBState::Released => MKBState::None,
        other => other,
      };
    }
  }
}

#[cfg(test)]
mod input_tests {
  use super::*;

  #[derive(Default)]
  struct Recorder {
    log: Vec<&'static str>,
  }
  impl KeyHandler for Recorder {
    fn key_pressed(&mut self, _r: &mut Renderer, _event: &KeyInput) { self.log.push("pressed"); }
    fn key_released(&mut self, _r: &mut Renderer, _event: &KeyInput) { self.log.push("released"); }
    fn key_typed(&mut self, _r: &mut Renderer, _event: &KeyInput) { self.log.push("typed"); }
  }
  impl MouseHandler for Recorder {
    fn mouse_pressed(&mut self, _r: &mut Renderer, _event: &MouseInput) { self.log.push("pressed"); }
    fn mouse_released(&mut self, _r: &mut Renderer, _event: &MouseInput) { self.log.push("released"); }
    fn mouse_clicked(&mut self, _r: &mut Renderer, _event: &MouseInput) { self.log.push("clicked"); }
    fn mouse_moved(&mut self, _r: &mut Renderer, _event: &MouseInput) { self.log.push("moved"); }
    fn mouse_dragged(&mut self, _r: &mut Renderer, _event: &MouseInput) { self.log.push("dragged"); }
    fn mouse_entered(&mut self, _r: &mut Renderer, _event: &MouseInput) { self.log.push("entered"); }
    fn mouse_exited(&mut self, _r: &mut Renderer, _event: &MouseInput) { self.log.push("exited"); }
  }

  fn key(text: Option<&str>, repeat: bool) -> KeyInput {
    KeyInput { code: KeyCode::KeyA, text: text.map(str::to_owned), repeat }
  }

  #[test]
  fn repeat_only_types() {
    let mut r = Recorder::default();
    let mut gl = Renderer::default();
    dispatch_key(&mut r, &mut gl, &key(Some("a"), false), true);
    dispatch_key(&mut r, &mut gl, &key(Some("a"), true), true);
    dispatch_key(&mut r, &mut gl, &key(None, false), false);
    assert_eq!(r.log, vec!["pressed", "typed", "typed", "released"]);
  }
  #[test]
  fn click_without_drag() {
    let mut r = Recorder::default();
    let mut gl = Renderer::default();
    let mut m = MouseTracker::default();
    m.on_move(&mut r, &mut gl, Vec2::new(10.0, 10.0));
    m.on_button(&mut r, &mut gl, MouseButton::Left, true);
    m.on_button(&mut r, &mut gl, MouseButton::Left, false);
    assert_eq!(r.log, vec!["moved", "pressed", "released", "clicked"]);
  }
  #[test]
  fn drag_suppresses_click() {
    let mut r = Recorder::default();
    let mut gl = Renderer::default();
    let mut m = MouseTracker::default();
    m.on_button(&mut r, &mut gl, MouseButton::Right, true);
    m.frame_sync();
    m.on_move(&mut r, &mut gl, Vec2::new(5.0, 0.0));
    m.on_button(&mut r, &mut gl, MouseButton::Right, false);
    m.on_move(&mut r, &mut gl, Vec2::new(6.0, 0.0));
    assert_eq!(r.log, vec!["pressed", "dragged", "released", "moved"]);
    assert_eq!(m.position(), Vec2::new(6.0, 0.0));
  }
  #[test]
  fn frame_sync_advances_states() {
    let mut r = Recorder::default();
    let mut gl = Renderer::default();
    let mut m = MouseTracker::default();
    m.on_button(&mut r, &mut gl, MouseButton::Left, true);
    assert_eq!(m.button_state(MouseButton::Left), MKBState::Pressed);
    m.frame_sync();
    assert_eq!(m.button_state(MouseButton::Left), MKBState::Down);
    m.on_button(&mut r, &mut gl, MouseButton::Left, false);
    m.frame_sync();
    assert_eq!(m.button_state(MouseButton::Left), MKBState::None);
  }
  #[test]
  fn enter_and_leave() {
    let mut r = Recorder::default();
    let mut gl = Renderer::default();
    let mut m = MouseTracker::default();
    m.on_enter(&mut r, &mut gl);
    assert!(m.is_inside());
    m.on_leave(&mut r, &mut gl);
    assert!(!m.is_inside());
    assert_eq!(r.log, vec!["entered", "exited"]);
  }
}
