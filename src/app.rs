use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{KeyEvent, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use wgpu::SurfaceError;

use crate::config::ViewerConfig;
use crate::error::GfxError;
use crate::input::{dispatch_key, KeyHandler, KeyInput, MouseHandler, MouseTracker};
use crate::renderer::{GpuContext, Renderer, Scene};
use crate::shell::{CommandLine, ShellListener};
use crate::vec2f;

/// Everything the windowing layer drives: lifecycle hooks, input and shell
/// callbacks.
pub trait Application: Scene + KeyHandler + MouseHandler + ShellListener {}
impl<T: Scene + KeyHandler + MouseHandler + ShellListener> Application for T {}

// canvas sizes come in as u32, the lifecycle takes signed sizes
fn to_i32(v: u32) -> i32 {
  i32::try_from(v).unwrap_or(i32::MAX)
}

// --- --- --- --- --- --- --- --- --- //
// --- --- WINIT + WGPU SETUP ---- --- //
// --- --- --- --- --- --- --- --- --- //

#[derive(Debug)]
struct WinitApp<S> {
  wait_duration: Duration,
  last_frame: Instant,
  window_attributes: WindowAttributes,
  window: Option<Arc<Window>>,
  gpu: Option<GpuContext>,
  renderer: Renderer,
  // input handling
  mouse: MouseTracker,
  shell: Rc<RefCell<CommandLine>>,
  shell_open: bool,
  // app state separation
  scene: S,
  error: Option<GfxError>,
}
impl<S: Application> WinitApp<S> {
  fn new(config: &ViewerConfig, scene: S) -> Self {
    let window_attributes = Window::default_attributes()
      .with_min_inner_size(PhysicalSize::new(config.min_size.0, config.min_size.1))
      .with_inner_size(PhysicalSize::new(config.size.0, config.size.1))
      .with_resizable(config.resizable)
      .with_title(config.title.as_str());
    Self {
      wait_duration: config.frame_interval(),
      last_frame: Instant::now(),
      window_attributes,
      window: None,
      gpu: None,
      renderer: Renderer::new(config),
      mouse: MouseTracker::default(),
      shell: Rc::new(RefCell::new(CommandLine::new())),
      shell_open: false,
      scene,
      error: None,
    }
  }
  fn fail(&mut self, event_loop: &ActiveEventLoop, err: GfxError) {
    error!("{err}");
    self.error = Some(err);
    event_loop.exit();
  }
  fn resize(&mut self, size: PhysicalSize<u32>) {
    if let Some(gpu) = &mut self.gpu {
      gpu.resize(size.width, size.height);
    }
    self.renderer.reshape(0, 0, to_i32(size.width), to_i32(size.height));
  }
  fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
    let PhysicalKey::Code(code) = event.physical_key else {
      return;
    };
    let pressed = event.state.is_pressed();
    if pressed && !event.repeat {
      match code {
        KeyCode::Escape => {
          event_loop.exit();
          return;
        }
        KeyCode::Backquote => {
          self.shell_open = !self.shell_open;
          info!("shell {}", if self.shell_open { "opened" } else { "closed" });
          return;
        }
        _ => (),
      }
    }
    let input = KeyInput {
      code,
      text: event.text.as_ref().map(|t| t.to_string()),
      repeat: event.repeat,
    };
    if !self.shell_open {
      dispatch_key(&mut self.scene, &mut self.renderer, &input, pressed);
      return;
    }
    if !pressed {
      return;
    }
    if let Some(text) = &input.text {
      let submitted = self.shell.borrow_mut().push_str(text);
      if let Some(command) = submitted {
        self.scene.command_complete(&mut self.renderer, &command);
      }
    }
  }
  fn redraw(&mut self, event_loop: &ActiveEventLoop) {
    self.mouse.frame_sync();
    if !self.renderer.display(&mut self.scene) {
      return;
    }
    let Some(gpu) = &mut self.gpu else {
      return;
    };
    match gpu.render(self.renderer.context()) {
      Ok(_) => (),
      Err(SurfaceError::Lost | SurfaceError::Outdated) => {
        warn!("surface was lost or outdated, reconfiguring");
        gpu.reconfigure();
        self.renderer.display_changed(&mut self.scene, false, true);
      }
      Err(SurfaceError::OutOfMemory) => {
        self.fail(event_loop, GfxError::Frame(SurfaceError::OutOfMemory));
      }
      Err(e) => warn!("dropped frame: {e}"),
    }
  }
}
impl<S: Application> ApplicationHandler for WinitApp<S> {
  // initialization
  fn resumed(&mut self, event_loop: &ActiveEventLoop) {
    if self.gpu.is_some() {
      debug!("resuming event loop");
      return;
    }
    let window = match event_loop.create_window(self.window_attributes.clone()) {
      Ok(win) => Arc::new(win),
      Err(e) => return self.fail(event_loop, e.into()),
    };
    let gpu = match pollster::block_on(GpuContext::new(window.clone())) {
      Ok(gpu) => gpu,
      Err(e) => return self.fail(event_loop, e),
    };
    info!("launched window {:?}", window.id());
    let size = window.inner_size();
    self.window = Some(window);
    self.gpu = Some(gpu);

    self.renderer.register_shell(&self.shell);
    self.renderer.init(&mut self.scene);
    self.resize(size);
  }
  // system updates
  fn new_events(&mut self, _event_loop: &ActiveEventLoop, _cause: StartCause) {
    let now = Instant::now();
    if now - self.last_frame > self.wait_duration {
      self.last_frame = now;
      if let Some(win) = &self.window {
        win.request_redraw();
      }
    }
  }
  // handle events
  fn window_event(&mut self, event_loop: &ActiveEventLoop, _win_id: WindowId, event: WindowEvent) {
    match event {
      WindowEvent::CloseRequested => {
        // close if window is closed externally
        event_loop.exit();
      }
      WindowEvent::Resized(phys_size) => {
        debug!("resizing window ({}, {})", phys_size.width, phys_size.height);
        self.resize(phys_size);
      }
      WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
        debug!("scale factor changed to {scale_factor}");
        self.renderer.display_changed(&mut self.scene, true, false);
      }
      WindowEvent::KeyboardInput { event, .. } => {
        self.handle_key(event_loop, event);
      }
      WindowEvent::MouseInput { state, button, .. } => {
        self.mouse.on_button(&mut self.scene, &mut self.renderer, button, state.is_pressed());
      }
      WindowEvent::CursorMoved { position, .. } => {
        let position = vec2f!(position.x as f32, position.y as f32);
        self.mouse.on_move(&mut self.scene, &mut self.renderer, position);
      }
      WindowEvent::CursorEntered { .. } => {
        self.mouse.on_enter(&mut self.scene, &mut self.renderer);
      }
      WindowEvent::CursorLeft { .. } => {
        self.mouse.on_leave(&mut self.scene, &mut self.renderer);
      }
      WindowEvent::RedrawRequested => {
        self.redraw(event_loop);
        // wait until
        if self.wait_duration > Duration::ZERO {
          event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + self.wait_duration));
        }
      }
      _ => (),
    }
  }
  // clean up
  fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
    if let Some(gpu) = &mut self.gpu {
      gpu.destroy();
    }
    debug!("exiting event loop after {} frames", self.renderer.context().frame_count());
  }
}

/// Opens a window and runs `scene` until the window closes.
pub fn launch<S: Application>(config: &ViewerConfig, scene: S) -> Result<(), GfxError> {
  let event_loop = EventLoop::new()?;
  match config.max_fps {
    Some(_) => event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now())),
    None => event_loop.set_control_flow(ControlFlow::Poll),
  };
  let mut winit_app = WinitApp::new(config, scene);
  event_loop.run_app(&mut winit_app)?;
  match winit_app.error.take() {
    Some(e) => Err(e),
    None => Ok(()),
  }
}
